//! # Greenlight Server
//!
//! Serves the `/v1` movie API over HTTP.
//!
//! Configuration comes from defaults, an optional `.env` file and the process
//! environment, with command line flags taking precedence. `greenlight-server
//! db migrate` applies the embedded migrations and exits.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenlight_config::{Config, ConfigLoad, ConfigLoader, Environment};
use greenlight_core::database::PostgresDatabase;
use greenlight_server::{AppState, create_app, infra::database::pool_settings};

/// How long background tasks get to finish once the listener has closed.
const BACKGROUND_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "greenlight-server")]
#[command(about = "JSON API for managing a movie catalogue")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Environment (development|staging|production)
    #[arg(long = "env", env = "GREENLIGHT_ENV")]
    environment: Option<Environment>,

    /// PostgreSQL DSN
    #[arg(long, env = "DATABASE_URL")]
    db_dsn: Option<String>,

    /// PostgreSQL max open connections
    #[arg(long, env = "DB_MAX_OPEN_CONNS")]
    db_max_open_conns: Option<u32>,

    /// PostgreSQL connections kept open while idle (capped at max open)
    #[arg(long, env = "DB_MAX_IDLE_CONNS")]
    db_max_idle_conns: Option<u32>,

    /// PostgreSQL max connection idle time, e.g. `15m`
    #[arg(long, env = "DB_MAX_IDLE_TIME", value_parser = humantime::parse_duration)]
    db_max_idle_time: Option<Duration>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_runtime_config(&cli.serve)?;

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        let pg = connect_database(&config).await?;
        pg.migrate().await.context("database migration failed")?;
        info!("Database migrations applied successfully");
        pg.close().await;
        return Ok(());
    }

    run_server(config).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }
    if let Some(environment) = args.environment {
        config.environment = environment;
    }
    if let Some(dsn) = args.db_dsn.clone() {
        config.database.url = Some(dsn);
    }
    if let Some(max_open) = args.db_max_open_conns {
        config.database.max_open_conns = max_open;
    }
    if let Some(max_idle) = args.db_max_idle_conns {
        config.database.max_idle_conns = max_idle;
    }
    if let Some(idle_time) = args.db_max_idle_time {
        config.database.max_idle_time = idle_time;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    // Flags bypass the loader, so re-run its checks on the final values.
    greenlight_config::loader::validate(&config, &mut Default::default())
        .context("invalid configuration")?;

    Ok(config)
}

async fn connect_database(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config.database.url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("DATABASE_URL (or --db-dsn) must be provided")
    })?;

    PostgresDatabase::connect(url, &pool_settings(&config.database))
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let pg = connect_database(&config).await?;
    let config = Arc::new(config);

    let state = AppState::new(Arc::clone(&config), Arc::new(pg.movies()));
    let background = state.background.clone();
    let router = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %addr,
        env = %config.environment,
        "Starting Greenlight server"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped accepting connections");
    if !background.shutdown(BACKGROUND_DRAIN_TIMEOUT).await {
        warn!("exiting with background tasks still running");
    }
    pg.close().await;
    info!("stopped server");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!(signal = "SIGINT", "shutting down server"),
        () = terminate => info!(signal = "SIGTERM", "shutting down server"),
    }
}
