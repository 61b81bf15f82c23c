pub mod error;

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;
use url::Url;

use crate::models::sources::EnvConfig;
use crate::models::{
    Config, ConfigMetadata, DatabaseConfig, Environment, ServerConfig,
};
use crate::util::{parse_duration, parse_number};
use crate::validation::ConfigWarnings;
use error::ConfigLoadError;

/// A composed configuration plus the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Composes defaults, an optional `.env` file and the process environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    env_file: Option<PathBuf>,
    skip_env_file: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of searching for `.env` from the working directory.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.skip_env_file = true;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = if self.skip_env_file {
            false
        } else {
            self.load_env_file()?
        };

        Self::compose(&EnvConfig::gather(), env_file_loaded)
    }

    /// Builds a validated configuration from already gathered values.
    pub fn compose(
        env: &EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: env.server_host.clone().unwrap_or(server_defaults.host),
            port: parse_number("SERVER_PORT", env.server_port.as_deref())?
                .unwrap_or(server_defaults.port),
        };

        let environment = env
            .environment
            .as_deref()
            .map(str::parse::<Environment>)
            .transpose()
            .map_err(ConfigLoadError::InvalidEnvironment)?
            .unwrap_or_default();

        let db_defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env.database_url.clone(),
            max_open_conns: parse_number(
                "DB_MAX_OPEN_CONNS",
                env.db_max_open_conns.as_deref(),
            )?
            .unwrap_or(db_defaults.max_open_conns),
            max_idle_conns: parse_number(
                "DB_MAX_IDLE_CONNS",
                env.db_max_idle_conns.as_deref(),
            )?
            .unwrap_or(db_defaults.max_idle_conns),
            max_idle_time: parse_duration(
                "DB_MAX_IDLE_TIME",
                env.db_max_idle_time.as_deref(),
            )?
            .unwrap_or(db_defaults.max_idle_time),
            query_timeout: parse_duration(
                "DB_QUERY_TIMEOUT",
                env.db_query_timeout.as_deref(),
            )?
            .unwrap_or(db_defaults.query_timeout),
        };

        let config = Config {
            server,
            database,
            environment,
            metadata: ConfigMetadata { env_file_loaded },
        };

        validate(&config, &mut warnings)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let outcome = match &self.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| path.clone()),
            None => dotenvy::dotenv(),
        };

        match outcome {
            Ok(path) => {
                debug!(path = %path.display(), "loaded env file");
                Ok(true)
            }
            Err(dotenvy::Error::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Ok(false)
            }
            Err(source) => Err(ConfigLoadError::EnvFile {
                path: self
                    .env_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(".env")),
                source,
            }),
        }
    }
}

/// Checks the rules that can be enforced before connecting to anything.
pub fn validate(
    config: &Config,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigLoadError> {
    match config.database.url.as_deref() {
        Some(raw) => {
            let url = Url::parse(raw)
                .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
            if !matches!(url.scheme(), "postgres" | "postgresql") {
                return Err(ConfigLoadError::UnsupportedDatabaseScheme {
                    scheme: url.scheme().to_string(),
                });
            }
        }
        None => warnings.push(
            "no database URL configured",
            Some("set DATABASE_URL or pass --db-dsn"),
        ),
    }

    if config.database.max_idle_conns > config.database.max_open_conns {
        warnings.push(
            format!(
                "DB_MAX_IDLE_CONNS ({}) exceeds DB_MAX_OPEN_CONNS ({}); idle pool will be capped",
                config.database.max_idle_conns, config.database.max_open_conns
            ),
            None,
        );
    }

    Ok(())
}
