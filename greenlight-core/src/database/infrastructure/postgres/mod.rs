//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::movies::PostgresMoviesRepository;

use std::fmt;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::MIGRATOR;
use crate::error::Result;

/// Connection pool sizing plus the per-statement deadline applied by the
/// repositories.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Floor of connections the pool keeps open, idle or not. `0` lets the
    /// pool shrink to nothing once `idle_timeout` reaps unused connections.
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 0,
            idle_timeout: Duration::from_secs(15 * 60),
            acquire_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(3),
        }
    }
}

/// Handle on the process-wide pool. The pool is shared; repositories built
/// from it are cheap clones.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    query_timeout: Duration,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(url: &str, settings: &PoolSettings) -> Result<Self> {
        // Never keep more idle connections than the pool may open.
        let min_connections = settings.min_connections.min(settings.max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(min_connections)
            .idle_timeout(Some(settings.idle_timeout))
            .acquire_timeout(settings.acquire_timeout)
            .test_before_acquire(true)
            .connect(url)
            .await?;

        info!(
            pool.max = settings.max_connections,
            pool.min = min_connections,
            "database connection pool established"
        );

        Ok(Self {
            pool,
            query_timeout: settings.query_timeout,
        })
    }

    /// Wraps an existing pool, e.g. one handed out by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: PoolSettings::default().query_timeout,
        }
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn movies(&self) -> PostgresMoviesRepository {
        PostgresMoviesRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
