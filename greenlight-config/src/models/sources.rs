/// Raw environment-derived values, parsed later by the loader so malformed
/// input is reported instead of silently ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub environment: Option<String>,
    pub database_url: Option<String>,
    pub db_max_open_conns: Option<String>,
    pub db_max_idle_conns: Option<String>,
    pub db_max_idle_time: Option<String>,
    pub db_query_timeout: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the raw values from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            server_host: get("SERVER_HOST"),
            server_port: get("SERVER_PORT"),
            environment: get("GREENLIGHT_ENV"),
            database_url: get("DATABASE_URL"),
            db_max_open_conns: get("DB_MAX_OPEN_CONNS"),
            db_max_idle_conns: get("DB_MAX_IDLE_CONNS"),
            db_max_idle_time: get("DB_MAX_IDLE_TIME"),
            db_query_timeout: get("DB_QUERY_TIMEOUT"),
        }
    }
}
