use greenlight_config::DatabaseConfig;
use greenlight_core::database::PoolSettings;

/// Pool sizing for `config`.
///
/// sqlx has no ceiling on idle connections, so `max_idle_conns` becomes the
/// pool's floor: that many connections stay open even when unused. It is
/// capped at `max_open_conns`.
pub fn pool_settings(config: &DatabaseConfig) -> PoolSettings {
    PoolSettings {
        max_connections: config.max_open_conns,
        min_connections: config.max_idle_conns.min(config.max_open_conns),
        idle_timeout: config.max_idle_time,
        query_timeout: config.query_timeout,
        ..PoolSettings::default()
    }
}
