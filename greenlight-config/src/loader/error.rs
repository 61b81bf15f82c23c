use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("{key} must be a number, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be a duration such as `15m` or `3s`: {source}")]
    InvalidDuration {
        key: &'static str,
        #[source]
        source: humantime::DurationError,
    },

    #[error("GREENLIGHT_ENV is invalid: {0}")]
    InvalidEnvironment(String),

    #[error("invalid database URL: {source}")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("database URL must use the postgres:// or postgresql:// scheme, got `{scheme}`")]
    UnsupportedDatabaseScheme { scheme: String },
}
