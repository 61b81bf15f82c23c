use std::str::FromStr;
use std::time::Duration;

use crate::ConfigLoadError;

/// Parse an optional numeric value, naming `key` in the error.
pub fn parse_number<T: FromStr>(
    key: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, ConfigLoadError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigLoadError::InvalidNumber {
                key,
                value: value.to_string(),
            })
    })
    .transpose()
}

/// Parse an optional humantime duration such as `15m` or `3s`.
pub fn parse_duration(
    key: &'static str,
    raw: Option<&str>,
) -> Result<Option<Duration>, ConfigLoadError> {
    raw.map(|value| {
        humantime::parse_duration(value.trim())
            .map_err(|source| ConfigLoadError::InvalidDuration { key, source })
    })
    .transpose()
}
