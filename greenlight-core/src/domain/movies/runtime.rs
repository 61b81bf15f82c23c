use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

const UNIT: &str = "mins";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("invalid runtime format")]
    InvalidFormat,
}

/// Movie runtime in whole minutes.
///
/// Crosses the JSON boundary as a string of the exact form `"<N> mins"` and is
/// stored as a plain `integer` column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Renders the quoted JSON text, e.g. `"102 mins"` including the quotes.
    pub fn encode_json(self) -> String {
        format!("\"{} {UNIT}\"", self.0)
    }

    /// Parses raw JSON text. The input must be a JSON string holding
    /// `"<N> mins"`; anything else, including a bare number, is rejected.
    pub fn decode_json(raw: &str) -> Result<Self, RuntimeError> {
        let text: String =
            serde_json::from_str(raw).map_err(|_| RuntimeError::InvalidFormat)?;
        text.parse()
    }
}

impl FromStr for Runtime {
    type Err = RuntimeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split(' ').collect();
        if parts.len() != 2 || parts[1] != UNIT {
            return Err(RuntimeError::InvalidFormat);
        }

        parts[0]
            .parse::<i32>()
            .map(Runtime)
            .map_err(|_| RuntimeError::InvalidFormat)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {UNIT}", self.0)
    }
}

impl Serialize for Runtime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RuntimeVisitor)
    }
}

struct RuntimeVisitor;

fn invalid<E: de::Error>() -> E {
    E::custom(RuntimeError::InvalidFormat)
}

// Non-string JSON is a format error too, never a type mismatch.
impl<'de> Visitor<'de> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string of the form \"<N> mins\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Runtime, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Runtime, E> {
        Err(invalid())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Runtime, E> {
        Err(invalid())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Runtime, E> {
        Err(invalid())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Runtime, E> {
        Err(invalid())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Runtime, E> {
        Err(invalid())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _: A) -> Result<Runtime, A::Error> {
        Err(invalid())
    }

    fn visit_map<A: MapAccess<'de>>(self, _: A) -> Result<Runtime, A::Error> {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_quoted_minutes() {
        assert_eq!(Runtime(102).encode_json(), "\"102 mins\"");
        assert_eq!(serde_json::to_string(&Runtime(-7)).unwrap(), "\"-7 mins\"");
    }

    #[test]
    fn decodes_quoted_minutes() {
        assert_eq!(Runtime::decode_json("\"102 mins\""), Ok(Runtime(102)));
        assert_eq!(
            serde_json::from_str::<Runtime>("\"95 mins\"").unwrap(),
            Runtime(95)
        );
    }

    #[test]
    fn round_trips_non_negative_values() {
        for minutes in [0, 1, 59, 102, 1_440, i32::MAX] {
            let encoded = Runtime(minutes).encode_json();
            assert_eq!(Runtime::decode_json(&encoded), Ok(Runtime(minutes)));
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for raw in [
            "\"102 minutes\"",
            "\"abc mins\"",
            "102",
            "\"\"",
            "",
            "\"102mins\"",
            "\"102  mins\"",
            "\"1 2 mins\"",
            "\"2147483648 mins\"",
        ] {
            assert_eq!(
                Runtime::decode_json(raw),
                Err(RuntimeError::InvalidFormat),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn serde_rejects_non_string_shapes_with_format_error() {
        for raw in ["102", "true", "null", "[1]", "{\"m\":1}", "1.5"] {
            let err = serde_json::from_str::<Runtime>(raw).unwrap_err();
            assert!(
                err.to_string().starts_with("invalid runtime format"),
                "{raw}: {err}"
            );
        }
    }
}
