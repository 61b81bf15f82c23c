use std::error::Error as StdError;
use std::fmt;

use axum::body::to_bytes;
use axum::extract::{FromRequest, Request};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_path_to_error::{Path, Segment};
use thiserror::Error;

use crate::infra::errors::AppError;

/// Hard cap on request bodies, in bytes.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Why a request body could not be turned into the requested shape.
///
/// Every variant renders as the message returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Syntax error. `offset` is `None` when the body ended mid-value.
    MalformedBody { offset: Option<usize> },
    /// A value of the wrong JSON type. `field` is the dotted key path when
    /// the value sits under an object key.
    TypeMismatch { field: Option<String>, offset: usize },
    EmptyBody,
    UnknownField(String),
    DuplicateField(String),
    BodyTooLarge,
    MultipleValues,
    /// Anything the classifier does not recognise, such as a custom error
    /// raised by a field's own deserializer.
    Invalid(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedBody { offset: Some(offset) } => write!(
                f,
                "body contains badly-formed JSON (at character {offset})"
            ),
            Self::MalformedBody { offset: None } => {
                f.write_str("body contains badly-formed JSON")
            }
            Self::TypeMismatch {
                field: Some(field), ..
            } => write!(f, "body contains incorrect JSON type for field {field:?}"),
            Self::TypeMismatch {
                field: None,
                offset,
            } => write!(
                f,
                "body contains incorrect JSON type (at character {offset})"
            ),
            Self::EmptyBody => f.write_str("body must not be empty"),
            Self::UnknownField(name) => {
                write!(f, "body contains unknown key {name:?}")
            }
            Self::DuplicateField(name) => {
                write!(f, "body contains duplicate key {name:?}")
            }
            Self::BodyTooLarge => write!(
                f,
                "body must not be larger than {MAX_BODY_BYTES} bytes"
            ),
            Self::MultipleValues => {
                f.write_str("body must only contain a single JSON value")
            }
            Self::Invalid(message) => f.write_str(message),
        }
    }
}

/// Strictly decode exactly one JSON value from `body`.
///
/// Keys the target type does not declare are rejected when the type opts in
/// with `#[serde(deny_unknown_fields)]`, and anything after the first value
/// other than whitespace fails with [`DecodeError::MultipleValues`].
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(DecodeError::BodyTooLarge);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut de)
        .map_err(|err| classify(body, err))?;
    de.end().map_err(|_| DecodeError::MultipleValues)?;

    Ok(value)
}

fn classify(
    body: &[u8],
    err: serde_path_to_error::Error<serde_json::Error>,
) -> DecodeError {
    let field = field_path(err.path());
    let inner = err.into_inner();

    match inner.classify() {
        Category::Eof if body.iter().all(u8::is_ascii_whitespace) => {
            DecodeError::EmptyBody
        }
        Category::Eof => DecodeError::MalformedBody { offset: None },
        Category::Syntax => DecodeError::MalformedBody {
            offset: Some(byte_offset(body, inner.line(), inner.column())),
        },
        Category::Data => {
            let message = inner.to_string();
            let message = strip_position(&message);

            if let Some(name) = message
                .strip_prefix("unknown field `")
                .and_then(|rest| rest.split('`').next())
            {
                return DecodeError::UnknownField(name.to_string());
            }

            if let Some(name) = message
                .strip_prefix("duplicate field `")
                .and_then(|rest| rest.split('`').next())
            {
                return DecodeError::DuplicateField(name.to_string());
            }

            if message.starts_with("invalid type")
                || message.starts_with("invalid value")
                || message.starts_with("invalid length")
            {
                return DecodeError::TypeMismatch {
                    field,
                    offset: byte_offset(body, inner.line(), inner.column()),
                };
            }

            DecodeError::Invalid(message.to_string())
        }
        Category::Io => DecodeError::Invalid(inner.to_string()),
    }
}

// Object keys only; sequence indexes are dropped so `genres[1]` reports as `genres`.
fn field_path(path: &Path) -> Option<String> {
    let keys: Vec<&str> = path
        .iter()
        .filter_map(|segment| match segment {
            Segment::Map { key } => Some(key.as_str()),
            _ => None,
        })
        .collect();

    if keys.is_empty() {
        None
    } else {
        Some(keys.join("."))
    }
}

fn strip_position(message: &str) -> &str {
    match message.rfind(" at line ") {
        Some(idx) => &message[..idx],
        None => message,
    }
}

fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|byte| *byte == b'\n')
        .take(line.saturating_sub(1))
        .map(|line| line.len() + 1)
        .sum();
    (preceding + column).min(body.len())
}

/// Request body extractor that enforces [`MAX_BODY_BYTES`] and runs
/// [`decode_json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson<T>(pub T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(
        req: Request,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(read_failure)?;

        Ok(Self(decode_json(&bytes)?))
    }
}

fn read_failure(err: axum::Error) -> DecodeError {
    let mut source: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return DecodeError::BodyTooLarge;
        }
        source = current.source();
    }

    DecodeError::Invalid(err.to_string())
}
