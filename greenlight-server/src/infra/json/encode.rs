use std::collections::BTreeMap;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

/// Top-level response object. Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Envelope(BTreeMap<String, Value>);

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Like [`Envelope::with`] for any serializable payload.
    pub fn try_with<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }
}

/// Render `data` as a tab-indented JSON response with a trailing newline.
///
/// The body is fully serialized before the response is built, so a
/// serialization failure leaves nothing half-written. `headers` are merged
/// first and `Content-Type` is always `application/json`.
pub fn write_json<T: Serialize + ?Sized>(
    status: StatusCode,
    data: &T,
    headers: Option<HeaderMap>,
) -> Result<Response, serde_json::Error> {
    let mut buf = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(
        &mut buf,
        PrettyFormatter::with_indent(b"\t"),
    );
    data.serialize(&mut ser)?;
    buf.push(b'\n');

    let mut response = Response::new(Body::from(buf));
    *response.status_mut() = status;
    if let Some(headers) = headers {
        response.headers_mut().extend(headers);
    }
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(response)
}
