//! The JSON boundary: strict request decoding, enveloped response encoding
//! and query string helpers.

pub mod decode;
pub mod encode;
pub mod query;

pub use decode::{DecodeError, MAX_BODY_BYTES, StrictJson, decode_json};
pub use encode::{Envelope, write_json};
pub use query::{read_csv, read_int, read_string};
