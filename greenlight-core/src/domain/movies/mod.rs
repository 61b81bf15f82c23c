//! The movie entity, its request shape and the runtime scalar.

pub mod movie;
pub mod runtime;

pub use movie::{Movie, MovieInput, validate_movie};
pub use runtime::{Runtime, RuntimeError};
