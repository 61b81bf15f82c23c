//! PostgreSQL-backed repository implementations.

pub mod movies;
