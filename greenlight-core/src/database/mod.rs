//! Repository ports for the movie store and their implementations.

pub mod infrastructure;
pub mod ports;

pub use infrastructure::memory::MemoryMoviesRepository;
pub use infrastructure::postgres::{
    PoolSettings, PostgresDatabase, PostgresMoviesRepository,
};
