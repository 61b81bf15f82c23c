//! # Greenlight Core
//!
//! Core library for the Greenlight movie API, providing the movie domain
//! model, field validation and the repository layer that persists movies.
//!
//! ## Overview
//!
//! - **Movie domain**: the [`Movie`](domain::movies::Movie) entity and the
//!   [`Runtime`](domain::movies::Runtime) scalar with its `"<N> mins"` JSON form
//! - **Validation**: the accumulating [`Validator`](validator::Validator)
//! - **Repositories**: the [`MoviesRepository`](database::ports::movies::MoviesRepository)
//!   port with PostgreSQL and in-memory implementations, using a version
//!   counter for optimistic concurrency control
//!
//! ## Example
//!
//! ```no_run
//! use greenlight_core::{
//!     database::{MemoryMoviesRepository, ports::movies::MoviesRepository},
//!     domain::movies::{Movie, Runtime, validate_movie},
//!     validator::Validator,
//! };
//!
//! async fn create(repo: &MemoryMoviesRepository) -> Result<(), Box<dyn std::error::Error>> {
//!     let movie = Movie::new("Casablanca", 1942, Runtime(102), vec!["drama".into()]);
//!
//!     let mut v = Validator::new();
//!     validate_movie(&mut v, &movie);
//!     if v.valid() {
//!         let stored = repo.insert(movie).await?;
//!         println!("stored movie {} at version {}", stored.id, stored.version);
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Database ports and their PostgreSQL / in-memory implementations
pub mod database;

/// Movie domain types
pub mod domain;

/// Error types shared by the repository layer
pub mod error;

/// Field-level validation accumulator
pub mod validator;

pub use error::{DataError, Result};

/// Embedded schema migrations for the `movies` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
