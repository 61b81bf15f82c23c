use async_trait::async_trait;

use crate::domain::movies::Movie;
use crate::error::Result;

/// CRUD over the `movies` table.
///
/// Every call is an independent unit of work; nothing is held between calls.
/// Candidates must already have passed validation before `insert`/`update`.
#[async_trait]
pub trait MoviesRepository: Send + Sync {
    /// All movies in store order, empty when there are none.
    async fn get_all(&self) -> Result<Vec<Movie>>;

    /// Persists a candidate and returns it with `id`, `created_at` and
    /// `version = 1` filled in.
    async fn insert(&self, movie: Movie) -> Result<Movie>;

    /// Fails with `RecordNotFound` for `id < 1` without touching the store.
    async fn get(&self, id: i64) -> Result<Movie>;

    /// Writes the editable fields, conditioned on `movie.version` still being
    /// current. Returns the movie with its bumped `version` and `updated_at`,
    /// or `EditConflict` when the row moved on (or no longer exists).
    async fn update(&self, movie: Movie) -> Result<Movie>;

    /// Fails with `RecordNotFound` when no row was removed.
    async fn delete(&self, id: i64) -> Result<()>;
}
