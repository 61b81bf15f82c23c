//! In-process movie store with the same semantics as the PostgreSQL adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::ports::movies::MoviesRepository;
use crate::domain::movies::Movie;
use crate::error::{DataError, Result};

#[derive(Debug, Default)]
pub struct MemoryMoviesRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: BTreeMap<i64, Movie>,
    last_id: i64,
}

impl MemoryMoviesRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoviesRepository for MemoryMoviesRepository {
    async fn get_all(&self) -> Result<Vec<Movie>> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn insert(&self, mut movie: Movie) -> Result<Movie> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        movie.id = state.last_id;
        movie.created_at = Some(Utc::now());
        movie.updated_at = None;
        movie.version = 1;

        state.rows.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn get(&self, id: i64) -> Result<Movie> {
        if id < 1 {
            return Err(DataError::RecordNotFound);
        }

        self.state
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(DataError::RecordNotFound)
    }

    async fn update(&self, movie: Movie) -> Result<Movie> {
        let mut state = self.state.write().await;
        let Some(stored) = state
            .rows
            .get_mut(&movie.id)
            .filter(|stored| stored.version == movie.version)
        else {
            return Err(DataError::EditConflict);
        };

        stored.title = movie.title;
        stored.year = movie.year;
        stored.runtime = movie.runtime;
        stored.genres = movie.genres;
        stored.version += 1;
        stored.updated_at = Some(Utc::now());

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(DataError::RecordNotFound);
        }

        match self.state.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DataError::RecordNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::movies::Runtime;

    fn candidate(title: &str) -> Movie {
        Movie::new(title, 1942, Runtime(102), vec!["drama".into(), "war".into()])
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_first_version() {
        let repo = MemoryMoviesRepository::new();

        let first = repo.insert(candidate("Casablanca")).await.unwrap();
        let second = repo.insert(candidate("Black Panther")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.version, 1);
        assert!(first.created_at.is_some());
        assert_eq!(repo.get(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn get_all_is_empty_then_ordered_by_id() {
        let repo = MemoryMoviesRepository::new();
        assert!(repo.get_all().await.unwrap().is_empty());

        repo.insert(candidate("A")).await.unwrap();
        repo.insert(candidate("B")).await.unwrap();
        let titles: Vec<_> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|movie| movie.title)
            .collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[tokio::test]
    async fn update_bumps_version_and_keeps_identity() {
        let repo = MemoryMoviesRepository::new();
        let stored = repo.insert(candidate("Casablanca")).await.unwrap();

        let mut edit = stored.clone();
        edit.year = 1943;
        let updated = repo.update(edit).await.unwrap();

        assert_eq!(updated.version, stored.version + 1);
        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.year, 1943);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn stale_version_is_an_edit_conflict() {
        let repo = MemoryMoviesRepository::new();
        let stored = repo.insert(candidate("Casablanca")).await.unwrap();

        repo.update(stored.clone()).await.unwrap();
        let err = repo.update(stored).await.unwrap_err();
        assert!(matches!(err, DataError::EditConflict));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = MemoryMoviesRepository::new();
        let stored = repo.insert(candidate("Casablanca")).await.unwrap();

        repo.delete(stored.id).await.unwrap();
        assert!(matches!(
            repo.get(stored.id).await,
            Err(DataError::RecordNotFound)
        ));
        assert!(matches!(
            repo.delete(stored.id).await,
            Err(DataError::RecordNotFound)
        ));
        assert!(matches!(repo.get(0).await, Err(DataError::RecordNotFound)));
    }
}
