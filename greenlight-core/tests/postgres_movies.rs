#![cfg(feature = "postgres-tests")]

use anyhow::Result;
use greenlight_core::database::PostgresDatabase;
use greenlight_core::database::ports::movies::MoviesRepository;
use greenlight_core::domain::movies::{Movie, Runtime};
use greenlight_core::error::DataError;
use sqlx::PgPool;

fn casablanca() -> Movie {
    Movie::new(
        "Casablanca",
        1942,
        Runtime(102),
        vec!["drama".into(), "romance".into(), "war".into()],
    )
}

#[sqlx::test(migrator = "greenlight_core::MIGRATOR")]
async fn insert_then_get_roundtrip(pool: PgPool) -> Result<()> {
    let repo = PostgresDatabase::from_pool(pool).movies();

    let inserted = repo.insert(casablanca()).await?;
    assert!(inserted.id > 0);
    assert_eq!(inserted.version, 1);
    assert!(inserted.created_at.is_some());

    let fetched = repo.get(inserted.id).await?;
    assert_eq!(fetched, inserted);
    Ok(())
}

#[sqlx::test(migrator = "greenlight_core::MIGRATOR")]
async fn get_all_returns_rows_in_id_order(pool: PgPool) -> Result<()> {
    let repo = PostgresDatabase::from_pool(pool).movies();
    assert!(repo.get_all().await?.is_empty());

    let first = repo.insert(casablanca()).await?;
    let mut second = casablanca();
    second.title = "The Breakfast Club".into();
    let second = repo.insert(second).await?;

    let ids: Vec<i64> = repo.get_all().await?.iter().map(|m| m.id).collect();
    assert_eq!(ids, [first.id, second.id]);
    Ok(())
}

#[sqlx::test(migrator = "greenlight_core::MIGRATOR")]
async fn update_increments_version_once(pool: PgPool) -> Result<()> {
    let repo = PostgresDatabase::from_pool(pool).movies();
    let inserted = repo.insert(casablanca()).await?;

    let mut edit = inserted.clone();
    edit.genres = vec!["drama".into()];
    let updated = repo.update(edit).await?;

    assert_eq!(updated.version, inserted.version + 1);
    assert_eq!(updated.created_at, inserted.created_at);
    assert!(updated.updated_at.is_some());

    let stored = repo.get(inserted.id).await?;
    assert_eq!(stored.genres, ["drama"]);
    assert_eq!(stored.version, 2);
    Ok(())
}

#[sqlx::test(migrator = "greenlight_core::MIGRATOR")]
async fn stale_update_is_rejected_as_conflict(pool: PgPool) -> Result<()> {
    let repo = PostgresDatabase::from_pool(pool).movies();
    let inserted = repo.insert(casablanca()).await?;

    repo.update(inserted.clone()).await?;
    let err = repo.update(inserted).await.unwrap_err();
    assert!(matches!(err, DataError::EditConflict));
    Ok(())
}

#[sqlx::test(migrator = "greenlight_core::MIGRATOR")]
async fn delete_removes_row(pool: PgPool) -> Result<()> {
    let repo = PostgresDatabase::from_pool(pool).movies();
    let inserted = repo.insert(casablanca()).await?;

    repo.delete(inserted.id).await?;
    assert!(matches!(
        repo.get(inserted.id).await,
        Err(DataError::RecordNotFound)
    ));
    assert!(matches!(
        repo.delete(inserted.id).await,
        Err(DataError::RecordNotFound)
    ));
    Ok(())
}

#[sqlx::test(migrator = "greenlight_core::MIGRATOR")]
async fn check_constraints_surface_as_store_errors(pool: PgPool) -> Result<()> {
    let repo = PostgresDatabase::from_pool(pool).movies();
    let mut movie = casablanca();
    movie.genres = ["a", "b", "c", "d", "e", "f"].map(String::from).to_vec();

    let err = repo.insert(movie).await.unwrap_err();
    assert!(matches!(err, DataError::Store(_)), "{err}");
    Ok(())
}
