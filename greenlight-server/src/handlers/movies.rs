use axum::{
    extract::{Path, State},
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::LOCATION,
    },
    response::Response,
};
use tracing::{info, warn};

use greenlight_core::{
    domain::movies::{Movie, MovieInput, validate_movie},
    validator::Validator,
};

use crate::{
    AppState,
    infra::{
        errors::{AppError, AppResult},
        json::{Envelope, StrictJson, write_json},
    },
};

/// Optional precondition on `PATCH`: the version the client last saw.
pub static EXPECTED_VERSION: HeaderName = HeaderName::from_static("x-expected-version");

/// Ids must parse as positive integers, anything else is a 404.
fn read_id_param(raw: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::not_found()),
    }
}

fn movie_response(
    status: StatusCode,
    movie: &Movie,
    headers: Option<HeaderMap>,
) -> AppResult<Response> {
    let envelope = Envelope::new().try_with("movie", movie)?;
    Ok(write_json(status, &envelope, headers)?)
}

fn ensure_valid(movie: &Movie, mut v: Validator) -> AppResult<()> {
    validate_movie(&mut v, movie);
    if v.valid() {
        Ok(())
    } else {
        Err(AppError::failed_validation(v.into_errors()))
    }
}

pub async fn list_movies_handler(State(state): State<AppState>) -> AppResult<Response> {
    let movies = state.movies.get_all().await?;
    let envelope = Envelope::new().try_with("movies", &movies)?;
    Ok(write_json(StatusCode::OK, &envelope, None)?)
}

pub async fn create_movie_handler(
    State(state): State<AppState>,
    StrictJson(input): StrictJson<Option<MovieInput>>,
) -> AppResult<Response> {
    let mut v = Validator::new();
    let candidate = input.unwrap_or_default().into_candidate(&mut v);
    ensure_valid(&candidate, v)?;

    let movie = state.movies.insert(candidate).await?;
    info!(movie.id = movie.id, title = %movie.title, "movie created");

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/v1/movies/{}", movie.id))
        .map_err(AppError::internal)?;
    headers.insert(LOCATION, location);

    movie_response(StatusCode::CREATED, &movie, Some(headers))
}

pub async fn show_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = read_id_param(&id)?;
    let movie = state.movies.get(id).await?;
    movie_response(StatusCode::OK, &movie, None)
}

pub async fn update_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    StrictJson(input): StrictJson<Option<MovieInput>>,
) -> AppResult<Response> {
    let id = read_id_param(&id)?;
    let mut movie = state.movies.get(id).await?;

    if let Some(expected) = headers.get(&EXPECTED_VERSION)
        && expected.as_bytes() != movie.version.to_string().as_bytes()
    {
        warn!(movie.id = id, current = movie.version, "stale expected version");
        return Err(AppError::edit_conflict());
    }

    if let Some(input) = input {
        input.apply_to(&mut movie);
    }
    ensure_valid(&movie, Validator::new())?;

    let movie = state.movies.update(movie).await?;
    info!(movie.id = movie.id, version = movie.version, "movie updated");

    movie_response(StatusCode::OK, &movie, None)
}

pub async fn delete_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = read_id_param(&id)?;
    state.movies.delete(id).await?;
    info!(movie.id = id, "movie deleted");

    let envelope = Envelope::new().with("message", "movie successfully deleted");
    Ok(write_json(StatusCode::OK, &envelope, None)?)
}
