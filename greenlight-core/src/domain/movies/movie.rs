use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use super::runtime::Runtime;
use crate::validator::{Validator, unique};

pub const MAX_TITLE_BYTES: usize = 500;
pub const EARLIEST_YEAR: i32 = 1888;
pub const MAX_GENRES: usize = 5;

/// A movie row.
///
/// `id`, `created_at` and `version` are assigned by the store on insert;
/// `version` then grows by exactly one on every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Movie {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub title: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Movie {
    /// A candidate that has not been persisted yet.
    pub fn new(
        title: impl Into<String>,
        year: i32,
        runtime: Runtime,
        genres: Vec<String>,
    ) -> Self {
        Self {
            id: 0,
            created_at: None,
            title: title.into(),
            year,
            runtime,
            genres,
            version: 0,
            updated_at: None,
        }
    }
}

/// Request shape for creating or patching a movie.
///
/// Every field is optional so absent fields reach the validator (create) or
/// leave the stored value untouched (patch). Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovieInput {
    pub title: Option<String>,
    pub year: Option<i32>,
    /// Absent means `None`; an explicit `null` is handed to [`Runtime`] and
    /// rejected as a format error.
    #[serde(default, deserialize_with = "present_runtime")]
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

fn present_runtime<'de, D>(deserializer: D) -> Result<Option<Runtime>, D::Error>
where
    D: Deserializer<'de>,
{
    Runtime::deserialize(deserializer).map(Some)
}

impl MovieInput {
    /// Builds a fresh candidate, recording a `genres` error when the field
    /// was missing from the body. The caller still runs [`validate_movie`].
    pub fn into_candidate(self, v: &mut Validator) -> Movie {
        v.check(self.genres.is_some(), "genres", "must be provided");

        Movie::new(
            self.title.unwrap_or_default(),
            self.year.unwrap_or_default(),
            self.runtime.unwrap_or_default(),
            self.genres.unwrap_or_default(),
        )
    }

    /// Overwrites the fields present in the input.
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

/// Runs every movie field check against `v`.
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= EARLIEST_YEAR, "year", "must be greater than 1888");
    v.check(
        movie.year <= Utc::now().year(),
        "year",
        "must not be in the future",
    );

    v.check(!movie.runtime.is_zero(), "runtime", "must be provided");
    v.check(movie.runtime.0 > 0, "runtime", "must be a positive integer");

    v.check(!movie.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(unique(&movie.genres), "genres", "must not contain duplicate values");
    v.check(
        movie.genres.iter().all(|genre| !genre.is_empty()),
        "genres",
        "must not contain empty values",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn casablanca() -> Movie {
        Movie::new(
            "Casablanca",
            1942,
            Runtime(102),
            vec!["drama".into(), "romance".into(), "war".into()],
        )
    }

    fn errors_for(movie: &Movie) -> crate::validator::FieldErrors {
        let mut v = Validator::new();
        validate_movie(&mut v, movie);
        v.into_errors()
    }

    #[test]
    fn valid_movie_passes() {
        assert!(errors_for(&casablanca()).is_empty());
    }

    #[test]
    fn future_year_is_rejected() {
        let mut movie = casablanca();
        movie.year = 2099;
        assert_eq!(errors_for(&movie)["year"], "must not be in the future");
    }

    #[test]
    fn missing_values_report_must_be_provided_first() {
        let errors = errors_for(&Movie::new("", 0, Runtime(0), vec![]));
        assert_eq!(errors["title"], "must be provided");
        assert_eq!(errors["year"], "must be provided");
        assert_eq!(errors["runtime"], "must be provided");
        assert_eq!(errors["genres"], "must contain at least 1 genre");
    }

    #[test]
    fn title_length_is_measured_in_bytes() {
        let mut movie = casablanca();
        movie.title = "é".repeat(251);
        assert_eq!(
            errors_for(&movie)["title"],
            "must not be more than 500 bytes long"
        );
    }

    #[test]
    fn negative_runtime_and_early_year_are_rejected() {
        let mut movie = casablanca();
        movie.runtime = Runtime(-3);
        movie.year = 1700;
        let errors = errors_for(&movie);
        assert_eq!(errors["runtime"], "must be a positive integer");
        assert_eq!(errors["year"], "must be greater than 1888");
    }

    #[test]
    fn all_genre_violations_are_reported_with_other_fields() {
        let mut movie = casablanca();
        movie.year = 2099;
        movie.genres = ["a", "b", "c", "d", "e", "f"].map(String::from).to_vec();
        let errors = errors_for(&movie);
        assert_eq!(errors["genres"], "must not contain more than 5 genres");
        assert_eq!(errors["year"], "must not be in the future");

        let mut movie = casablanca();
        movie.genres = vec!["drama".into(), "drama".into()];
        assert_eq!(
            errors_for(&movie)["genres"],
            "must not contain duplicate values"
        );

        movie.genres = vec!["drama".into(), String::new()];
        assert_eq!(errors_for(&movie)["genres"], "must not contain empty values");
    }

    #[test]
    fn absent_genres_differ_from_empty_genres() {
        let mut v = Validator::new();
        let movie = MovieInput::default().into_candidate(&mut v);
        validate_movie(&mut v, &movie);
        assert_eq!(v.errors()["genres"], "must be provided");

        let mut v = Validator::new();
        let input = MovieInput {
            genres: Some(vec![]),
            ..MovieInput::default()
        };
        let movie = input.into_candidate(&mut v);
        validate_movie(&mut v, &movie);
        assert_eq!(v.errors()["genres"], "must contain at least 1 genre");
    }

    #[test]
    fn apply_to_only_touches_present_fields() {
        let mut movie = casablanca();
        MovieInput {
            year: Some(1943),
            ..MovieInput::default()
        }
        .apply_to(&mut movie);

        assert_eq!(movie.year, 1943);
        assert_eq!(movie.title, "Casablanca");
        assert_eq!(movie.runtime, Runtime(102));
    }

    #[test]
    fn serializes_runtime_as_minutes_string_and_skips_unset_timestamps() {
        let mut movie = casablanca();
        movie.id = 7;
        movie.version = 1;
        let value = serde_json::to_value(&movie).unwrap();

        assert_eq!(value["runtime"], "102 mins");
        assert_eq!(value["id"], 7);
        assert!(value.get("created_at").is_none());
        assert!(value.get("updated_at").is_none());
    }

    #[test]
    fn explicit_null_runtime_is_a_format_error() {
        let err = serde_json::from_str::<MovieInput>(r#"{"title":"X","runtime":null}"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid runtime format"), "{err}");

        let input = serde_json::from_str::<MovieInput>(r#"{"title":"X"}"#).unwrap();
        assert_eq!(input.runtime, None);
    }

    #[test]
    fn input_rejects_unknown_fields() {
        let err = serde_json::from_str::<MovieInput>(r#"{"title":"X","rating":5}"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("unknown field `rating`"));
    }
}
