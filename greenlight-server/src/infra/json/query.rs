//! Scalar readers for query string parameters.
//!
//! Pair these with `axum::extract::Query<HashMap<String, String>>`. An empty
//! value is treated the same as a missing one.

use std::collections::HashMap;

use greenlight_core::validator::Validator;

pub fn read_string(qs: &HashMap<String, String>, key: &str, default: &str) -> String {
    match qs.get(key) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

/// Split a comma separated value. Items are not trimmed.
pub fn read_csv(
    qs: &HashMap<String, String>,
    key: &str,
    default: &[&str],
) -> Vec<String> {
    match qs.get(key) {
        Some(value) if !value.is_empty() => {
            value.split(',').map(str::to_string).collect()
        }
        _ => default.iter().map(|item| item.to_string()).collect(),
    }
}

/// Parse an integer, recording "must be an integer value" under `key` and
/// falling back to `default` when the value does not parse.
pub fn read_int(
    qs: &HashMap<String, String>,
    key: &str,
    default: i64,
    v: &mut Validator,
) -> i64 {
    let Some(value) = qs.get(key).filter(|value| !value.is_empty()) else {
        return default;
    };

    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            v.add_error(key, "must be an integer value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn strings_fall_back_when_missing_or_empty() {
        let values = qs(&[("title", "moana"), ("sort", "")]);
        assert_eq!(read_string(&values, "title", ""), "moana");
        assert_eq!(read_string(&values, "sort", "id"), "id");
        assert_eq!(read_string(&values, "missing", "id"), "id");
    }

    #[test]
    fn csv_splits_on_commas() {
        let values = qs(&[("genres", "crime,drama")]);
        assert_eq!(read_csv(&values, "genres", &[]), vec!["crime", "drama"]);
        assert_eq!(read_csv(&values, "tags", &["all"]), vec!["all"]);
    }

    #[test]
    fn bad_integers_record_an_error_and_use_the_default() {
        let values = qs(&[("page", "2"), ("page_size", "abc")]);
        let mut v = Validator::new();

        assert_eq!(read_int(&values, "page", 1, &mut v), 2);
        assert_eq!(read_int(&values, "page_size", 20, &mut v), 20);
        assert_eq!(read_int(&values, "missing", 7, &mut v), 7);

        assert!(!v.valid());
        assert_eq!(
            v.errors().get("page_size").map(String::as_str),
            Some("must be an integer value")
        );
        assert_eq!(v.errors().len(), 1);
    }
}
