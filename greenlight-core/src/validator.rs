use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Field name to the first error message recorded for it.
///
/// Ordered so the map serializes identically across requests.
pub type FieldErrors = BTreeMap<String, String>;

/// Accumulates field errors so one request can report every violation.
///
/// Only the first message recorded for a field is kept; later checks on an
/// already failed field are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field errors have been recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records `message` for `field` unless the field already failed.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Records `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// True when every element of `values` is distinct.
pub fn unique<T>(values: &[T]) -> bool
where
    T: Eq + Hash,
{
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_per_field_wins() {
        let mut v = Validator::new();
        v.check(false, "title", "must be provided");
        v.check(false, "title", "must not be more than 500 bytes long");

        assert!(!v.valid());
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors()["title"], "must be provided");
    }

    #[test]
    fn passing_checks_leave_validator_valid() {
        let mut v = Validator::new();
        v.check(true, "year", "must be provided");
        v.check(true, "runtime", "must be a positive integer");

        assert!(v.valid());
        assert!(v.into_errors().is_empty());
    }

    #[test]
    fn errors_accumulate_across_fields_in_key_order() {
        let mut v = Validator::new();
        v.check(false, "year", "must not be in the future");
        v.add_error("genres", "must not contain duplicate values");
        v.check(false, "title", "must be provided");

        let fields: Vec<_> = v.errors().keys().map(String::as_str).collect();
        assert_eq!(fields, ["genres", "title", "year"]);
    }

    #[test]
    fn unique_detects_duplicates() {
        assert!(unique(&["drama", "romance", "war"]));
        assert!(unique::<String>(&[]));
        assert!(!unique(&["drama", "war", "drama"]));
    }
}
