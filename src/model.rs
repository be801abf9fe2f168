//! Model-backed parameters.
//!
//! A schema entry bound to a [`ModelStore`] does not read its own name from
//! the request. It reads the primary key from `<name>-id` and replaces it with
//! the matching [`Record`].

use std::collections::HashMap;

use crate::field::{ValidationError, ValidationErrorKind};
use crate::Record;

/// Source of model records looked up by primary key.
///
/// Implement this over whatever holds the records (a database handle, a
/// cache). The contract only ever calls [`ModelStore::get`].
pub trait ModelStore: Send + Sync {
    /// Name of the model, used in lookup failure messages and logs.
    fn model_name(&self) -> &str;

    /// Returns the record with primary key `pk`, if any.
    fn get(&self, pk: i64) -> Option<Record>;
}

/// Returns the request key holding the primary key for parameter `name`.
///
/// # Examples
///
/// ```
/// assert_eq!(api_contract::model::lookup_key("course"), "course-id");
/// ```
pub fn lookup_key(name: &str) -> String {
    format!("{}-id", name)
}

/// Parses a raw primary key.
pub(crate) fn parse_pk(raw: &str) -> Result<i64, ValidationError> {
    raw.trim().parse().map_err(|_| {
        ValidationError::new(ValidationErrorKind::Invalid, "Enter a valid primary key.")
    })
}

/// An in-memory [`ModelStore`].
///
/// # Examples
///
/// ```
/// use api_contract::{MemoryStore, ModelStore};
/// use serde_json::json;
///
/// let mut courses = MemoryStore::new("Course");
/// courses.insert(7, json!({"title": "Rust"}));
///
/// let record = courses.get(7).expect("record 7 exists");
/// assert_eq!(record.model, "Course");
/// assert!(courses.get(8).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    model: String,
    records: HashMap<i64, serde_json::Value>,
}

impl MemoryStore {
    /// Creates an empty store for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            records: HashMap::new(),
        }
    }

    /// Inserts or replaces the record with primary key `pk`.
    pub fn insert(&mut self, pk: i64, data: serde_json::Value) {
        self.records.insert(pk, data);
    }

    /// Builder-style [`MemoryStore::insert`].
    pub fn with(mut self, pk: i64, data: serde_json::Value) -> Self {
        self.insert(pk, data);
        self
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ModelStore for MemoryStore {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn get(&self, pk: i64) -> Option<Record> {
        self.records
            .get(&pk)
            .map(|data| Record::new(self.model.clone(), pk, data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_key_appends_id_suffix() {
        assert_eq!(lookup_key("user"), "user-id");
    }

    #[test]
    fn parse_pk_accepts_integers() {
        assert_eq!(parse_pk(" 12 ").unwrap(), 12);
        assert_eq!(
            parse_pk("twelve").unwrap_err().kind(),
            ValidationErrorKind::Invalid
        );
    }

    #[test]
    fn memory_store_returns_records() {
        let store = MemoryStore::new("Course").with(1, json!({"title": "Intro"}));

        let record = store.get(1).unwrap();
        assert_eq!(record.pk, 1);
        assert_eq!(record.data["title"], "Intro");
        assert_eq!(store.model_name(), "Course");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_missing_record() {
        let store = MemoryStore::new("Course");
        assert!(store.is_empty());
        assert!(store.get(1).is_none());
    }
}
