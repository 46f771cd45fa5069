//! Conversion between a [`Collection`] and the string form held by a store.
//!
//! The stored form is a pretty-printed JSON array of records. Decoding never
//! fails: a missing, unreadable or inconsistent value degrades to an empty
//! collection and the problem is reported through `tracing`.

use std::collections::HashSet;
use thiserror::Error;

use crate::models::{Record, RecordId, ValidationError};
use crate::Collection;

/// Why a stored value could not be turned into a collection.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record at index {0} has no id")]
    MissingId(usize),

    #[error("id {0} appears more than once")]
    DuplicateId(RecordId),

    #[error("record {id} is invalid: {source}")]
    Invalid {
        id: RecordId,
        #[source]
        source: ValidationError,
    },
}

/// Serializes a collection.
///
/// Records are plain strings and integers, so serialization cannot fail; the
/// `Result` is kept for callers that want to surface an unexpected error.
pub fn encode<R: Record>(collection: &Collection<R>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(collection)
}

/// Deserializes a collection, treating `None` and malformed input as empty.
pub fn decode<R: Record>(raw: Option<&str>) -> Collection<R> {
    match raw {
        None => Collection::new(),
        Some(raw) => try_decode(raw).unwrap_or_else(|e| {
            tracing::warn!(kind = R::KIND, error = %e, "discarding unreadable stored collection");
            Collection::new()
        }),
    }
}

/// Deserializes a collection, returning the error instead of masking it.
///
/// Every stored record must carry a unique id and pass validation.
pub fn try_decode<R: Record>(raw: &str) -> Result<Collection<R>, DecodeError> {
    let collection: Collection<R> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(collection.len());
    for (index, record) in collection.iter().enumerate() {
        let id = record.id().ok_or(DecodeError::MissingId(index))?;
        if !seen.insert(id) {
            return Err(DecodeError::DuplicateId(id));
        }
        record
            .validate()
            .map_err(|source| DecodeError::Invalid { id, source })?;
    }

    Ok(collection)
}
