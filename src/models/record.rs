use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use super::ValidationError;

/// Identifier assigned to a record when it is first persisted.
pub type RecordId = i64;

/// A catalog entry that can live in a [`Collection`](crate::Collection).
///
/// Drafts carry `id() == None`; every record that has been through the
/// repository carries a unique id that is never reassigned.
pub trait Record:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Short name of the record kind, used in log lines.
    const KIND: &'static str;

    fn id(&self) -> Option<RecordId>;

    fn set_id(&mut self, id: RecordId);

    /// Display name shown in listings.
    fn name(&self) -> &str;

    /// Checks that every required string field is non-empty.
    fn validate(&self) -> Result<(), ValidationError>;
}
