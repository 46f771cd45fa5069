use serde::{Deserialize, Serialize};

use crate::models::{Record, RecordId};

/// An ordered sequence of records of one kind.
///
/// Insertion order is preserved. Only the repository mutates a collection;
/// callers receive owned snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    pub fn contains_id(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().filter_map(|r| r.id())
    }

    pub(crate) fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == Some(id))
    }

    pub(crate) fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub(crate) fn replace(&mut self, index: usize, record: R) {
        self.records[index] = record;
    }

    /// Drops the record with `id`, returning whether one was present.
    pub(crate) fn remove(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != Some(id));
        self.records.len() != before
    }
}

impl<R> From<Vec<R>> for Collection<R> {
    fn from(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R> IntoIterator for Collection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
