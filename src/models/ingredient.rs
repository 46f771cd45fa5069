use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::{Record, RecordId};
use super::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    pub category: String,
}

impl Ingredient {
    /// Creates a draft ingredient with no id.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Case-insensitive category match.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.trim().to_lowercase() == category.trim().to_lowercase()
    }
}

impl Record for Ingredient {
    const KIND: &'static str = "ingredient";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match ValidationError::check(&[
            ("name", self.name.as_str()),
            ("category", self.category.as_str()),
        ]) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;

        if let Some(id) = self.id {
            writeln!(f, "ID: {}", id)?;
        }

        write!(f, "Category: {}", self.category)
    }
}
