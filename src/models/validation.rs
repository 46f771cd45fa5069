use thiserror::Error;

/// One or more required fields of a draft were empty.
///
/// Field names are listed in declaration order so callers can point the user
/// at the first offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Fill in all fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

impl ValidationError {
    /// Builds an error from `(name, value)` pairs, keeping the blank ones.
    ///
    /// Returns `None` when every value has non-whitespace content.
    pub fn check(fields: &[(&'static str, &str)]) -> Option<Self> {
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            None
        } else {
            Some(Self { fields: missing })
        }
    }
}
