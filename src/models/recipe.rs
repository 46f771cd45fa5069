use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::{Record, RecordId};
use super::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    /// Free-text ingredient list, e.g. "Flour, cheese".
    pub ingredients: String,
    pub steps: String,
}

impl Recipe {
    /// Creates a draft recipe with no id.
    pub fn new(
        name: impl Into<String>,
        ingredients: impl Into<String>,
        steps: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            ingredients: ingredients.into(),
            steps: steps.into(),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }
}

impl Record for Recipe {
    const KIND: &'static str = "recipe";

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
            ("ingredients", self.ingredients.as_str()),
            ("steps", self.steps.as_str()),
        ]) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;

        if let Some(id) = self.id {
            writeln!(f, "ID: {}", id)?;
        }

        writeln!(f, "\nIngredients:\n{}", self.ingredients)?;
        write!(f, "\nSteps:\n{}", self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_new_is_draft() {
        let recipe = Recipe::new("Pizza", "Flour, cheese", "Mix and bake");
        assert_eq!(recipe.id, None);
        assert_eq!(recipe.name, "Pizza");
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let recipe = Recipe::new("", "x", "y");
        let err = recipe.validate().unwrap_err();
        assert_eq!(err.fields, vec!["name"]);
    }

    #[test]
    fn test_validate_all_empty() {
        let err = Recipe::new(" ", "", "\n").validate().unwrap_err();
        assert_eq!(err.fields, vec!["name", "ingredients", "steps"]);
    }

    #[test]
    fn test_recipe_json_without_id_is_draft() {
        let parsed: Recipe =
            serde_json::from_str(r#"{"name":"Soup","ingredients":"Water","steps":"Boil"}"#)
                .unwrap();
        assert_eq!(parsed.id, None);
        assert_eq!(parsed.name, "Soup");
    }

    #[test]
    fn test_recipe_display() {
        let recipe = Recipe::new("Sushi", "Rice, fish", "Roll it").with_id(7);
        let output = format!("{}", recipe);
        assert!(output.starts_with("Sushi\n=====\n"));
        assert!(output.contains("ID: 7"));
        assert!(output.contains("Ingredients:\nRice, fish"));
        assert!(output.contains("Steps:\nRoll it"));
    }
}
