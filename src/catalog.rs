//! The recipe and ingredient repositories a screen mounts together.

use crate::models::{Ingredient, Recipe};
use crate::repository::Repository;
use crate::seed;
use crate::store::KeyValueStore;
use crate::Collection;

pub const RECIPES_KEY: &str = "recipes";
pub const INGREDIENTS_KEY: &str = "ingredients";

/// Storage keys for the two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogKeys {
    pub recipes: String,
    pub ingredients: String,
}

impl Default for CatalogKeys {
    fn default() -> Self {
        Self {
            recipes: RECIPES_KEY.to_string(),
            ingredients: INGREDIENTS_KEY.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Catalog<S> {
    pub recipes: Repository<Recipe, S>,
    pub ingredients: Repository<Ingredient, S>,
}

impl<S: KeyValueStore + Clone> Catalog<S> {
    pub fn new(store: S, keys: CatalogKeys) -> Self {
        Self {
            recipes: Repository::new(store.clone(), keys.recipes),
            ingredients: Repository::new(store, keys.ingredients),
        }
    }

    /// Starts never-written collections from the built-in examples.
    pub fn with_examples(self) -> Self {
        Self {
            recipes: self.recipes.with_seed(seed::example_recipes()),
            ingredients: self.ingredients.with_seed(seed::example_ingredients()),
        }
    }
}

impl<S: KeyValueStore> Catalog<S> {
    /// Loads both collections concurrently.
    pub async fn load_all(&self) -> (Collection<Recipe>, Collection<Ingredient>) {
        tokio::join!(self.recipes.load(), self.ingredients.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_load_all_empty_store() {
        let catalog = Catalog::new(MemoryStore::new(), CatalogKeys::default());
        let (recipes, ingredients) = catalog.load_all().await;
        assert!(recipes.is_empty());
        assert!(ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_with_examples_seeds_both() {
        let store = MemoryStore::new();
        let catalog = Catalog::new(store.clone(), CatalogKeys::default()).with_examples();

        let (recipes, ingredients) = catalog.load_all().await;
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes.as_slice()[0].name, "Pizza Marguerita");
        assert_eq!(ingredients.len(), 2);
        assert!(store.raw(RECIPES_KEY).is_some());
        assert!(store.raw(INGREDIENTS_KEY).is_some());
    }

    #[tokio::test]
    async fn test_collections_use_separate_keys() {
        let store = MemoryStore::new();
        let catalog = Catalog::new(store.clone(), CatalogKeys::default());

        catalog
            .ingredients
            .upsert(Ingredient::new("Rice", "Grains"))
            .await
            .unwrap();

        assert!(store.raw(INGREDIENTS_KEY).unwrap().contains("Rice"));
        assert_eq!(store.raw(RECIPES_KEY), None);
        assert!(catalog.recipes.load().await.is_empty());
    }
}
