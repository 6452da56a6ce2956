//! Recipe service: category validation in front of the store.

use crate::models::{Category, Recipe};
use crate::services::error::{RecipeError, StoreError};
use crate::services::repository::RecipeStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Validate `category` and fetch one random recipe from it.
    ///
    /// An unknown category is rejected before the store is touched.
    pub async fn get_random_recipe(&self, category: &str) -> Result<Recipe, RecipeError> {
        let category: Category = category.parse()?;

        self.store
            .random_by_category(category)
            .await
            .map_err(|e| RecipeError::from_store(category, e))
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
