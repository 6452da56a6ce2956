//! In-memory [`RecipeStore`] used to run the HTTP stack without PostgreSQL.

use crate::models::{Category, Recipe};
use crate::services::error::StoreError;
use crate::services::repository::RecipeStore;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Failure the in-memory store can be told to return from every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Behaves like an exhausted pool.
    Unavailable,
    /// Behaves like a failed query.
    Query,
    /// Behaves like a row whose ingredients document cannot be decoded.
    CorruptIngredients,
}

#[derive(Default)]
pub struct InMemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
    failure: RwLock<Option<InjectedFailure>>,
    calls: AtomicUsize,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        let store = Self::new();
        for recipe in recipes {
            store.insert(recipe);
        }
        store
    }

    pub fn insert(&self, recipe: Recipe) {
        self.recipes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(recipe);
    }

    pub fn fail_with(&self, failure: Option<InjectedFailure>) {
        *self.failure.write().unwrap_or_else(|e| e.into_inner()) = failure;
    }

    /// Number of `random_by_category` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn injected(&self) -> Option<StoreError> {
        let failure = *self.failure.read().unwrap_or_else(|e| e.into_inner());
        failure.map(|f| match f {
            InjectedFailure::Unavailable => StoreError::Unavailable(sqlx::Error::PoolTimedOut),
            InjectedFailure::Query => StoreError::Query(sqlx::Error::Protocol(
                "injected query failure".to_string(),
            )),
            InjectedFailure::CorruptIngredients => StoreError::CorruptIngredients {
                id: 0,
                source: serde::de::Error::custom("injected corrupt ingredients"),
            },
        })
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn random_by_category(&self, category: Category) -> Result<Recipe, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.injected() {
            return Err(err);
        }

        let recipes = self.recipes.read().unwrap_or_else(|e| e.into_inner());
        let matching: Vec<&Recipe> = recipes
            .iter()
            .filter(|r| r.category == category.as_str())
            .collect();

        matching
            .choose(&mut rand::thread_rng())
            .map(|r| (*r).clone())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self.injected() {
            Some(StoreError::Unavailable(e)) => Err(StoreError::Unavailable(e)),
            _ => Ok(()),
        }
    }
}
