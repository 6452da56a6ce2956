//! Recipe store: the category-filtered random selection query.

use crate::models::{Category, Recipe, RecipeRow};
use crate::services::database::Database;
use crate::services::error::StoreError;
use crate::services::metrics::DB_QUERY_DURATION;
use async_trait::async_trait;
use tracing::instrument;

/// Read access to stored recipes.
///
/// Callers pass an already validated [`Category`]; implementations do no validation.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Pick one recipe uniformly at random among those in `category`.
    async fn random_by_category(&self, category: Category) -> Result<Recipe, StoreError>;

    /// Liveness of the backing store.
    async fn ping(&self) -> Result<(), StoreError>;
}

// ORDER BY RANDOM() keeps the shuffle inside PostgreSQL so only one row is sent back.
const SELECT_RANDOM_BY_CATEGORY: &str = r#"
    SELECT id, title, category, description, ingredients, instructions,
           kcal, protein, fat, carbs, created_at::timestamptz AS created_at
    FROM recipes
    WHERE category = $1
    ORDER BY RANDOM()
    LIMIT 1
"#;

/// PostgreSQL-backed [`RecipeStore`].
#[derive(Clone)]
pub struct PgRecipeStore {
    db: Database,
}

impl PgRecipeStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    #[instrument(skip(self, category), fields(category = %category))]
    async fn random_by_category(&self, category: Category) -> Result<Recipe, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["random_by_category"])
            .start_timer();

        let row = sqlx::query_as::<_, RecipeRow>(SELECT_RANDOM_BY_CATEGORY)
            .bind(category.as_str())
            .fetch_optional(self.db.pool())
            .await?;

        timer.observe_duration();

        let row = row.ok_or(StoreError::NotFound)?;
        let id = row.id;

        row.into_recipe()
            .map_err(|source| StoreError::CorruptIngredients { id, source })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.health_check().await
    }
}
