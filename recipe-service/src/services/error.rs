use crate::models::{Category, InvalidCategory};
use service_core::error::AppError;
use thiserror::Error;

/// Startup failures of the connection pool manager.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to initialize schema: {0}")]
    Schema(#[source] sqlx::Error),
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

/// Failures of the recipe store. The store never logs these itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No recipe available")]
    NotFound,

    #[error("Timed out waiting for a database connection")]
    Unavailable(#[source] sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Recipe {id} has corrupt ingredients: {source}")]
    CorruptIngredients {
        id: i32,
        #[source]
        source: serde_json::Error,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Unavailable(err),
            other => StoreError::Query(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error(transparent)]
    InvalidCategory(#[from] InvalidCategory),

    #[error("No recipe available for category '{0}'")]
    NotFound(Category),

    #[error("Recipe store unavailable for category '{category}'")]
    Unavailable {
        category: Category,
        #[source]
        source: StoreError,
    },

    #[error("Failed to fetch recipe for category '{category}': {source}")]
    Store {
        category: Category,
        #[source]
        source: StoreError,
    },
}

impl RecipeError {
    /// Wrap a store failure with the category it was for, keeping its kind.
    pub fn from_store(category: Category, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => RecipeError::NotFound(category),
            err @ StoreError::Unavailable(_) => RecipeError::Unavailable {
                category,
                source: err,
            },
            err => RecipeError::Store {
                category,
                source: err,
            },
        }
    }

    /// The validated category, when validation got that far.
    pub fn category(&self) -> Option<Category> {
        match self {
            RecipeError::InvalidCategory(_) => None,
            RecipeError::NotFound(category)
            | RecipeError::Unavailable { category, .. }
            | RecipeError::Store { category, .. } => Some(*category),
        }
    }

    /// Short label for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            RecipeError::InvalidCategory(_) => "invalid_category",
            RecipeError::NotFound(_) => "not_found",
            RecipeError::Unavailable { .. } => "unavailable",
            RecipeError::Store { .. } => "error",
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            RecipeError::Unavailable { .. } | RecipeError::Store { .. }
        )
    }
}

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::InvalidCategory(e) => AppError::BadRequest(anyhow::Error::new(e)),
            e @ RecipeError::NotFound(_) => AppError::NotFound(anyhow::anyhow!(e.to_string())),
            RecipeError::Unavailable { .. } => AppError::ServiceUnavailable,
            e @ RecipeError::Store { .. } => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}
