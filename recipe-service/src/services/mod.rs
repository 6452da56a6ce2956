//! Services module for recipe-service.

pub mod database;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod recipe;
pub mod repository;

pub use database::Database;
pub use error::{DatabaseError, RecipeError, StoreError};
pub use memory::InMemoryRecipeStore;
pub use metrics::{get_metrics, init_metrics, record_lookup};
pub use recipe::RecipeService;
pub use repository::{PgRecipeStore, RecipeStore};
