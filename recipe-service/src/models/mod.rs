//! Domain models for recipe-service.

pub mod category;
pub mod recipe;

pub use category::{Category, InvalidCategory};
pub use recipe::{Ingredient, Recipe, RecipeRow};
