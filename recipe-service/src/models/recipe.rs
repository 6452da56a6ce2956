use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One component of a recipe, e.g. `{"name": "Milk", "amount": "200ml"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    /// Free-form quantity.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub kcal: i32,
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
    pub created_at: DateTime<Utc>,
}

/// A `recipes` row as read from PostgreSQL, before the ingredients document is decoded.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub ingredients: serde_json::Value,
    pub instructions: String,
    pub kcal: Option<i32>,
    pub protein: Option<i32>,
    pub fat: Option<i32>,
    pub carbs: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl RecipeRow {
    /// Decode the JSONB ingredients and fill storage defaults for nullable columns.
    pub fn into_recipe(self) -> Result<Recipe, serde_json::Error> {
        let ingredients = decode_ingredients(self.ingredients)?;

        Ok(Recipe {
            id: self.id,
            title: self.title,
            category: self.category,
            description: self.description.unwrap_or_default(),
            ingredients,
            instructions: self.instructions,
            kcal: self.kcal.unwrap_or(0),
            protein: self.protein.unwrap_or(0),
            fat: self.fat.unwrap_or(0),
            carbs: self.carbs.unwrap_or(0),
            created_at: self.created_at,
        })
    }
}

/// Storage representation of an ingredient list.
pub fn encode_ingredients(
    ingredients: &[Ingredient],
) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(ingredients)
}

pub fn decode_ingredients(value: serde_json::Value) -> Result<Vec<Ingredient>, serde_json::Error> {
    serde_json::from_value(value)
}
