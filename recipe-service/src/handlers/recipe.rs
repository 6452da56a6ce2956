use crate::models::{Category, Recipe};
use crate::services::record_lookup;
use crate::startup::AppState;
use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;
use serde::Deserialize;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub category: Option<String>,
}

/// Get a random recipe from a category
#[utoipa::path(
    get,
    path = "/api/recipe",
    params(
        ("category" = Category, Query, description = "Meal category: breakfast, lunch, dinner or snack")
    ),
    responses(
        (status = 200, description = "A random recipe from the category", body = Recipe),
        (status = 400, description = "Category missing or not one of the known categories", body = crate::handlers::ErrorResponse),
        (status = 404, description = "No recipe stored for the category", body = crate::handlers::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::handlers::ErrorResponse),
        (status = 503, description = "No database connection available in time", body = crate::handlers::ErrorResponse)
    ),
    tag = "Recipes"
)]
pub async fn get_random_recipe(
    State(state): State<AppState>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> Result<Json<Recipe>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::BadRequest(anyhow::anyhow!(
            "invalid query string: {}",
            rejection.body_text()
        ))
    })?;

    let category = query
        .category
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("category query parameter is required"))
        })?;

    match state.recipes.get_random_recipe(&category).await {
        Ok(recipe) => {
            record_lookup(&category, "ok");
            tracing::debug!(recipe_id = recipe.id, category = %category, "Recipe selected");
            Ok(Json(recipe))
        }
        Err(e) => {
            // Unknown categories share one label so clients cannot grow the series set.
            let label = e.category().as_ref().map_or("invalid", Category::as_str);
            record_lookup(label, e.outcome());

            if e.is_server_error() {
                tracing::error!(error = %e, category = %label, "Random recipe lookup failed");
            } else {
                tracing::debug!(error = %e, "Random recipe lookup rejected");
            }
            Err(e.into())
        }
    }
}
