//! Recipe Service - random recipe per meal category over HTTP.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GoodFood API",
        description = "Random recipes by meal category: breakfast, lunch, dinner, snack"
    ),
    paths(
        handlers::recipe::get_random_recipe,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(
        schemas(
            models::Recipe,
            models::Ingredient,
            models::Category,
            handlers::ErrorResponse,
        )
    ),
    tags(
        (name = "Recipes", description = "Recipe lookup"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;
