pub mod health;
pub mod metrics;
pub mod recipe;

pub use health::{health_check, readiness_check};
pub use recipe::get_random_recipe;

use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "category query parameter is required")]
    pub error: String,
}
