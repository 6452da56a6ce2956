//! Common test utilities for recipe-service integration tests.

#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use chrono::Utc;
use http_body_util::BodyExt;
use recipe_service::config::RecipeConfig;
use recipe_service::models::{recipe::encode_ingredients, Category, Ingredient, Recipe};
use recipe_service::services::{Database, InMemoryRecipeStore, RecipeService};
use recipe_service::startup::{build_router, AppState};
use service_core::config::Config as CommonConfig;
use sqlx::postgres::{PgConnectOptions, PgPool};
use std::str::FromStr;
use std::sync::{Arc, Once};
use tower::util::ServiceExt;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,recipe_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Configuration pointing at a local listener on a random port.
pub fn test_config() -> RecipeConfig {
    let common = CommonConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    RecipeConfig::from_lookup(common, |key| match key {
        "SERVICE_NAME" => Some("recipe-service-test".to_string()),
        "POSTGRES_USER" => Some("postgres".to_string()),
        "POSTGRES_PASSWORD" => Some("postgres".to_string()),
        "POSTGRES_DB" => Some("recipes_test".to_string()),
        "DATABASE_MAX_CONNECTIONS" => Some("2".to_string()),
        _ => None,
    })
    .expect("Failed to build test configuration")
}

pub fn recipe(id: i32, category: Category, title: &str) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        category: category.as_str().to_string(),
        description: format!("{title}, the usual way"),
        ingredients: vec![
            Ingredient {
                name: "Oats".to_string(),
                amount: "80g".to_string(),
            },
            Ingredient {
                name: "Milk".to_string(),
                amount: "200ml".to_string(),
            },
        ],
        instructions: "Combine and cook.".to_string(),
        kcal: 350,
        protein: 12,
        fat: 7,
        carbs: 55,
        created_at: Utc::now(),
    }
}

/// Router backed by an in-memory store holding `recipes`.
pub fn memory_app(recipes: Vec<Recipe>) -> (Router, Arc<InMemoryRecipeStore>) {
    init_tracing();
    let store = Arc::new(InMemoryRecipeStore::with_recipes(recipes));
    let state = AppState::new(RecipeService::new(store.clone()), &test_config());
    (build_router(state), store)
}

pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// A PostgreSQL schema private to one test, dropped by [`TestDatabase::cleanup`].
pub struct TestDatabase {
    pub db: Database,
    pub schema: String,
    admin: PgPool,
}

impl TestDatabase {
    pub async fn spawn() -> Self {
        init_tracing();

        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set to run PostgreSQL-backed tests");

        let admin = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        let schema = format!("recipe_test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");

        let options = PgConnectOptions::from_str(&database_url)
            .expect("Invalid TEST_DATABASE_URL")
            .options([("search_path", schema.as_str())]);

        let db = Database::connect_with(options, &test_config().database)
            .await
            .expect("Failed to connect test pool");

        Self { db, schema, admin }
    }

    pub async fn insert(&self, recipe: &Recipe) -> i32 {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO recipes (title, category, description, ingredients, instructions, kcal, protein, fat, carbs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&recipe.title)
        .bind(&recipe.category)
        .bind(&recipe.description)
        .bind(encode_ingredients(&recipe.ingredients).expect("Failed to encode ingredients"))
        .bind(&recipe.instructions)
        .bind(recipe.kcal)
        .bind(recipe.protein)
        .bind(recipe.fat)
        .bind(recipe.carbs)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to insert recipe")
    }

    /// Server backends connected to this database, excluding the admin session asking.
    pub async fn backend_connections(&self) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM pg_stat_activity WHERE datname = current_database() AND pid <> pg_backend_pid()",
        )
        .fetch_one(&self.admin)
        .await
        .expect("Failed to count backend connections")
    }

    pub async fn cleanup(self) {
        self.db.close().await;
        let _ = sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await;
        self.admin.close().await;
    }
}
