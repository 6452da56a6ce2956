//! Application startup and lifecycle management.

use crate::config::RecipeConfig;
use crate::handlers;
use crate::services::{init_metrics, Database, PgRecipeStore, RecipeService};
use crate::ApiDoc;
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub recipes: RecipeService,
    pub service_name: String,
    pub service_version: String,
}

impl AppState {
    pub fn new(recipes: RecipeService, config: &RecipeConfig) -> Self {
        Self {
            recipes,
            service_name: config.service_name.clone(),
            service_version: config.service_version.clone(),
        }
    }
}

/// Routes plus the request-id, metrics and tracing layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/recipe", get(handlers::get_random_recipe))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .merge(SwaggerUi::new("/swagger").url("/.well-known/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(middleware::from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    db: Database,
}

impl Application {
    /// Connect to PostgreSQL, bootstrap the schema and bind the listener.
    pub async fn build(config: RecipeConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::connect(&config.database).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        Self::with_database(config, db).await
    }

    /// Finish building around an already connected database.
    ///
    /// Takes over the pool: it is closed again if any remaining startup step fails.
    pub async fn with_database(config: RecipeConfig, db: Database) -> Result<Self, AppError> {
        match Self::assemble(config, db.clone()).await {
            Ok(app) => Ok(app),
            Err(e) => {
                db.close().await;
                Err(e)
            }
        }
    }

    async fn assemble(config: RecipeConfig, db: Database) -> Result<Self, AppError> {
        db.initialize_schema().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize database schema");
            e
        })?;

        let store = Arc::new(PgRecipeStore::new(db.clone()));
        let state = AppState::new(RecipeService::new(store), &config);
        let router = build_router(state);

        let addr: SocketAddr = config.common.bind_address().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid listen address '{}': {}",
                config.common.bind_address(),
                e
            ))
        })?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Recipe service listener bound");

        Ok(Self {
            port,
            listener,
            router,
            db,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves, then drain requests and close the pool.
    pub async fn run_until_stopped<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            service = "recipe-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await;

        self.db.close().await;

        if let Err(e) = &result {
            tracing::error!(error = %e, "HTTP server error");
        }
        result
    }
}
