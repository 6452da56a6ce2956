//! Connection pool manager for recipe-service.

use crate::config::DatabaseConfig;
use crate::services::error::{DatabaseError, StoreError};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

const CREATE_RECIPES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        category VARCHAR(50) NOT NULL,
        description TEXT,
        ingredients JSONB NOT NULL,
        instructions TEXT NOT NULL,
        kcal INTEGER DEFAULT 0,
        protein INTEGER DEFAULT 0,
        fat INTEGER DEFAULT 0,
        carbs INTEGER DEFAULT 0,
        created_at TIMESTAMPTZ DEFAULT NOW()
    )
"#;

const CREATE_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category)";

/// Database connection pool wrapper.
///
/// Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a bounded pool from configuration and verify the server answers.
    #[instrument(skip(config), fields(service = "recipe-service", db = %config.display_target()))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::connect_with(config.connect_options(), config).await
    }

    /// Like [`Database::connect`] with explicit connect options; pool sizing still comes from `config`.
    pub async fn connect_with(
        options: PgConnectOptions,
        config: &DatabaseConfig,
    ) -> Result<Self, DatabaseError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            acquire_timeout_secs = config.acquire_timeout.as_secs(),
            "Connecting to PostgreSQL"
        );

        let connection_error = |source: sqlx::Error| DatabaseError::Connection {
            target: config.display_target(),
            source,
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        let db = Self { pool };

        if let Err(e) = db.ping().await {
            db.close().await;
            return Err(connection_error(e));
        }

        info!("PostgreSQL connection pool established");

        Ok(db)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.ping().await.map_err(StoreError::from)
    }

    /// Create the recipes table and its category index if they are missing.
    #[instrument(skip(self))]
    pub async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_RECIPES_TABLE)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Schema)?;
        sqlx::query(CREATE_CATEGORY_INDEX)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Schema)?;

        info!("Database schema initialized");
        Ok(())
    }

    /// Close every pooled connection. Calling it again is a no-op.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("PostgreSQL connection pool closed");
        }
    }
}
