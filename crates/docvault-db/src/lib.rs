//! # docvault-db
//!
//! PostgreSQL database layer for docvault.
//!
//! This crate provides:
//! - Connection pool management
//! - The document catalog (title-unique metadata rows)
//! - The comment repository (rows cascade with their document)
//! - Embedded migrations (feature `migrations`)
//! - An in-memory catalog for tests (feature `mock`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use docvault_db::{Database, DocumentCatalog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/docvault").await?;
//!     let taken = db.documents.exists_by_title("Annual report").await?;
//!     println!("title taken: {}", taken);
//!     Ok(())
//! }
//! ```
pub mod comments;
pub mod documents;
#[cfg(feature = "mock")]
pub mod memory;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use docvault_core::*;

pub use comments::PgCommentRepository;
pub use documents::{PgDocumentCatalog, TITLE_UNIQUE_CONSTRAINT};
#[cfg(feature = "mock")]
pub use memory::{InsertFailure, MemoryCatalog};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

use std::sync::Arc;

/// Combined database context with all repositories.
///
/// Repositories are held behind `Arc` so they can be handed to services as
/// trait objects.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Document metadata catalog.
    pub documents: Arc<PgDocumentCatalog>,
    /// Comments attached to documents.
    pub comments: Arc<PgCommentRepository>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            documents: Arc::new(PgDocumentCatalog::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Cheap liveness probe used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
