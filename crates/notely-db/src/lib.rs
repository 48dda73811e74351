//! # notely-db
//!
//! SQLite database layer for notely.
//!
//! This crate provides:
//! - Connection pool management
//! - Schema migrations
//! - The note repository (CRUD and substring search)
//!
//! ## Example
//!
//! ```rust,ignore
//! use notely_db::{CreateNoteRequest, Database, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://notely.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let note = db
//!         .notes
//!         .insert(CreateNoteRequest::new("Groceries", "Milk, eggs"))
//!         .await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod notes;
pub mod pool;

// Re-export core types
pub use notely_core::*;

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
///
/// Pair with `ESCAPE '\'` in the SQL so the input matches literally.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use notes::SqliteNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig, IN_MEMORY_URL};

use pool::log_pool_metrics;

/// Database handle bundling the pool and repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Note repository for CRUD operations.
    pub notes: SqliteNoteRepository,
}

impl Database {
    /// Create a new database handle from an existing pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            notes: SqliteNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to a database by URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Open a fresh private in-memory database with the schema applied.
    pub async fn connect_in_memory() -> Result<Self> {
        let db = Self::connect(IN_MEMORY_URL).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Round-trip a trivial query to verify the database is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        log_pool_metrics(&self.pool);
        Ok(())
    }

    /// Close all connections. Further queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}
