//! Mixtape Storage
//!
//! `SQLite` persistence for accounts, playlists and memberships.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each entity owns its own queries (`accounts`,
//!   `playlists`, `memberships`)
//! - **Atomic batches**: membership position rewrites go through one
//!   transaction per batch
//! - **Store adapter**: [`SqliteLibraryStore`] plugs the slices into
//!   `mixtape_core::LibraryStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use mixtape_storage::{create_pool, run_migrations, SqliteLibraryStore, StorageConfig};
//! use mixtape_core::{AccountId, Library};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorageConfig::load()?;
//! let pool = create_pool(&config).await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteLibraryStore::new(pool);
//! let library = Library::new(&store, AccountId::new("some-account"));
//! library.reindex().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod error;

// Vertical slices
pub mod accounts;
pub mod memberships;
pub mod playlists;

pub use config::StorageConfig;
pub use context::SqliteLibraryStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool from configuration
pub async fn create_pool(config: &StorageConfig) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    config.validate()?;
    tracing::debug!(url = %config.database_url, "Creating database pool");

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database pool created"
    );

    Ok(pool)
}
