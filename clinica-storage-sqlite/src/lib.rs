//! SQLite storage backend for clinica
//!
//! Provides [`SqliteRepositoryProvider`], which implements every repository
//! trait from `clinica-core` plus schema migrations.
//!
//! ```rust,no_run
//! use clinica_core::repositories::RepositoryProvider;
//! use clinica_storage_sqlite::SqliteRepositoryProvider;
//!
//! # async fn run() -> Result<(), clinica_core::Error> {
//! let provider = SqliteRepositoryProvider::connect("sqlite://clinica.db?mode=rwc").await?;
//! provider.migrate().await?;
//! # Ok(())
//! # }
//! ```
pub mod migrations;
pub mod repositories;

pub use repositories::{
    SqlitePersonaRepository, SqliteRegistrationRepository, SqliteRepositoryProvider,
    SqliteUnitOfWork, SqliteUsuarioRepository,
};

use clinica_core::{Error, error::StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

impl SqliteRepositoryProvider {
    /// Open a pool for `database_url` with foreign keys enforced
    ///
    /// In-memory databases live and die with a single connection, so for
    /// `sqlite::memory:` the pool holds exactly one connection and never
    /// retires it.
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::Connection(format!("Invalid database URL: {e}")))?
            .foreign_keys(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to connect: {e}")))?;

        tracing::debug!(url = database_url, "Connected to SQLite");
        Ok(Self::new(pool))
    }
}
