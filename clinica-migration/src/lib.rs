//! Versioned schema migrations
//!
//! A storage backend describes its schema as an ordered list of [`Migration`]s
//! and implements [`MigrationManager`] to apply them, recording each applied
//! version in a bookkeeping table so that running the list again is a no-op.
use async_trait::async_trait;
use clinica_core::error::StorageError;
use sqlx::Database;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<MigrationError> for clinica_core::Error {
    fn from(error: MigrationError) -> Self {
        StorageError::Migration(error.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[async_trait]
pub trait Migration<DB: Database>: Send + Sync {
    /// Execute the migration
    async fn up<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Rollback the migration
    async fn down<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    /// Unix timestamp
    pub applied_at: i64,
}

#[async_trait]
pub trait MigrationManager<DB: Database>: Send + Sync {
    fn get_migration_table_name(&self) -> &str {
        "_clinica_migrations"
    }

    /// Create the bookkeeping table if it does not exist yet
    async fn initialize(&self) -> Result<()>;

    /// Apply every migration not yet recorded, in version order
    async fn up(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Revert every recorded migration, newest first
    async fn down(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>>;

    async fn is_applied(&self, version: i64) -> Result<bool>;
}

/// Reject migration lists with duplicate versions; returns the versions in ascending order
pub fn check_versions<DB: Database>(migrations: &[Box<dyn Migration<DB>>]) -> Result<Vec<i64>> {
    let mut versions: Vec<i64> = migrations.iter().map(|m| m.version()).collect();
    versions.sort_unstable();
    if let Some(pair) = versions.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(MigrationError::Migration(format!(
            "Duplicate migration version {}",
            pair[0]
        )));
    }
    Ok(versions)
}
