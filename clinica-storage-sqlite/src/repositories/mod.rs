//! Repository implementations for SQLite storage

pub mod persona;
pub mod registration;
pub mod usuario;

pub use persona::SqlitePersonaRepository;
pub use registration::{SqliteRegistrationRepository, SqliteUnitOfWork};
pub use usuario::SqliteUsuarioRepository;

use async_trait::async_trait;
use clinica_core::{
    Error,
    error::StorageError,
    repositories::{
        PersonaRepositoryProvider, RegistrationRepositoryProvider, RepositoryProvider,
        UsuarioRepositoryProvider,
    },
};
use clinica_migration::MigrationManager;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::migrations::{self, SqliteMigrationManager};

/// Repository provider implementation for SQLite
///
/// Every repository shares the same pool. The registration repository opens
/// its own transaction per unit of work.
#[derive(Debug)]
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    persona: Arc<SqlitePersonaRepository>,
    usuario: Arc<SqliteUsuarioRepository>,
    registration: Arc<SqliteRegistrationRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let persona = Arc::new(SqlitePersonaRepository::new(pool.clone()));
        let usuario = Arc::new(SqliteUsuarioRepository::new(pool.clone()));
        let registration = Arc::new(SqliteRegistrationRepository::new(pool.clone()));

        Self {
            pool,
            persona,
            usuario,
            registration,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Revert every migration, newest first
    pub async fn rollback_migrations(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await?;
        manager.down(&migrations::all()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to revert migrations");
            Error::Storage(StorageError::Migration(
                "Failed to revert migrations".to_string(),
            ))
        })
    }
}

impl PersonaRepositoryProvider for SqliteRepositoryProvider {
    type PersonaRepo = SqlitePersonaRepository;

    fn persona(&self) -> &Self::PersonaRepo {
        &self.persona
    }
}

impl UsuarioRepositoryProvider for SqliteRepositoryProvider {
    type UsuarioRepo = SqliteUsuarioRepository;

    fn usuario(&self) -> &Self::UsuarioRepo {
        &self.usuario
    }
}

impl RegistrationRepositoryProvider for SqliteRepositoryProvider {
    type RegistrationRepo = SqliteRegistrationRepository;

    fn registration(&self) -> &Self::RegistrationRepo {
        &self.registration
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        manager.up(&migrations::all()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(
                "Failed to run migrations".to_string(),
            ))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;
        Ok(())
    }
}
