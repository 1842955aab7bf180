use async_trait::async_trait;
use clinica_core::{
    Error, NewPersona, NewUsuario, Persona, Usuario,
    error::utilities::DatabaseResultExt,
    repositories::{RegistrationRepository, UnitOfWork},
};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{persona::insert_persona, usuario::insert_usuario};

/// A unit of work backed by one SQLite transaction
///
/// `sqlx` rolls a [`Transaction`] back when it is dropped uncommitted.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn create_persona(&mut self, persona: NewPersona) -> Result<Persona, Error> {
        insert_persona(&mut *self.tx, persona).await
    }

    async fn create_usuario(&mut self, usuario: NewUsuario) -> Result<Usuario, Error> {
        insert_usuario(&mut *self.tx, usuario).await
    }

    async fn commit(self: Box<Self>) -> Result<(), Error> {
        let SqliteUnitOfWork { tx } = *self;
        tx.commit()
            .await
            .map_db_err_with_context("Failed to commit transaction")
    }

    async fn rollback(self: Box<Self>) -> Result<(), Error> {
        let SqliteUnitOfWork { tx } = *self;
        tx.rollback()
            .await
            .map_db_err_with_context("Failed to roll back transaction")
    }
}

#[derive(Debug)]
pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, Error> {
        let tx = self
            .pool
            .begin()
            .await
            .map_db_err_with_context("Failed to begin transaction")?;

        Ok(Box::new(SqliteUnitOfWork { tx }))
    }
}
