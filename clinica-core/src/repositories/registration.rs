use crate::{Error, NewPersona, NewUsuario, Persona, Usuario};
use async_trait::async_trait;

/// An open atomic unit of work spanning persona and usuario writes
///
/// Nothing written through a unit is visible to other callers until
/// [`commit`](UnitOfWork::commit) succeeds. Dropping a unit without committing
/// it discards every write, so an early `?` return leaves the store untouched.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn create_persona(&mut self, persona: NewPersona) -> Result<Persona, Error>;

    async fn create_usuario(&mut self, usuario: NewUsuario) -> Result<Usuario, Error>;

    async fn commit(self: Box<Self>) -> Result<(), Error>;

    async fn rollback(self: Box<Self>) -> Result<(), Error>;
}

/// Repository able to open units of work
#[async_trait]
pub trait RegistrationRepository: Send + Sync + 'static {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, Error>;
}
