use crate::{Error, NewPersona, Persona, PersonaId};
use async_trait::async_trait;

/// Repository for persona data access
#[async_trait]
pub trait PersonaRepository: Send + Sync + 'static {
    /// Whether a persona with this ID exists
    async fn exists(&self, id: PersonaId) -> Result<bool, Error>;

    /// Find a persona by ID
    async fn find_by_id(&self, id: PersonaId) -> Result<Option<Persona>, Error>;

    /// Insert a persona, assigning its ID
    async fn create(&self, persona: NewPersona) -> Result<Persona, Error>;

    /// Overwrite every attribute of an existing persona, keeping its ID
    ///
    /// Fails with [`StorageError::NotFound`](crate::error::StorageError::NotFound) if absent.
    async fn update(&self, id: PersonaId, persona: NewPersona) -> Result<Persona, Error>;

    /// Delete a persona and, through the foreign key, its usuario
    ///
    /// Fails with [`StorageError::NotFound`](crate::error::StorageError::NotFound) if absent.
    async fn delete(&self, id: PersonaId) -> Result<(), Error>;

    /// All personas ordered by ID
    async fn list(&self) -> Result<Vec<Persona>, Error>;
}
