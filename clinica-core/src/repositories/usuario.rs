use crate::{Error, NewUsuario, PersonaId, Usuario, UsuarioId};
use async_trait::async_trait;

/// Repository for usuario data access
///
/// Password hashes are written as part of [`NewUsuario`] but never returned
/// inside a [`Usuario`]; [`get_password_hash`](UsuarioRepository::get_password_hash)
/// is the only way to read one back.
#[async_trait]
pub trait UsuarioRepository: Send + Sync + 'static {
    async fn exists_by_correo(&self, correo: &str) -> Result<bool, Error>;

    async fn exists_by_persona_id(&self, persona_id: PersonaId) -> Result<bool, Error>;

    async fn find_by_id(&self, id: UsuarioId) -> Result<Option<Usuario>, Error>;

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Usuario>, Error>;

    /// Get the stored password hash of a usuario
    async fn get_password_hash(&self, id: UsuarioId) -> Result<Option<String>, Error>;

    /// Insert a usuario, assigning its ID
    ///
    /// A taken email fails with [`StorageError::Conflict`](crate::error::StorageError::Conflict).
    async fn create(&self, usuario: NewUsuario) -> Result<Usuario, Error>;

    /// Overwrite an existing usuario, including its password hash
    async fn update(&self, id: UsuarioId, usuario: NewUsuario) -> Result<Usuario, Error>;

    async fn delete(&self, id: UsuarioId) -> Result<(), Error>;

    /// All usuarios ordered by ID
    async fn list(&self) -> Result<Vec<Usuario>, Error>;
}
