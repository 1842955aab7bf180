use crate::{
    Error, NewUsuario, PersonaId, Usuario, UsuarioDetalle, UsuarioId, UsuarioInput,
    crypto::hash_password,
    error::utilities::FoundExt,
    repositories::{PersonaRepository, UsuarioRepository},
};
use std::sync::Arc;

/// Service for administrative usuario management
pub struct UsuarioService<U: UsuarioRepository, P: PersonaRepository> {
    usuarios: Arc<U>,
    personas: Arc<P>,
}

impl<U: UsuarioRepository, P: PersonaRepository> UsuarioService<U, P> {
    pub fn new(usuarios: Arc<U>, personas: Arc<P>) -> Self {
        Self { usuarios, personas }
    }

    pub async fn list_usuarios(&self) -> Result<Vec<Usuario>, Error> {
        self.usuarios.list().await
    }

    pub async fn get_usuario(&self, id: UsuarioId) -> Result<Usuario, Error> {
        self.usuarios.find_by_id(id).await?.or_not_found("Usuario")
    }

    /// Get a usuario together with its persona
    pub async fn get_usuario_detalle(&self, id: UsuarioId) -> Result<UsuarioDetalle, Error> {
        let usuario = self.get_usuario(id).await?;
        self.with_persona(usuario).await
    }

    pub async fn with_persona(&self, usuario: Usuario) -> Result<UsuarioDetalle, Error> {
        let persona = self
            .personas
            .find_by_id(usuario.persona_id)
            .await?
            .or_not_found("Persona")?;
        Ok(UsuarioDetalle { usuario, persona })
    }

    /// Create a usuario for an existing persona
    ///
    /// The persona must exist, must not already own a usuario, and the email
    /// must be free. The password is hashed before it reaches the store.
    pub async fn create_usuario(&self, input: &UsuarioInput) -> Result<Usuario, Error> {
        let data = input.validate()?;
        self.require_persona(data.persona_id).await?;

        if self.usuarios.exists_by_persona_id(data.persona_id).await? {
            return Err(Error::conflict("Persona already has a usuario"));
        }
        if self.usuarios.exists_by_correo(&data.correo).await? {
            return Err(Error::conflict("Email already registered"));
        }

        let password_hash = hash_password(&data.contrasena).await?;
        let usuario = self
            .usuarios
            .create(NewUsuario {
                persona_id: data.persona_id,
                rol: data.rol,
                correo: data.correo,
                password_hash,
            })
            .await?;

        tracing::info!(usuario_id = %usuario.id, rol = %usuario.rol, "Usuario created");
        Ok(usuario)
    }

    /// Overwrite a usuario, re-hashing the supplied password
    pub async fn update_usuario(
        &self,
        id: UsuarioId,
        input: &UsuarioInput,
    ) -> Result<Usuario, Error> {
        let data = input.validate()?;
        let existing = self.get_usuario(id).await?;
        self.require_persona(data.persona_id).await?;

        if existing.correo != data.correo && self.usuarios.exists_by_correo(&data.correo).await? {
            return Err(Error::conflict("Email already registered"));
        }

        let password_hash = hash_password(&data.contrasena).await?;
        self.usuarios
            .update(
                id,
                NewUsuario {
                    persona_id: data.persona_id,
                    rol: data.rol,
                    correo: data.correo,
                    password_hash,
                },
            )
            .await
    }

    pub async fn delete_usuario(&self, id: UsuarioId) -> Result<(), Error> {
        self.usuarios.delete(id).await?;
        tracing::info!(usuario_id = %id, "Usuario deleted");
        Ok(())
    }

    async fn require_persona(&self, persona_id: PersonaId) -> Result<(), Error> {
        if self.personas.exists(persona_id).await? {
            Ok(())
        } else {
            Err(Error::not_found("Persona"))
        }
    }
}
