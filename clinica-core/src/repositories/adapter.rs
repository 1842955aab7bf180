use crate::{
    Error, NewPersona, NewUsuario, Persona, PersonaId, Usuario, UsuarioId,
    repositories::{
        PersonaRepository, RegistrationRepository, RepositoryProvider, UnitOfWork,
        UsuarioRepository,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Adapter that wraps a RepositoryProvider and implements PersonaRepository
pub struct PersonaRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> PersonaRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> PersonaRepository for PersonaRepositoryAdapter<R> {
    async fn exists(&self, id: PersonaId) -> Result<bool, Error> {
        self.provider.persona().exists(id).await
    }

    async fn find_by_id(&self, id: PersonaId) -> Result<Option<Persona>, Error> {
        self.provider.persona().find_by_id(id).await
    }

    async fn create(&self, persona: NewPersona) -> Result<Persona, Error> {
        self.provider.persona().create(persona).await
    }

    async fn update(&self, id: PersonaId, persona: NewPersona) -> Result<Persona, Error> {
        self.provider.persona().update(id, persona).await
    }

    async fn delete(&self, id: PersonaId) -> Result<(), Error> {
        self.provider.persona().delete(id).await
    }

    async fn list(&self) -> Result<Vec<Persona>, Error> {
        self.provider.persona().list().await
    }
}

pub struct UsuarioRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> UsuarioRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> UsuarioRepository for UsuarioRepositoryAdapter<R> {
    async fn exists_by_correo(&self, correo: &str) -> Result<bool, Error> {
        self.provider.usuario().exists_by_correo(correo).await
    }

    async fn exists_by_persona_id(&self, persona_id: PersonaId) -> Result<bool, Error> {
        self.provider
            .usuario()
            .exists_by_persona_id(persona_id)
            .await
    }

    async fn find_by_id(&self, id: UsuarioId) -> Result<Option<Usuario>, Error> {
        self.provider.usuario().find_by_id(id).await
    }

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Usuario>, Error> {
        self.provider.usuario().find_by_correo(correo).await
    }

    async fn get_password_hash(&self, id: UsuarioId) -> Result<Option<String>, Error> {
        self.provider.usuario().get_password_hash(id).await
    }

    async fn create(&self, usuario: NewUsuario) -> Result<Usuario, Error> {
        self.provider.usuario().create(usuario).await
    }

    async fn update(&self, id: UsuarioId, usuario: NewUsuario) -> Result<Usuario, Error> {
        self.provider.usuario().update(id, usuario).await
    }

    async fn delete(&self, id: UsuarioId) -> Result<(), Error> {
        self.provider.usuario().delete(id).await
    }

    async fn list(&self) -> Result<Vec<Usuario>, Error> {
        self.provider.usuario().list().await
    }
}

pub struct RegistrationRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> RegistrationRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> RegistrationRepository for RegistrationRepositoryAdapter<R> {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, Error> {
        self.provider.registration().begin().await
    }
}
