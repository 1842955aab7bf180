//! # Clinica
//!
//! Clinica is the backend of a small clinic: it keeps person records
//! ([`Persona`]), the accounts attached to them ([`Usuario`]) and handles
//! self-registration and login.
//!
//! The [`Clinica`] coordinator wires the services from `clinica-core` to a
//! storage backend implementing [`RepositoryProvider`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use clinica::{Clinica, LoginRequest, RegistroInput};
//! use clinica_storage_sqlite::SqliteRepositoryProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), clinica::Error> {
//!     let repositories = Arc::new(SqliteRepositoryProvider::connect("sqlite::memory:").await?);
//!     let clinica = Clinica::new(repositories);
//!     clinica.migrate().await?;
//!
//!     let registro = clinica
//!         .register(&RegistroInput {
//!             nombre: "Ana".to_string(),
//!             apellido_paterno: "García".to_string(),
//!             apellido_materno: "López".to_string(),
//!             correo: "ana@example.com".to_string(),
//!             fecha_nacimiento: "17/05/1990".to_string(),
//!             genero: "femenino".to_string(),
//!             contrasena: "s3cretos!".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let login = clinica
//!         .login(&LoginRequest {
//!             correo: registro.correo,
//!             contrasena: "s3cretos!".to_string(),
//!         })
//!         .await?;
//!     println!("token: {}", login.token);
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use chrono::Duration;
use clinica_core::{
    repositories::{
        PersonaRepositoryAdapter, RegistrationRepositoryAdapter, RepositoryProvider,
        UsuarioRepositoryAdapter,
    },
    services::{AuthService, PersonaService, RegistrationService, UsuarioService},
    token::DEFAULT_TOKEN_TTL,
};

/// Re-export core types from clinica_core
pub use clinica_core::{
    Error, Genero, JwtAlgorithm, JwtConfig, NewPersona, Persona, PersonaId, PersonaInput,
    RegistroInput, RegistroResponse, Rol, TokenClaims, TokenIssuer, Usuario, UsuarioDetalle,
    UsuarioId, UsuarioInput,
    error,
    services::{LoginRequest, LoginResponse},
};

#[cfg(feature = "sqlite")]
pub use clinica_storage_sqlite::SqliteRepositoryProvider;

/// How access tokens are signed and how long they live
///
/// ```rust
/// use clinica::{JwtConfig, TokenConfig};
/// use chrono::Duration;
///
/// let config = TokenConfig::new(JwtConfig::new_hs256(b"a shared secret".to_vec()))
///     .expires_in(Duration::hours(8));
/// ```
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// The duration until an issued token expires
    pub expires_in: Duration,
    pub jwt: JwtConfig,
}

impl TokenConfig {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            expires_in: DEFAULT_TOKEN_TTL,
            jwt,
        }
    }

    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.expires_in = duration;
        self
    }

    fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(self.jwt.clone()).with_expires_in(self.expires_in)
    }
}

impl Default for TokenConfig {
    /// A random HS256 key; tokens do not survive a restart
    fn default() -> Self {
        Self::new(JwtConfig::new_random_hs256())
    }
}

/// Top-level configuration for [`Clinica`]
#[derive(Debug, Clone, Default)]
pub struct ClinicaConfig {
    pub token: TokenConfig,
}

impl ClinicaConfig {
    pub fn with_token_config(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }
}

type Personas<R> = PersonaRepositoryAdapter<R>;
type Usuarios<R> = UsuarioRepositoryAdapter<R>;

/// The coordinator that owns the storage backend and every service.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Clinica<R: RepositoryProvider> {
    repositories: Arc<R>,
    persona_service: Arc<PersonaService<Personas<R>>>,
    usuario_service: Arc<UsuarioService<Usuarios<R>, Personas<R>>>,
    registration_service: Arc<RegistrationService<RegistrationRepositoryAdapter<R>>>,
    auth_service: Arc<AuthService<Usuarios<R>, Personas<R>>>,
    config: ClinicaConfig,
}

impl<R: RepositoryProvider> Clinica<R> {
    /// Create a coordinator with the default configuration
    pub fn new(repositories: Arc<R>) -> Self {
        Self::with_config(repositories, ClinicaConfig::default())
    }

    pub fn with_config(repositories: Arc<R>, config: ClinicaConfig) -> Self {
        let persona_repo = Arc::new(PersonaRepositoryAdapter::new(repositories.clone()));
        let usuario_repo = Arc::new(UsuarioRepositoryAdapter::new(repositories.clone()));
        let registration_repo = Arc::new(RegistrationRepositoryAdapter::new(repositories.clone()));

        Self {
            persona_service: Arc::new(PersonaService::new(persona_repo.clone())),
            usuario_service: Arc::new(UsuarioService::new(
                usuario_repo.clone(),
                persona_repo.clone(),
            )),
            registration_service: Arc::new(RegistrationService::new(registration_repo)),
            auth_service: Arc::new(AuthService::new(
                usuario_repo,
                persona_repo,
                config.token.issuer(),
            )),
            repositories,
            config,
        }
    }

    /// Replace the token configuration, rebuilding the auth service
    pub fn with_token_config(self, token: TokenConfig) -> Self {
        let config = self.config.clone().with_token_config(token);
        Self::with_config(self.repositories, config)
    }

    pub fn config(&self) -> &ClinicaConfig {
        &self.config
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        tracing::debug!("Running migrations");
        self.repositories.migrate().await
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await
    }

    /// Register a new paciente: a persona and its usuario, atomically
    pub async fn register(&self, input: &RegistroInput) -> Result<RegistroResponse, Error> {
        self.registration_service.register(input).await
    }

    /// Register a persona and a usuario with the given role, atomically
    pub async fn register_with_rol(
        &self,
        input: &RegistroInput,
        rol: Rol,
    ) -> Result<RegistroResponse, Error> {
        self.registration_service
            .register_with_rol(input, rol)
            .await
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        self.auth_service.login(request).await
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, Error> {
        self.auth_service.verify_token(token)
    }

    /// The usuario behind an access token, with its persona
    pub async fn me(&self, token: &str) -> Result<UsuarioDetalle, Error> {
        self.auth_service.me(token).await
    }
}

/// Administrative persona management
impl<R: RepositoryProvider> Clinica<R> {
    pub async fn list_personas(&self) -> Result<Vec<Persona>, Error> {
        self.persona_service.list_personas().await
    }

    pub async fn get_persona(&self, id: PersonaId) -> Result<Persona, Error> {
        self.persona_service.get_persona(id).await
    }

    pub async fn create_persona(&self, input: &PersonaInput) -> Result<Persona, Error> {
        self.persona_service.create_persona(input).await
    }

    pub async fn update_persona(
        &self,
        id: PersonaId,
        input: &PersonaInput,
    ) -> Result<Persona, Error> {
        self.persona_service.update_persona(id, input).await
    }

    /// Delete a persona together with its usuario, if any
    pub async fn delete_persona(&self, id: PersonaId) -> Result<(), Error> {
        self.persona_service.delete_persona(id).await
    }
}

/// Administrative usuario management
impl<R: RepositoryProvider> Clinica<R> {
    pub async fn list_usuarios(&self) -> Result<Vec<Usuario>, Error> {
        self.usuario_service.list_usuarios().await
    }

    pub async fn get_usuario(&self, id: UsuarioId) -> Result<UsuarioDetalle, Error> {
        self.usuario_service.get_usuario_detalle(id).await
    }

    pub async fn create_usuario(&self, input: &UsuarioInput) -> Result<Usuario, Error> {
        self.usuario_service.create_usuario(input).await
    }

    pub async fn update_usuario(
        &self,
        id: UsuarioId,
        input: &UsuarioInput,
    ) -> Result<Usuario, Error> {
        self.usuario_service.update_usuario(id, input).await
    }

    pub async fn delete_usuario(&self, id: UsuarioId) -> Result<(), Error> {
        self.usuario_service.delete_usuario(id).await
    }
}
