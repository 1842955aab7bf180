use crate::{
    Error, UsuarioDetalle,
    crypto::verify_password,
    error::{AuthError, ValidationError},
    repositories::{PersonaRepository, UsuarioRepository},
    services::UsuarioService,
    token::{TokenClaims, TokenIssuer},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Login request body
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub correo: String,
    pub contrasena: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("correo", &self.correo)
            .field("contrasena", &"<redacted>")
            .finish()
    }
}

/// Successful login: a signed token and the usuario with its persona
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: UsuarioDetalle,
}

/// Service for credential checks and token handling
pub struct AuthService<U: UsuarioRepository, P: PersonaRepository> {
    usuario_service: Arc<UsuarioService<U, P>>,
    usuarios: Arc<U>,
    issuer: TokenIssuer,
}

impl<U: UsuarioRepository, P: PersonaRepository> AuthService<U, P> {
    pub fn new(usuarios: Arc<U>, personas: Arc<P>, issuer: TokenIssuer) -> Self {
        Self {
            usuario_service: Arc::new(UsuarioService::new(usuarios.clone(), personas)),
            usuarios,
            issuer,
        }
    }

    /// Authenticate by email and password
    ///
    /// An unknown email and a wrong password produce the same
    /// [`AuthError::InvalidCredentials`] so callers cannot probe for accounts.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        let correo = request.correo.trim();
        if correo.is_empty() || request.contrasena.is_empty() {
            return Err(ValidationError::MissingField(
                "correo and contrasena are required".to_string(),
            )
            .into());
        }

        let Some(usuario) = self.usuarios.find_by_correo(correo).await? else {
            tracing::warn!("Rejected login attempt");
            return Err(AuthError::InvalidCredentials.into());
        };

        let hash = self
            .usuarios
            .get_password_hash(usuario.id)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        if !verify_password(&request.contrasena, &hash).await? {
            tracing::warn!("Rejected login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.issuer.issue(usuario.id, usuario.rol)?;
        tracing::info!(usuario_id = %usuario.id, rol = %usuario.rol, "Login succeeded");

        let usuario = self.usuario_service.with_persona(usuario).await?;
        Ok(LoginResponse { token, usuario })
    }

    /// Check a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, Error> {
        self.issuer.verify(token).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
        })
    }

    /// The usuario a token was issued to, with its persona
    pub async fn me(&self, token: &str) -> Result<UsuarioDetalle, Error> {
        let claims = self.verify_token(token)?;
        self.usuario_service
            .get_usuario_detalle(claims.usuario_id()?)
            .await
    }
}
