//! Signed access tokens
//!
//! A successful login yields a JWT whose claims identify the usuario and its role:
//!
//! | Claim | Type     | Description                                      |
//! | ----- | -------- | ------------------------------------------------ |
//! | `sub` | `String` | The usuario ID.                                  |
//! | `rol` | `Rol`    | The usuario's role at the time of issuance.      |
//! | `iat` | `i64`    | Issued at, in seconds since the epoch.           |
//! | `exp` | `i64`    | Expiration time, in seconds since the epoch.     |
//! | `iss` | `String` | Issuer, only present when one is configured.     |
//!
//! Tokens are stateless: nothing is persisted and nothing needs to be cleaned up.

use std::path::Path;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::{AuthError, CryptoError, SessionError, ValidationError},
    id::UsuarioId,
    usuario::Rol,
};

/// Default lifetime of an issued token
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(24);

const MISSING_SECRET: &str = "Signing secret is not configured";

/// Claims carried by every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - usuario ID
    pub sub: String,
    pub rol: Rol,
    pub iat: i64,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl TokenClaims {
    /// The usuario this token was issued to
    pub fn usuario_id(&self) -> Result<UsuarioId, Error> {
        self.sub.parse::<UsuarioId>().map_err(|_| {
            SessionError::InvalidToken(format!("Invalid subject: {}", self.sub)).into()
        })
    }

    /// Fail with [`AuthError::Forbidden`] unless the token carries `rol`
    pub fn require_rol(&self, rol: Rol) -> Result<(), Error> {
        if self.rol == rol {
            Ok(())
        } else {
            Err(AuthError::Forbidden(format!("{rol} role required")).into())
        }
    }
}

/// JWT algorithm type
#[derive(Debug, Clone)]
pub enum JwtAlgorithm {
    /// RS256 - RSA with SHA-256
    RS256 {
        /// Private key for signing JWTs (PEM format)
        private_key: Vec<u8>,
        /// Public key for verifying JWTs (PEM format)
        public_key: Vec<u8>,
    },
    /// HS256 - HMAC with SHA-256
    HS256 {
        /// Secret key for both signing and verifying
        secret_key: Vec<u8>,
    },
}

/// Signing configuration for access tokens
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub algorithm: JwtAlgorithm,
    pub issuer: Option<String>,
}

impl JwtConfig {
    pub fn new_rs256(private_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            algorithm: JwtAlgorithm::RS256 {
                private_key,
                public_key,
            },
            issuer: None,
        }
    }

    pub fn new_hs256(secret_key: Vec<u8>) -> Self {
        Self {
            algorithm: JwtAlgorithm::HS256 { secret_key },
            issuer: None,
        }
    }

    /// Create a new JWT configuration from RSA key files (PEM format)
    pub fn from_rs256_pem_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        use std::fs::read;

        let private_key = read(private_key_path).map_err(|e| {
            ValidationError::InvalidField(format!("Failed to read private key file: {e}"))
        })?;

        let public_key = read(public_key_path).map_err(|e| {
            ValidationError::InvalidField(format!("Failed to read public key file: {e}"))
        })?;

        Ok(Self::new_rs256(private_key, public_key))
    }

    /// Create a configuration with a random 32-byte HS256 secret
    ///
    /// Tokens signed with it do not survive a process restart.
    pub fn new_random_hs256() -> Self {
        use rand::RngCore;

        let mut secret_key = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret_key);
        Self::new_hs256(secret_key)
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn jwt_algorithm(&self) -> Algorithm {
        match &self.algorithm {
            JwtAlgorithm::RS256 { .. } => Algorithm::RS256,
            JwtAlgorithm::HS256 { .. } => Algorithm::HS256,
        }
    }

    /// Get the encoding key for signing
    pub fn get_encoding_key(&self) -> Result<EncodingKey, Error> {
        match &self.algorithm {
            JwtAlgorithm::RS256 { private_key, .. } => EncodingKey::from_rsa_pem(private_key)
                .map_err(|e| {
                    CryptoError::JwtSigning(format!("Invalid RSA private key: {e}")).into()
                }),
            JwtAlgorithm::HS256 { secret_key } if secret_key.is_empty() => {
                Err(CryptoError::JwtSigning(MISSING_SECRET.into()).into())
            }
            JwtAlgorithm::HS256 { secret_key } => Ok(EncodingKey::from_secret(secret_key)),
        }
    }

    /// Get the decoding key for verification
    pub fn get_decoding_key(&self) -> Result<DecodingKey, Error> {
        match &self.algorithm {
            JwtAlgorithm::RS256 { public_key, .. } => DecodingKey::from_rsa_pem(public_key)
                .map_err(|e| {
                    CryptoError::JwtVerification(format!("Invalid RSA public key: {e}")).into()
                }),
            JwtAlgorithm::HS256 { secret_key } if secret_key.is_empty() => {
                Err(CryptoError::JwtVerification(MISSING_SECRET.into()).into())
            }
            JwtAlgorithm::HS256 { secret_key } => Ok(DecodingKey::from_secret(secret_key)),
        }
    }

    /// Validation rules: algorithm, expiry and, when configured, issuer
    pub fn get_validation(&self) -> Validation {
        let mut validation = Validation::new(self.jwt_algorithm());
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

/// Issues and verifies access tokens
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
    expires_in: Duration,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config,
            expires_in: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Sign a token for the given usuario and role
    pub fn issue(&self, usuario_id: UsuarioId, rol: Rol) -> Result<String, Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: usuario_id.to_string(),
            rol,
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
            iss: self.config.issuer.clone(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, Error> {
        let header = Header::new(self.config.jwt_algorithm());
        let encoding_key = self.config.get_encoding_key()?;

        encode(&header, claims, &encoding_key)
            .map_err(|e| CryptoError::JwtSigning(format!("Failed to encode JWT: {e}")).into())
    }

    /// Check the signature, expiry and issuer of a token and return its claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, Error> {
        let decoding_key = self.config.get_decoding_key()?;
        let validation = self.config.get_validation();

        let token_data = decode::<TokenClaims>(token, &decoding_key, &validation)
            .map_err(token_error)?;

        Ok(token_data.claims)
    }
}

fn token_error(error: jsonwebtoken::errors::Error) -> Error {
    match error.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired.into(),
        _ => SessionError::InvalidToken(format!("JWT validation failed: {error}")).into(),
    }
}
