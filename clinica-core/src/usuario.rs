//! Usuario accounts
//!
//! A usuario is the login account of a persona. The core usuario struct is
//! defined as follows:
//!
//! | Field        | Type        | Description                                   |
//! | ------------ | ----------- | --------------------------------------------- |
//! | `id`         | `UsuarioId` | Surrogate key assigned by the store.          |
//! | `persona_id` | `PersonaId` | The persona owning this account.              |
//! | `rol`        | `Rol`       | Access level.                                 |
//! | `correo`     | `String`    | Login email, unique across all usuarios.      |
//! | `created_at` | `DateTime`  | The timestamp when the usuario was created.   |
//! | `updated_at` | `DateTime`  | The timestamp when the usuario was updated.   |
//!
//! The password hash is deliberately not part of [`Usuario`]: it is only ever
//! written through [`NewUsuario`] and read back through
//! [`UsuarioRepository::get_password_hash`](crate::repositories::UsuarioRepository::get_password_hash).
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Persona,
    error::{FieldErrors, ValidationError, utilities::RequiredFieldExt},
    id::{PersonaId, UsuarioId},
    validation::{validate_email, validate_password},
};

/// Access level of a usuario
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    #[default]
    Paciente,
    Medico,
    Administrador,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Paciente => "paciente",
            Rol::Medico => "medico",
            Rol::Administrador => "administrador",
        }
    }
}

impl FromStr for Rol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "paciente" => Ok(Rol::Paciente),
            "medico" => Ok(Rol::Medico),
            "administrador" => Ok(Rol::Administrador),
            "" => Err(ValidationError::MissingField(
                "Role is required".to_string(),
            )),
            other => Err(ValidationError::InvalidRole(format!(
                "{other} (expected one of paciente, medico, administrador)"
            ))),
        }
    }
}

impl std::fmt::Display for Rol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: UsuarioId,
    pub persona_id: PersonaId,
    pub rol: Rol,
    pub correo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Usuario {
    pub fn builder() -> UsuarioBuilder {
        UsuarioBuilder::default()
    }
}

#[derive(Default)]
pub struct UsuarioBuilder {
    id: Option<UsuarioId>,
    persona_id: Option<PersonaId>,
    rol: Option<Rol>,
    correo: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl UsuarioBuilder {
    pub fn id(mut self, id: UsuarioId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn persona_id(mut self, persona_id: PersonaId) -> Self {
        self.persona_id = Some(persona_id);
        self
    }

    pub fn rol(mut self, rol: Rol) -> Self {
        self.rol = Some(rol);
        self
    }

    pub fn correo(mut self, correo: String) -> Self {
        self.correo = Some(correo);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn build(self) -> Result<Usuario, Error> {
        let now = Utc::now();
        Ok(Usuario {
            id: self.id.require_field("Usuario ID")?,
            persona_id: self.persona_id.require_field("Persona ID")?,
            rol: self.rol.unwrap_or_default(),
            correo: self.correo.require_field("Correo")?,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}

/// A usuario together with the persona it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsuarioDetalle {
    #[serde(flatten)]
    pub usuario: Usuario,
    pub persona: Persona,
}

/// Everything a store needs to insert or overwrite a usuario row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUsuario {
    pub persona_id: PersonaId,
    pub rol: Rol,
    pub correo: String,
    pub password_hash: String,
}

/// Raw usuario attributes as received by the administrative endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsuarioInput {
    pub persona_id: Option<i64>,
    pub rol: String,
    pub correo: String,
    pub contrasena: String,
}

/// Validated usuario attributes; the password is still plaintext and must be
/// hashed before it reaches a store
#[derive(Clone, PartialEq, Eq)]
pub struct UsuarioData {
    pub persona_id: PersonaId,
    pub rol: Rol,
    pub correo: String,
    pub contrasena: String,
}

impl std::fmt::Debug for UsuarioData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsuarioData")
            .field("persona_id", &self.persona_id)
            .field("rol", &self.rol)
            .field("correo", &self.correo)
            .field("contrasena", &"<redacted>")
            .finish()
    }
}

impl UsuarioInput {
    /// Check every field and build the validated attributes
    pub fn validate(&self) -> Result<UsuarioData, ValidationError> {
        let mut errors = FieldErrors::new();

        let persona_id = match self.persona_id {
            Some(id) if id > 0 => Some(PersonaId::new(id)),
            Some(_) => {
                errors.push("persona_id", "Persona ID must be a positive integer");
                None
            }
            None => {
                errors.push("persona_id", "Persona ID is required");
                None
            }
        };

        let rol = match self.rol.parse::<Rol>() {
            Ok(rol) => Some(rol),
            Err(e) => {
                errors.push("rol", e.to_string());
                None
            }
        };

        let correo = self.correo.trim();
        errors.check("correo", validate_email(correo));
        errors.check("contrasena", validate_password(&self.contrasena));
        errors.into_result()?;

        Ok(UsuarioData {
            persona_id: persona_id.require_field("persona_id")?,
            rol: rol.require_field("rol")?,
            correo: correo.to_string(),
            contrasena: self.contrasena.clone(),
        })
    }
}
