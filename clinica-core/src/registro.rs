//! Self-registration payloads
//!
//! Public registration creates a persona and its `paciente` usuario in one go.
//! Dates of birth arrive as `dd/mm/yyyy`, unlike the administrative persona
//! endpoints which use ISO dates.
use serde::{Deserialize, Serialize};

use crate::{
    error::{FieldErrors, ValidationError, utilities::RequiredFieldExt},
    id::{PersonaId, UsuarioId},
    persona::{NewPersona, PersonaFields, normalize_optional, validate_persona_fields},
    usuario::Rol,
    validation::{REGISTRO_DATE_FORMAT, validate_email, validate_password},
};

/// Raw registration body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistroInput {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub correo: String,
    pub telefono: Option<String>,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub direccion: Option<String>,
    pub contrasena: String,
}

/// Validated registration data
#[derive(Clone, PartialEq, Eq)]
pub struct RegistroData {
    pub persona: NewPersona,
    pub correo: String,
    pub contrasena: String,
}

impl std::fmt::Debug for RegistroData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistroData")
            .field("persona", &self.persona)
            .field("correo", &self.correo)
            .field("contrasena", &"<redacted>")
            .finish()
    }
}

impl RegistroInput {
    /// Check every field, reporting all rejected fields at once
    pub fn validate(&self) -> Result<RegistroData, ValidationError> {
        let mut errors = FieldErrors::new();
        let parsed = validate_persona_fields(
            &mut errors,
            PersonaFields {
                nombre: &self.nombre,
                apellido_paterno: &self.apellido_paterno,
                apellido_materno: &self.apellido_materno,
                telefono: self.telefono.as_deref(),
                fecha_nacimiento: &self.fecha_nacimiento,
                genero: &self.genero,
                direccion: self.direccion.as_deref(),
            },
            REGISTRO_DATE_FORMAT,
        );

        let correo = self.correo.trim();
        errors.check("correo", validate_email(correo));
        errors.check("contrasena", validate_password(&self.contrasena));
        errors.into_result()?;

        let (fecha_nacimiento, genero) = parsed.require_field("fecha_nacimiento")?;

        Ok(RegistroData {
            persona: NewPersona {
                nombre: self.nombre.trim().to_string(),
                apellido_paterno: self.apellido_paterno.trim().to_string(),
                apellido_materno: self.apellido_materno.trim().to_string(),
                telefono: normalize_optional(self.telefono.as_deref()),
                fecha_nacimiento,
                genero,
                direccion: normalize_optional(self.direccion.as_deref()),
            },
            correo: correo.to_string(),
            contrasena: self.contrasena.clone(),
        })
    }
}

/// Result of a successful registration; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistroResponse {
    pub usuario_id: UsuarioId,
    pub persona_id: PersonaId,
    pub correo: String,
    pub rol: Rol,
    pub nombre_completo: String,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::persona::Genero;

    fn valid_input() -> RegistroInput {
        RegistroInput {
            nombre: "Luis".to_string(),
            apellido_paterno: "Hernández".to_string(),
            apellido_materno: "Ruiz".to_string(),
            correo: "luis@example.com".to_string(),
            telefono: None,
            fecha_nacimiento: "01/12/1985".to_string(),
            genero: "masculino".to_string(),
            direccion: Some("Av. Juárez 10".to_string()),
            contrasena: "contrasena-segura".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let data = valid_input().validate().unwrap();
        assert_eq!(
            data.persona.fecha_nacimiento,
            NaiveDate::from_ymd_opt(1985, 12, 1).unwrap()
        );
        assert_eq!(data.persona.genero, Genero::Masculino);
        assert_eq!(data.correo, "luis@example.com");
        assert!(!format!("{data:?}").contains("contrasena-segura"));
    }

    #[test]
    fn test_registration_rejects_iso_dates() {
        let input = RegistroInput {
            fecha_nacimiento: "1985-12-01".to_string(),
            ..valid_input()
        };

        match input.validate().unwrap_err() {
            ValidationError::Fields(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains("fecha_nacimiento"));
            }
            e => panic!("Expected field errors, got {e:?}"),
        }
    }

    #[test]
    fn test_empty_registration_reports_all_required_fields() {
        match RegistroInput::default().validate().unwrap_err() {
            ValidationError::Fields(errors) => {
                for field in [
                    "nombre",
                    "apellido_paterno",
                    "apellido_materno",
                    "correo",
                    "fecha_nacimiento",
                    "genero",
                    "contrasena",
                ] {
                    assert!(errors.contains(field), "missing error for {field}");
                }
                assert!(!errors.contains("telefono"));
                assert!(!errors.contains("direccion"));
            }
            e => panic!("Expected field errors, got {e:?}"),
        }
    }

    #[test]
    fn test_short_password_rejected() {
        let input = RegistroInput {
            contrasena: "1234567".to_string(),
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }
}
