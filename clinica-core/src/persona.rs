//! Persona records
//!
//! A persona holds the demographic data of a person known to the clinic. The
//! core persona struct is defined as follows:
//!
//! | Field              | Type               | Description                                  |
//! | ------------------ | ------------------ | -------------------------------------------- |
//! | `id`               | `PersonaId`        | Surrogate key assigned by the store.         |
//! | `nombre`           | `String`           | First name.                                  |
//! | `apellido_paterno` | `String`           | Paternal surname.                            |
//! | `apellido_materno` | `String`           | Maternal surname.                            |
//! | `telefono`         | `Option<String>`   | Phone number.                                |
//! | `fecha_nacimiento` | `NaiveDate`        | Date of birth.                               |
//! | `genero`           | `Genero`           | Gender.                                      |
//! | `direccion`        | `Option<String>`   | Postal address.                              |
//! | `created_at`       | `DateTime`         | The timestamp when the persona was created.  |
//! | `updated_at`       | `DateTime`         | The timestamp when the persona was updated.  |
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::{FieldErrors, ValidationError, utilities::RequiredFieldExt},
    id::PersonaId,
    validation::{ISO_DATE_FORMAT, parse_date, validate_optional_text, validate_required_name},
};

/// Gender of a persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genero {
    Masculino,
    Femenino,
    Otro,
}

impl Genero {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genero::Masculino => "masculino",
            Genero::Femenino => "femenino",
            Genero::Otro => "otro",
        }
    }
}

impl FromStr for Genero {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "masculino" => Ok(Genero::Masculino),
            "femenino" => Ok(Genero::Femenino),
            "otro" => Ok(Genero::Otro),
            "" => Err(ValidationError::MissingField(
                "Gender is required".to_string(),
            )),
            other => Err(ValidationError::InvalidGender(format!(
                "{other} (expected one of masculino, femenino, otro)"
            ))),
        }
    }
}

impl std::fmt::Display for Genero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persona as stored, with its assigned ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub telefono: Option<String>,
    pub fecha_nacimiento: NaiveDate,
    pub genero: Genero,
    pub direccion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Persona {
    pub fn builder() -> PersonaBuilder {
        PersonaBuilder::default()
    }

    /// First name followed by the paternal surname
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido_paterno)
    }
}

#[derive(Default)]
pub struct PersonaBuilder {
    id: Option<PersonaId>,
    data: Option<NewPersona>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl PersonaBuilder {
    pub fn id(mut self, id: PersonaId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn data(mut self, data: NewPersona) -> Self {
        self.data = Some(data);
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

    pub fn build(self) -> Result<Persona, Error> {
        let now = Utc::now();
        let id = self.id.require_field("Persona ID")?;
        let data = self.data.require_field("Persona data")?;
        Ok(Persona {
            id,
            nombre: data.nombre,
            apellido_paterno: data.apellido_paterno,
            apellido_materno: data.apellido_materno,
            telefono: data.telefono,
            fecha_nacimiento: data.fecha_nacimiento,
            genero: data.genero,
            direccion: data.direccion,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}

/// Validated persona attributes, ready to be written by a store
///
/// Used both for creation and for full overwrites on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPersona {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub telefono: Option<String>,
    pub fecha_nacimiento: NaiveDate,
    pub genero: Genero,
    pub direccion: Option<String>,
}

/// Raw persona attributes as received by the administrative endpoints
///
/// Dates use the ISO `yyyy-mm-dd` format. Missing fields deserialize as empty
/// so that [`PersonaInput::validate`] can report them alongside any other problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaInput {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    pub telefono: Option<String>,
    pub fecha_nacimiento: String,
    pub genero: String,
    pub direccion: Option<String>,
}

impl PersonaInput {
    /// Check every field and build the validated attributes
    pub fn validate(&self) -> Result<NewPersona, ValidationError> {
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
            ISO_DATE_FORMAT,
        );
        errors.into_result()?;
        let (fecha_nacimiento, genero) = parsed.require_field("fecha_nacimiento")?;

        Ok(NewPersona {
            nombre: self.nombre.trim().to_string(),
            apellido_paterno: self.apellido_paterno.trim().to_string(),
            apellido_materno: self.apellido_materno.trim().to_string(),
            telefono: normalize_optional(self.telefono.as_deref()),
            fecha_nacimiento,
            genero,
            direccion: normalize_optional(self.direccion.as_deref()),
        })
    }
}

/// Borrowed view of the persona attributes shared by every input type
pub(crate) struct PersonaFields<'a> {
    pub nombre: &'a str,
    pub apellido_paterno: &'a str,
    pub apellido_materno: &'a str,
    pub telefono: Option<&'a str>,
    pub fecha_nacimiento: &'a str,
    pub genero: &'a str,
    pub direccion: Option<&'a str>,
}

/// Record every persona field error; returns the parsed date and gender when both are valid
pub(crate) fn validate_persona_fields(
    errors: &mut FieldErrors,
    fields: PersonaFields<'_>,
    date_format: &str,
) -> Option<(NaiveDate, Genero)> {
    errors.check("nombre", validate_required_name(fields.nombre));
    errors.check(
        "apellido_paterno",
        validate_required_name(fields.apellido_paterno),
    );
    errors.check(
        "apellido_materno",
        validate_required_name(fields.apellido_materno),
    );
    errors.check("telefono", validate_optional_text(fields.telefono, 20));
    errors.check("direccion", validate_optional_text(fields.direccion, 255));

    let genero = match fields.genero.parse::<Genero>() {
        Ok(genero) => Some(genero),
        Err(e) => {
            errors.push("genero", e.to_string());
            None
        }
    };

    let fecha = match parse_date(fields.fecha_nacimiento, date_format) {
        Ok(date) if date > Utc::now().date_naive() => {
            errors.push(
                "fecha_nacimiento",
                ValidationError::InvalidDate("Date of birth is in the future".to_string())
                    .to_string(),
            );
            None
        }
        Ok(date) => Some(date),
        Err(e) => {
            errors.push("fecha_nacimiento", e.to_string());
            None
        }
    };

    fecha.zip(genero)
}

pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PersonaInput {
        PersonaInput {
            nombre: "Ana".to_string(),
            apellido_paterno: "García".to_string(),
            apellido_materno: "López".to_string(),
            telefono: Some("5551234567".to_string()),
            fecha_nacimiento: "1990-03-15".to_string(),
            genero: "femenino".to_string(),
            direccion: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_genero_parse() {
        assert_eq!("masculino".parse::<Genero>().unwrap(), Genero::Masculino);
        assert_eq!("femenino".parse::<Genero>().unwrap(), Genero::Femenino);
        assert_eq!("otro".parse::<Genero>().unwrap(), Genero::Otro);
        assert!(matches!(
            "desconocido".parse::<Genero>(),
            Err(ValidationError::InvalidGender(_))
        ));
        assert!(matches!(
            "".parse::<Genero>(),
            Err(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn test_genero_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Genero::Otro).unwrap(), "\"otro\"");
    }

    #[test]
    fn test_persona_input_valid() {
        let persona = valid_input().validate().unwrap();
        assert_eq!(persona.nombre, "Ana");
        assert_eq!(persona.genero, Genero::Femenino);
        assert_eq!(
            persona.fecha_nacimiento,
            NaiveDate::from_ymd_opt(1990, 3, 15).unwrap()
        );
        // Blank optional fields are dropped
        assert_eq!(persona.direccion, None);
        assert_eq!(persona.telefono.as_deref(), Some("5551234567"));
    }

    #[test]
    fn test_persona_input_reports_every_field() {
        let input = PersonaInput {
            nombre: String::new(),
            genero: "x".to_string(),
            fecha_nacimiento: "15/03/1990".to_string(),
            ..valid_input()
        };

        match input.validate().unwrap_err() {
            ValidationError::Fields(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.contains("nombre"));
                assert!(errors.contains("genero"));
                assert!(errors.contains("fecha_nacimiento"));
            }
            e => panic!("Expected field errors, got {e:?}"),
        }
    }

    #[test]
    fn test_persona_input_rejects_future_birth_date() {
        let input = PersonaInput {
            fecha_nacimiento: "2999-01-01".to_string(),
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_persona_builder_and_display_name() {
        let persona = Persona::builder()
            .id(PersonaId::new(3))
            .data(valid_input().validate().unwrap())
            .build()
            .unwrap();
        assert_eq!(persona.id, PersonaId::new(3));
        assert_eq!(persona.nombre_completo(), "Ana García");

        assert!(Persona::builder().id(PersonaId::new(1)).build().is_err());
    }
}
