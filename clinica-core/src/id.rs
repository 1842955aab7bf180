//! Surrogate identifiers
//!
//! Personas and usuarios are keyed by integer IDs assigned by the store on
//! creation. Each entity gets its own newtype so a persona ID can never be
//! passed where a usuario ID is expected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(id) if id > 0 => Ok(Self(id)),
                    _ => Err(ValidationError::InvalidField(format!(
                        "Invalid {} ID: {s}",
                        $label
                    ))),
                }
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Persona`](crate::Persona)
    PersonaId,
    "persona"
);

define_id!(
    /// Identifier of a [`Usuario`](crate::Usuario)
    UsuarioId,
    "usuario"
);
