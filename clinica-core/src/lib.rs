//! Core functionality for the clinica backend
//!
//! This crate contains the domain types ([`Persona`], [`Usuario`]), input
//! validation, the credential hasher, the token issuer, the repository traits
//! a storage backend implements and the services built on top of them.
//!
//! It does not talk to a database or to HTTP itself: see `clinica-storage-sqlite`
//! for a storage backend and `clinica-axum` for the web layer.
pub mod crypto;
pub mod error;
pub mod id;
pub mod persona;
pub mod registro;
pub mod repositories;
pub mod services;
pub mod token;
pub mod usuario;
pub mod validation;

pub use error::Error;
pub use id::{PersonaId, UsuarioId};
pub use persona::{Genero, NewPersona, Persona, PersonaInput};
pub use registro::{RegistroData, RegistroInput, RegistroResponse};
pub use token::{JwtAlgorithm, JwtConfig, TokenClaims, TokenIssuer};
pub use usuario::{NewUsuario, Rol, Usuario, UsuarioData, UsuarioDetalle, UsuarioInput};
