//! Service layer for business logic
//!
//! Services are generic over the repository traits they need and hold them in
//! an `Arc`, so one storage backend can be shared by every service.

pub mod auth;
pub mod persona;
pub mod registration;
pub mod usuario;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::{AuthService, LoginRequest, LoginResponse};
pub use persona::PersonaService;
pub use registration::RegistrationService;
pub use usuario::UsuarioService;
