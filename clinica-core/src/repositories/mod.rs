//! Repository traits for data access layer
//!
//! This module defines the repository interfaces that services use to interact with storage.
//!
//! # Trait Hierarchy
//!
//! - Individual `*Repository` traits define the operations for each entity
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits plus lifecycle methods
//!
//! Services only ever see the individual repository traits; the `*Adapter`
//! types bridge a shared `Arc<R: RepositoryProvider>` to them.

pub mod adapter;
pub mod persona;
pub mod registration;
pub mod usuario;

pub use adapter::{
    PersonaRepositoryAdapter, RegistrationRepositoryAdapter, UsuarioRepositoryAdapter,
};
pub use persona::PersonaRepository;
pub use registration::{RegistrationRepository, UnitOfWork};
pub use usuario::UsuarioRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for persona repository access.
pub trait PersonaRepositoryProvider: Send + Sync + 'static {
    type PersonaRepo: PersonaRepository;

    fn persona(&self) -> &Self::PersonaRepo;
}

/// Provider trait for usuario repository access.
pub trait UsuarioRepositoryProvider: Send + Sync + 'static {
    type UsuarioRepo: UsuarioRepository;

    fn usuario(&self) -> &Self::UsuarioRepo;
}

/// Provider trait for the atomic registration unit of work.
pub trait RegistrationRepositoryProvider: Send + Sync + 'static {
    type RegistrationRepo: RegistrationRepository;

    fn registration(&self) -> &Self::RegistrationRepo;
}

/// Provider trait that storage implementations must implement to provide all repositories.
///
/// # Implementing a Custom Storage Backend
///
/// 1. Implement each individual `*Repository` trait for your backend
/// 2. Implement each individual `*RepositoryProvider` trait
/// 3. Implement the `RepositoryProvider` trait with `migrate()` and `health_check()`
///
/// ```rust,ignore
/// use clinica_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl PersonaRepositoryProvider for MyStorage {
///     type PersonaRepo = MyPersonaRepository;
///     fn persona(&self) -> &Self::PersonaRepo { &self.persona_repo }
/// }
///
/// // ... implement the other provider traits ...
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider:
    PersonaRepositoryProvider + UsuarioRepositoryProvider + RegistrationRepositoryProvider
{
    /// Bring the schema up to date; running it twice is a no-op
    async fn migrate(&self) -> Result<(), Error>;

    async fn health_check(&self) -> Result<(), Error>;
}
