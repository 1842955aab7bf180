//! # Clinica Axum Integration
//!
//! HTTP surface of the clinica backend: public registration and login,
//! the current-usuario endpoint and the administrative persona and usuario
//! routes, which require a bearer token with the `administrador` role.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clinica::{Clinica, SqliteRepositoryProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repositories = Arc::new(SqliteRepositoryProvider::connect("sqlite://clinica.db?mode=rwc").await?);
//!     let clinica = Arc::new(Clinica::new(repositories));
//!     clinica.migrate().await?;
//!
//!     let app = clinica_axum::routes(clinica);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod extractors;
mod middleware;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use extractors::{AdminUser, AuthUser, BearerToken};
pub use middleware::{ClinicaState, require_auth};
pub use routes::create_router;
pub use types::{HealthResponse, MessageResponse};

use axum::Router;
use clinica::Clinica;
use clinica_core::repositories::RepositoryProvider;
use std::sync::Arc;

/// Every clinica route, ready to be served or merged into a larger router
pub fn routes<R>(clinica: Arc<Clinica<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    create_router(clinica)
}
