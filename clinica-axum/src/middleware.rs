use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use clinica::Clinica;
use clinica_core::repositories::RepositoryProvider;

use crate::{error::ApiError, extractors::BearerToken};

/// Shared state of every route: the clinica coordinator
pub struct ClinicaState<R: RepositoryProvider> {
    pub clinica: Arc<Clinica<R>>,
}

impl<R: RepositoryProvider> Clone for ClinicaState<R> {
    fn clone(&self) -> Self {
        Self {
            clinica: self.clinica.clone(),
        }
    }
}

/// Reject requests without a valid bearer token
///
/// On success the verified [`TokenClaims`](clinica::TokenClaims) are stored
/// in the request extensions for [`AuthUser`](crate::AuthUser) and
/// [`AdminUser`](crate::AdminUser).
pub async fn require_auth<R>(
    State(state): State<ClinicaState<R>>,
    BearerToken(token): BearerToken,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    R: RepositoryProvider,
{
    let token = token.ok_or_else(ApiError::unauthorized)?;
    let claims = state.clinica.verify_token(&token)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
