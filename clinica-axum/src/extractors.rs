use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use clinica::{Rol, TokenClaims};

use crate::error::ApiError;

/// The raw bearer token of a request, if it sent one
pub struct BearerToken(pub Option<String>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .extract::<Option<TypedHeader<Authorization<Bearer>>>>()
            .await
            .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

        Ok(BearerToken(
            header.map(|TypedHeader(auth)| auth.token().to_string()),
        ))
    }
}

/// Claims of a verified access token
///
/// Only available behind [`require_auth`](crate::require_auth), which puts
/// the claims into the request extensions.
pub struct AuthUser(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// An authenticated caller whose role is `administrador`
pub struct AdminUser(pub TokenClaims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        claims.require_rol(Rol::Administrador).inspect_err(|_| {
            tracing::debug!(sub = %claims.sub, rol = %claims.rol, "Admin route refused");
        })?;

        Ok(AdminUser(claims))
    }
}
