use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use clinica::{
    Clinica, LoginRequest, PersonaId, PersonaInput, RegistroInput, UsuarioId, UsuarioInput,
};
use clinica_core::repositories::RepositoryProvider;

use crate::{
    error::{ApiError, Result},
    extractors::{AdminUser, BearerToken},
    middleware::{ClinicaState, require_auth},
    types::{HealthResponse, MessageResponse},
};

pub fn create_router<R>(clinica: Arc<Clinica<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = ClinicaState { clinica };

    let public_routes = Router::new()
        .route("/health", get(health_handler::<R>))
        .route("/api/auth/registro", post(registro_handler::<R>))
        .route("/api/auth/login", post(login_handler::<R>))
        .route("/api/auth/me", get(me_handler::<R>));

    let protected_routes = Router::new()
        .route(
            "/api/personas",
            get(list_personas_handler::<R>).post(create_persona_handler::<R>),
        )
        .route(
            "/api/personas/{id}",
            get(get_persona_handler::<R>)
                .put(update_persona_handler::<R>)
                .delete(delete_persona_handler::<R>),
        )
        .route(
            "/api/usuarios",
            get(list_usuarios_handler::<R>).post(create_usuario_handler::<R>),
        )
        .route(
            "/api/usuarios/{id}",
            get(get_usuario_handler::<R>)
                .put(update_usuario_handler::<R>)
                .delete(delete_usuario_handler::<R>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health_handler<R>(State(state): State<ClinicaState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state.clinica.health_check().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

async fn registro_handler<R>(
    State(state): State<ClinicaState<R>>,
    payload: std::result::Result<Json<RegistroInput>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Json(input) = payload?;
    let response = state.clinica.register(&input).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn login_handler<R>(
    State(state): State<ClinicaState<R>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Json(request) = payload?;
    let response = state.clinica.login(&request).await?;

    Ok(Json(response))
}

async fn me_handler<R>(
    State(state): State<ClinicaState<R>>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let token = token.ok_or_else(ApiError::unauthorized)?;
    let usuario = state.clinica.me(&token).await?;

    Ok(Json(usuario))
}

async fn list_personas_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    Ok(Json(state.clinica.list_personas().await?))
}

async fn get_persona_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    id: std::result::Result<Path<PersonaId>, PathRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Path(id) = id?;
    Ok(Json(state.clinica.get_persona(id).await?))
}

async fn create_persona_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    payload: std::result::Result<Json<PersonaInput>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Json(input) = payload?;
    let persona = state.clinica.create_persona(&input).await?;

    Ok((StatusCode::CREATED, Json(persona)))
}

async fn update_persona_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    id: std::result::Result<Path<PersonaId>, PathRejection>,
    payload: std::result::Result<Json<PersonaInput>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Path(id) = id?;
    let Json(input) = payload?;

    Ok(Json(state.clinica.update_persona(id, &input).await?))
}

async fn delete_persona_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    id: std::result::Result<Path<PersonaId>, PathRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Path(id) = id?;
    state.clinica.delete_persona(id).await?;

    Ok(Json(MessageResponse::new("Persona deleted")))
}

async fn list_usuarios_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    Ok(Json(state.clinica.list_usuarios().await?))
}

async fn get_usuario_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    id: std::result::Result<Path<UsuarioId>, PathRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Path(id) = id?;
    Ok(Json(state.clinica.get_usuario(id).await?))
}

async fn create_usuario_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    payload: std::result::Result<Json<UsuarioInput>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Json(input) = payload?;
    let usuario = state.clinica.create_usuario(&input).await?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

async fn update_usuario_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    id: std::result::Result<Path<UsuarioId>, PathRejection>,
    payload: std::result::Result<Json<UsuarioInput>, JsonRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Path(id) = id?;
    let Json(input) = payload?;

    Ok(Json(state.clinica.update_usuario(id, &input).await?))
}

async fn delete_usuario_handler<R>(
    State(state): State<ClinicaState<R>>,
    _admin: AdminUser,
    id: std::result::Result<Path<UsuarioId>, PathRejection>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let Path(id) = id?;
    state.clinica.delete_usuario(id).await?;

    Ok(Json(MessageResponse::new("Usuario deleted")))
}
