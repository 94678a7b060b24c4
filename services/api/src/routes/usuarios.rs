//! User routes: registration, login, logout, password change and
//! per-user reservation listing

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        AlterarSenhaRequest, LoginRequest, RegistroRequest, TokenSchema, Usuario, mensagem,
    },
    password, validation,
};

use super::Paginacao;

/// Routes reachable without a bearer token
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/registrar", post(registrar_usuario))
        .route("/login", post(login))
        .route("/alterar-senha", post(alterar_senha))
}

/// Routes behind the bearer gate
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", get(obter_usuarios))
        .route("/reservas", get(obter_reservas_por_usuario))
        .route("/logout", post(logout))
        .route("/:username", get(obter_usuario_especifico))
}

/// Register a new user
pub async fn registrar_usuario(
    State(state): State<AppState>,
    Json(payload): Json<RegistroRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_senha(&payload.senha).map_err(ApiError::Validation)?;

    state
        .user_repository
        .create(&payload.usuario, &payload.email, &payload.senha)
        .await?;

    Ok(Json(mensagem("Usuario registrado com sucesso!")))
}

/// Authenticate and issue a token pair
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for {}", payload.email);

    // Unknown email and wrong password produce the same response, so
    // the endpoint does not leak which accounts exist.
    let invalid = || ApiError::Unauthorized("Email ou senha incorretos".to_string());

    let user: Usuario = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;

    let valid = password::verificar_senha(&payload.senha, &user.senha).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;
    if !valid {
        return Err(invalid());
    }

    let jwt = &state.jwt_service;
    let access = jwt
        .issue_access_token(user.id, jwt.access_ttl())
        .map_err(|e| {
            error!("Failed to issue access token: {}", e);
            ApiError::InternalServerError
        })?;
    let refresh = jwt
        .issue_refresh_token(user.id, jwt.refresh_ttl())
        .map_err(|e| {
            error!("Failed to issue refresh token: {}", e);
            ApiError::InternalServerError
        })?;

    state.token_repository.create(user.id, &access, &refresh).await?;

    Ok(Json(TokenSchema {
        access_token: access,
        refresh_token: refresh,
    }))
}

/// Revoke the caller's own token record. Stale-token cleanup is handled
/// by the scheduled reaper, never here.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    state
        .token_repository
        .revoke(auth.id, &auth.access_token)
        .await?;

    Ok(Json(mensagem("Logout bem sucedido")))
}

/// Rotate a user's password after verifying the old one
pub async fn alterar_senha(
    State(state): State<AppState>,
    Json(payload): Json<AlterarSenhaRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario não encontrado".to_string()))?;

    let valid = password::verificar_senha(&payload.senha_antiga, &user.senha).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;
    if !valid {
        return Err(ApiError::Unauthorized("Senha antiga incorreta".to_string()));
    }

    validation::validate_senha(&payload.senha_nova).map_err(ApiError::Validation)?;

    let hash = password::hash_senha(&payload.senha_nova).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;
    state.user_repository.update_senha(user.id, &hash).await?;

    Ok(Json(mensagem("Senha alterada com sucesso!")))
}

/// List all users (password hashes are never serialized)
pub async fn obter_usuarios(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.find_all().await?;

    Ok(Json(users))
}

/// Look up a single user by email
pub async fn obter_usuario_especifico(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_email(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario não encontrado".to_string()))?;

    Ok(Json(user))
}

/// List the authenticated caller's reservations, joined with rooms
pub async fn obter_reservas_por_usuario(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(paginacao): Query<Paginacao>,
) -> ApiResult<impl IntoResponse> {
    let reservas = state
        .reservation_repository
        .list_by_user(auth.id, paginacao.offset(), paginacao.limit())
        .await?;

    Ok((StatusCode::OK, Json(reservas)))
}
