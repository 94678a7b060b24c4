//! Bearer-token authentication middleware
//!
//! Protected routes require both a verifiable signature/expiry on the
//! presented access token and an active Token record bound to the same
//! user and raw token string. A syntactically valid but revoked or
//! unknown token is rejected with Forbidden.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, error::ApiError, jwt::TokenClass};

/// Authenticated caller identity, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub access_token: String,
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        ApiError::Forbidden("Credenciais de autenticação ausentes".to_string())
    })?;
    let token = bearer.token();

    // First gate: signature and expiry
    let claims = state
        .jwt_service
        .decode(token, TokenClass::Access)
        .map_err(|e| ApiError::Forbidden(format!("Token inválido: {}", e)))?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Forbidden("Token inválido".to_string()))?;

    // Second gate: the token record must exist and not be revoked
    let active = state.token_repository.is_active(user_id, token).await?;
    if !active {
        return Err(ApiError::Forbidden("Token bloqueado".to_string()));
    }

    req.extensions_mut().insert(AuthUser {
        id: user_id,
        access_token: token.to_string(),
    });

    Ok(next.run(req).await)
}
