//! Booking service routes
//!
//! The bearer gate is applied as explicit router-level middleware, not
//! wrapped around individual handlers. `registrar`, `login`,
//! `alterar-senha` and `/health` are the only open endpoints.

use axum::{Json, Router, middleware, response::IntoResponse, routing::get};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, middleware::auth_middleware};

pub mod reservas;
pub mod salas;
pub mod usuarios;

/// Pagination query parameters shared by the list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Paginacao {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    10
}

impl Paginacao {
    /// Offset passed to the store; negatives collapse to the first page
    pub fn offset(&self) -> i64 {
        self.skip.max(0)
    }

    /// Page size passed to the store, clamped to a sane range so
    /// out-of-range query values never reach PostgreSQL as-is
    pub fn limit(&self) -> i64 {
        self.count.clamp(1, 100)
    }
}

/// Create the router for the booking service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/v1/usuarios", usuarios::protected_router())
        .nest("/api/v1/salas", salas::router())
        .nest("/api/v1/reservas", reservas::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/usuarios", usuarios::public_router())
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "reserva-salas-api"
    }))
}
