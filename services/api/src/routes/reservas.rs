//! Reservation routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{ReservaPayload, mensagem},
    validation,
};

use super::Paginacao;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(obter_reservas).post(criar_reserva))
        .route(
            "/:id_reserva",
            get(obter_reserva)
                .patch(editar_reserva)
                .delete(deletar_reserva),
        )
}

/// List reservations
pub async fn obter_reservas(
    State(state): State<AppState>,
    Query(paginacao): Query<Paginacao>,
) -> ApiResult<impl IntoResponse> {
    let reservas = state
        .reservation_repository
        .list(paginacao.offset(), paginacao.limit())
        .await?;

    Ok(Json(reservas))
}

/// Get a reservation by id
pub async fn obter_reserva(
    State(state): State<AppState>,
    Path(id_reserva): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let reserva = state
        .reservation_repository
        .find_by_id(id_reserva)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reserva não foi encontrada".to_string()))?;

    Ok(Json(reserva))
}

/// Create a reservation owned by the caller. The owner always comes
/// from the bearer token, never from the payload, and creation is gated
/// on room availability.
pub async fn criar_reserva(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<ReservaPayload>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_janela(payload.data_inicial, payload.data_final)
        .map_err(ApiError::Validation)?;

    let reserva = state
        .reservation_repository
        .create(&payload, auth.id)
        .await?;

    Ok((StatusCode::CREATED, Json(reserva)))
}

/// Edit a reservation in place; only the owner may edit, and the stored
/// id and owner survive whatever the payload carries
pub async fn editar_reserva(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id_reserva): Path<i64>,
    Json(payload): Json<ReservaPayload>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_janela(payload.data_inicial, payload.data_final)
        .map_err(ApiError::Validation)?;

    let reserva = state
        .reservation_repository
        .update(id_reserva, &payload, auth.id)
        .await?;

    Ok(Json(reserva))
}

/// Delete a reservation; only the owner may delete
pub async fn deletar_reserva(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id_reserva): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state
        .reservation_repository
        .delete(id_reserva, auth.id)
        .await?;

    Ok(Json(mensagem("Reserva deletada com sucesso")))
}
