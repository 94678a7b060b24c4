//! Room routes, including the availability query
//!
//! Rooms carry no owner; every authenticated user may create, edit and
//! delete them.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState,
    availability::Janela,
    error::{ApiError, ApiResult},
    models::{SalaPayload, mensagem},
    validation,
};

use super::Paginacao;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(obter_salas).post(criar_sala))
        .route("/disponiveis", get(obter_salas_disponiveis))
        .route("/:id_sala/conflitos", get(obter_conflitos))
        .route(
            "/:id_sala",
            get(obter_sala).patch(editar_sala).delete(deletar_sala),
        )
}

/// List rooms
pub async fn obter_salas(
    State(state): State<AppState>,
    Query(paginacao): Query<Paginacao>,
) -> ApiResult<impl IntoResponse> {
    let salas = state
        .room_repository
        .list(paginacao.offset(), paginacao.limit())
        .await?;

    Ok(Json(salas))
}

/// Rooms free for the requested window. An empty result is a successful
/// structured message, not an error.
pub async fn obter_salas_disponiveis(
    State(state): State<AppState>,
    Query(janela): Query<Janela>,
) -> ApiResult<Response> {
    validation::validate_janela(janela.data_inicial, janela.data_final)
        .map_err(ApiError::Validation)?;

    let salas = state.availability.rooms_available(&janela).await?;

    if salas.is_empty() {
        return Ok(Json(mensagem("Nenhuma sala disponível")).into_response());
    }

    Ok(Json(salas).into_response())
}

/// Every reservation on the room overlapping the requested window.
/// Advisory read: the write paths run the same predicate inside their
/// own transactions.
pub async fn obter_conflitos(
    State(state): State<AppState>,
    Path(id_sala): Path<i64>,
    Query(janela): Query<Janela>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_janela(janela.data_inicial, janela.data_final)
        .map_err(ApiError::Validation)?;

    state
        .room_repository
        .find_by_id(id_sala)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sala não foi encontrada".to_string()))?;

    let conflitos = state.availability.find_conflicts(id_sala, &janela).await?;

    Ok(Json(conflitos))
}

/// Get a room by id
pub async fn obter_sala(
    State(state): State<AppState>,
    Path(id_sala): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let sala = state
        .room_repository
        .find_by_id(id_sala)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sala não foi encontrada".to_string()))?;

    Ok(Json(sala))
}

/// Create a room
pub async fn criar_sala(
    State(state): State<AppState>,
    Json(payload): Json<SalaPayload>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_capacidade(payload.capacidade).map_err(ApiError::Validation)?;

    let sala = state.room_repository.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(sala)))
}

/// Overwrite a room's fields; the id in the path wins over any payload
pub async fn editar_sala(
    State(state): State<AppState>,
    Path(id_sala): Path<i64>,
    Json(payload): Json<SalaPayload>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_capacidade(payload.capacidade).map_err(ApiError::Validation)?;

    let sala = state.room_repository.update(id_sala, &payload).await?;

    Ok(Json(sala))
}

/// Delete a room
pub async fn deletar_sala(
    State(state): State<AppState>,
    Path(id_sala): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state.room_repository.delete(id_sala).await?;

    Ok(Json(mensagem("Sala deletada com sucesso")))
}
