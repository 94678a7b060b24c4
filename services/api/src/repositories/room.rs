//! Room repository
//!
//! Rooms have no owner; any authenticated user may create, edit or
//! delete them.

use sqlx::PgPool;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{Sala, SalaPayload};

#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Create a new room repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List rooms with offset/limit pagination (store order)
    pub async fn list(&self, skip: i64, count: i64) -> ApiResult<Vec<Sala>> {
        let salas = sqlx::query_as::<_, Sala>(
            r#"
            SELECT id, nome, capacidade
            FROM salas
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(salas)
    }

    /// Find a room by id
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<Sala>> {
        let sala = sqlx::query_as::<_, Sala>(
            r#"
            SELECT id, nome, capacidade
            FROM salas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sala)
    }

    /// Create a room
    pub async fn create(&self, payload: &SalaPayload) -> ApiResult<Sala> {
        info!("Creating room: {}", payload.nome);

        let sala = sqlx::query_as::<_, Sala>(
            r#"
            INSERT INTO salas (nome, capacidade)
            VALUES ($1, $2)
            RETURNING id, nome, capacidade
            "#,
        )
        .bind(&payload.nome)
        .bind(payload.capacidade)
        .fetch_one(&self.pool)
        .await?;

        Ok(sala)
    }

    /// Overwrite a room's mutable fields; the id always comes from the
    /// path, never from the payload
    pub async fn update(&self, id: i64, payload: &SalaPayload) -> ApiResult<Sala> {
        let sala = sqlx::query_as::<_, Sala>(
            r#"
            UPDATE salas
            SET nome = $2, capacidade = $3
            WHERE id = $1
            RETURNING id, nome, capacidade
            "#,
        )
        .bind(id)
        .bind(&payload.nome)
        .bind(payload.capacidade)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sala não foi encontrada".to_string()))?;

        Ok(sala)
    }

    /// Delete a room
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM salas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Sala não foi encontrada".to_string()));
        }

        Ok(())
    }
}
