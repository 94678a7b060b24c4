//! Reservation repository
//!
//! Reservation state machine: absent → active → deleted. Edits mutate
//! the active row in place. Create and update run their room-existence
//! and availability checks inside the same transaction as the write,
//! and the room row is locked first, so concurrent writers on the same
//! room serialize and check-then-act is atomic.

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::info;

use crate::availability::Janela;
use crate::error::{ApiError, ApiResult};
use crate::models::{Reserva, ReservaComSala, ReservaPayload, Sala};

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a reservation owned by the authenticated caller.
    ///
    /// The owner is always `caller_id`; any owner in the client payload
    /// was already discarded by deserialization. Fails with
    /// `InvalidReference` when the room does not exist and with
    /// `Conflict` when the window overlaps an existing reservation on
    /// the same room.
    pub async fn create(&self, payload: &ReservaPayload, caller_id: i64) -> ApiResult<Reserva> {
        info!(
            "Creating reservation on room {} for user {}",
            payload.sala_reservada, caller_id
        );

        let mut tx = self.pool.begin().await?;

        Self::check_sala_exists(&mut tx, payload.sala_reservada).await?;
        Self::check_availability(&mut tx, payload.sala_reservada, &payload.janela(), None).await?;

        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            INSERT INTO reservas
                (reservado_por, sala_reservada, data_inicial, data_final,
                 descricao, tipo_evento, quantidade_pessoas, items)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, reservado_por, sala_reservada, data_inicial, data_final,
                      descricao, tipo_evento, quantidade_pessoas, items
            "#,
        )
        .bind(caller_id)
        .bind(payload.sala_reservada)
        .bind(payload.data_inicial)
        .bind(payload.data_final)
        .bind(&payload.descricao)
        .bind(&payload.tipo_evento)
        .bind(payload.quantidade_pessoas)
        .bind(&payload.items)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reserva)
    }

    /// Find a reservation by id
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<Reserva>> {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT id, reservado_por, sala_reservada, data_inicial, data_final,
                   descricao, tipo_evento, quantidade_pessoas, items
            FROM reservas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reserva)
    }

    /// List reservations with offset/limit pagination. Order is the
    /// store default; callers must not assume stability across
    /// concurrent writes.
    pub async fn list(&self, skip: i64, count: i64) -> ApiResult<Vec<Reserva>> {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT id, reservado_por, sala_reservada, data_inicial, data_final,
                   descricao, tipo_evento, quantidade_pessoas, items
            FROM reservas
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservas)
    }

    /// List the caller's own reservations, joined with their rooms.
    /// There is no path to query another user's reservations here.
    pub async fn list_by_user(
        &self,
        id_usuario: i64,
        skip: i64,
        count: i64,
    ) -> ApiResult<Vec<ReservaComSala>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.reservado_por, r.sala_reservada, r.data_inicial,
                   r.data_final, r.descricao, r.tipo_evento,
                   r.quantidade_pessoas, r.items,
                   s.id AS sala_id, s.nome, s.capacidade
            FROM reservas r
            JOIN salas s ON s.id = r.sala_reservada
            WHERE r.reservado_por = $1
            ORDER BY r.id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(id_usuario)
        .bind(skip)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        let reservas = rows
            .into_iter()
            .map(|row| ReservaComSala {
                reserva: Reserva {
                    id: row.get("id"),
                    reservado_por: row.get("reservado_por"),
                    sala_reservada: row.get("sala_reservada"),
                    data_inicial: row.get("data_inicial"),
                    data_final: row.get("data_final"),
                    descricao: row.get("descricao"),
                    tipo_evento: row.get("tipo_evento"),
                    quantidade_pessoas: row.get("quantidade_pessoas"),
                    items: row.get("items"),
                },
                sala: Sala {
                    id: row.get("sala_id"),
                    nome: row.get("nome"),
                    capacidade: row.get("capacidade"),
                },
            })
            .collect();

        Ok(reservas)
    }

    /// Overwrite a reservation's mutable fields. The stored id and owner
    /// are preserved regardless of the payload, and only the owner may
    /// edit. The moved window is re-checked against every other
    /// reservation on the target room.
    pub async fn update(
        &self,
        id: i64,
        payload: &ReservaPayload,
        caller_id: i64,
    ) -> ApiResult<Reserva> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::lock_reserva(&mut tx, id).await?;
        Self::check_owner(&existing, caller_id)?;
        Self::check_sala_exists(&mut tx, payload.sala_reservada).await?;
        Self::check_availability(&mut tx, payload.sala_reservada, &payload.janela(), Some(id))
            .await?;

        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas
            SET sala_reservada = $2, data_inicial = $3, data_final = $4,
                descricao = $5, tipo_evento = $6, quantidade_pessoas = $7,
                items = $8
            WHERE id = $1
            RETURNING id, reservado_por, sala_reservada, data_inicial, data_final,
                      descricao, tipo_evento, quantidade_pessoas, items
            "#,
        )
        .bind(id)
        .bind(payload.sala_reservada)
        .bind(payload.data_inicial)
        .bind(payload.data_final)
        .bind(&payload.descricao)
        .bind(&payload.tipo_evento)
        .bind(payload.quantidade_pessoas)
        .bind(&payload.items)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reserva)
    }

    /// Delete a reservation; only the owner may delete
    pub async fn delete(&self, id: i64, caller_id: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let existing = Self::lock_reserva(&mut tx, id).await?;
        Self::check_owner(&existing, caller_id)?;

        sqlx::query("DELETE FROM reservas WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn lock_reserva(tx: &mut Transaction<'_, Postgres>, id: i64) -> ApiResult<Reserva> {
        sqlx::query_as::<_, Reserva>(
            r#"
            SELECT id, reservado_por, sala_reservada, data_inicial, data_final,
                   descricao, tipo_evento, quantidade_pessoas, items
            FROM reservas
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reserva não foi encontrada".to_string()))
    }

    fn check_owner(reserva: &Reserva, caller_id: i64) -> ApiResult<()> {
        if reserva.reservado_por != Some(caller_id) {
            return Err(ApiError::Forbidden(
                "Você não possui permissão para realizar essa operação".to_string(),
            ));
        }

        Ok(())
    }

    /// The room row is locked for the rest of the transaction, so two
    /// concurrent writers on the same room cannot both pass the
    /// availability check and double-book it.
    async fn check_sala_exists(tx: &mut Transaction<'_, Postgres>, sala_id: i64) -> ApiResult<()> {
        let sala = sqlx::query("SELECT id FROM salas WHERE id = $1 FOR UPDATE")
            .bind(sala_id)
            .fetch_optional(&mut **tx)
            .await?;

        if sala.is_none() {
            return Err(ApiError::InvalidReference(format!(
                "Sala ({}) não existe",
                sala_id
            )));
        }

        Ok(())
    }

    /// Overlap gate: `existing.inicio < new.fim AND new.inicio <
    /// existing.fim`, excluding the reservation being edited
    async fn check_availability(
        tx: &mut Transaction<'_, Postgres>,
        sala_id: i64,
        janela: &Janela,
        exclude_id: Option<i64>,
    ) -> ApiResult<()> {
        let conflito = sqlx::query(
            r#"
            SELECT id
            FROM reservas
            WHERE sala_reservada = $1
              AND data_inicial < $3
              AND $2 < data_final
              AND ($4::BIGINT IS NULL OR id <> $4)
            LIMIT 1
            "#,
        )
        .bind(sala_id)
        .bind(janela.data_inicial)
        .bind(janela.data_final)
        .bind(exclude_id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(row) = conflito {
            let conflicting_id: i64 = row.get("id");
            return Err(ApiError::Conflict(format!(
                "Sala ({}) já reservada nesse período (reserva {})",
                sala_id, conflicting_id
            )));
        }

        Ok(())
    }
}
