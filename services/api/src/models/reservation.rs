//! Reservation model and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::availability::Janela;

use super::room::Sala;

/// Reservation entity. `reservado_por` is set from the authenticated
/// caller at creation time and is never taken from a request payload.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reserva {
    pub id: i64,
    pub reservado_por: Option<i64>,
    pub sala_reservada: i64,
    pub data_inicial: DateTime<Utc>,
    pub data_final: DateTime<Utc>,
    pub descricao: String,
    pub tipo_evento: String,
    pub quantidade_pessoas: i32,
    pub items: Option<String>,
}

/// Client-supplied reservation fields. Any id or owner in the request
/// body is ignored by deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservaPayload {
    pub sala_reservada: i64,
    pub data_inicial: DateTime<Utc>,
    pub data_final: DateTime<Utc>,
    pub descricao: String,
    pub tipo_evento: String,
    pub quantidade_pessoas: i32,
    pub items: Option<String>,
}

impl ReservaPayload {
    /// The half-open window requested by the client
    pub fn janela(&self) -> Janela {
        Janela::new(self.data_inicial, self.data_final)
    }
}

/// Reservation joined with its room, returned by the per-user listing
#[derive(Debug, Clone, Serialize)]
pub struct ReservaComSala {
    pub reserva: Reserva,
    pub sala: Sala,
}
