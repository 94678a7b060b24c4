//! Room availability engine
//!
//! Decides whether a room is free for a candidate time window. Windows
//! are half-open `[inicio, fim)`: a reservation ending at 10:00 does not
//! conflict with one starting at 10:00, so back-to-back bookings are
//! allowed. The SQL queries use the same predicate as [`Janela::sobrepoe`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::ApiResult;
use crate::models::{Reserva, Sala};

/// Half-open time window `[data_inicial, data_final)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Janela {
    pub data_inicial: DateTime<Utc>,
    pub data_final: DateTime<Utc>,
}

impl Janela {
    pub fn new(data_inicial: DateTime<Utc>, data_final: DateTime<Utc>) -> Self {
        Self {
            data_inicial,
            data_final,
        }
    }

    /// Two half-open windows overlap iff each one starts before the
    /// other ends: `s1 < e2 && s2 < e1`.
    pub fn sobrepoe(&self, other: &Janela) -> bool {
        self.data_inicial < other.data_final && other.data_inicial < self.data_final
    }
}

/// Read-only availability queries. The reservation repository runs the
/// same overlap predicate inside its transactions when it gates writes.
#[derive(Clone)]
pub struct AvailabilityEngine {
    pool: PgPool,
}

impl AvailabilityEngine {
    /// Create a new availability engine
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every existing reservation on the room whose window overlaps the
    /// candidate window
    pub async fn find_conflicts(&self, sala_id: i64, janela: &Janela) -> ApiResult<Vec<Reserva>> {
        let conflitos = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT id, reservado_por, sala_reservada, data_inicial, data_final,
                   descricao, tipo_evento, quantidade_pessoas, items
            FROM reservas
            WHERE sala_reservada = $1
              AND data_inicial < $3
              AND $2 < data_final
            ORDER BY data_inicial
            "#,
        )
        .bind(sala_id)
        .bind(janela.data_inicial)
        .bind(janela.data_final)
        .fetch_all(&self.pool)
        .await?;

        Ok(conflitos)
    }

    /// Rooms with no reservation overlapping the window. An empty result
    /// is a successful empty response, not an error; the route layer
    /// turns it into the "no rooms" message.
    pub async fn rooms_available(&self, janela: &Janela) -> ApiResult<Vec<Sala>> {
        let salas = sqlx::query_as::<_, Sala>(
            r#"
            SELECT s.id, s.nome, s.capacidade
            FROM salas s
            WHERE NOT EXISTS (
                SELECT 1
                FROM reservas r
                WHERE r.sala_reservada = s.id
                  AND r.data_inicial < $2
                  AND $1 < r.data_final
            )
            ORDER BY s.id
            "#,
        )
        .bind(janela.data_inicial)
        .bind(janela.data_final)
        .fetch_all(&self.pool)
        .await?;

        Ok(salas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn janela(h1: u32, m1: u32, h2: u32, m2: u32) -> Janela {
        Janela::new(
            Utc.with_ymd_and_hms(2025, 6, 1, h1, m1, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, h2, m2, 0).unwrap(),
        )
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = janela(9, 0, 11, 0);
        let b = janela(10, 0, 12, 0);
        assert_eq!(a.sobrepoe(&b), b.sobrepoe(&a));

        let c = janela(13, 0, 14, 0);
        assert_eq!(a.sobrepoe(&c), c.sobrepoe(&a));
    }

    #[test]
    fn a_window_overlaps_itself() {
        let a = janela(9, 0, 10, 0);
        assert!(a.sobrepoe(&a));
    }

    #[test]
    fn back_to_back_windows_do_not_conflict() {
        let a = janela(9, 0, 10, 0);
        let b = janela(10, 0, 11, 0);
        assert!(!a.sobrepoe(&b));
        assert!(!b.sobrepoe(&a));
    }

    #[test]
    fn partial_overlap_conflicts() {
        let a = janela(9, 0, 11, 0);
        let b = janela(10, 0, 12, 0);
        assert!(a.sobrepoe(&b));
    }

    #[test]
    fn containment_conflicts() {
        let outer = janela(9, 0, 12, 0);
        let inner = janela(10, 0, 11, 0);
        assert!(outer.sobrepoe(&inner));
        assert!(inner.sobrepoe(&outer));
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        let a = janela(9, 0, 10, 0);
        let b = janela(11, 0, 12, 0);
        assert!(!a.sobrepoe(&b));
    }
}
