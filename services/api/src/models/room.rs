//! Room model and payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Room entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sala {
    pub id: i64,
    pub nome: String,
    pub capacidade: i32,
}

/// Client-supplied room fields; the id always comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct SalaPayload {
    pub nome: String,
    pub capacidade: i32,
}
