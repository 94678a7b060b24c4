//! Token record and response shapes

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Persisted token record; `status = false` means revoked
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Token {
    pub access_token: String,
    pub id_usuario: i64,
    pub refresh_token: String,
    pub status: bool,
    pub data_criacao: DateTime<Utc>,
}

/// Token pair returned by login
#[derive(Debug, Clone, Serialize)]
pub struct TokenSchema {
    pub access_token: String,
    pub refresh_token: String,
}
