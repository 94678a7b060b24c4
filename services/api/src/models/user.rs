//! User model and request payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity; `senha` holds the argon2 hash and is never serialized
/// back to clients
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub usuario: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha: String,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegistroRequest {
    pub usuario: String,
    pub email: String,
    pub senha: String,
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Password change payload
#[derive(Debug, Clone, Deserialize)]
pub struct AlterarSenhaRequest {
    pub email: String,
    pub senha_antiga: String,
    pub senha_nova: String,
}
