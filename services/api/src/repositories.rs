//! Repositories for database operations
//!
//! Store failures are translated into the `ApiError` taxonomy at this
//! boundary; handlers never see raw sqlx errors.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::models::{Token, Usuario};
use crate::password;

pub mod reservation;
pub mod room;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user; the password is hashed before it is stored
    /// and the plaintext is never persisted.
    pub async fn create(&self, usuario: &str, email: &str, senha: &str) -> ApiResult<Usuario> {
        info!("Registering user: {}", email);

        if self.find_by_email(email).await?.is_some() {
            return Err(ApiError::AlreadyExists("Usuario já registrado".to_string()));
        }

        let hash = password::hash_senha(senha).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

        // A concurrent duplicate registration still trips the unique
        // constraint, which maps to AlreadyExists.
        let user = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (usuario, email, senha)
            VALUES ($1, $2, $3)
            RETURNING id, usuario, email, senha
            "#,
        )
        .bind(usuario)
        .bind(email)
        .bind(&hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email (case-sensitive, as stored)
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<Usuario>> {
        let user = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, usuario, email, senha
            FROM usuarios
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users
    pub async fn find_all(&self) -> ApiResult<Vec<Usuario>> {
        let users = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, usuario, email, senha
            FROM usuarios
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Rotate a user's password hash
    pub async fn update_senha(&self, id: i64, senha_hash: &str) -> ApiResult<()> {
        info!("Rotating password hash for user {}", id);

        sqlx::query("UPDATE usuarios SET senha = $2 WHERE id = $1")
            .bind(id)
            .bind(senha_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Token repository
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a freshly issued token pair as active
    pub async fn create(&self, id_usuario: i64, access: &str, refresh: &str) -> ApiResult<Token> {
        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (access_token, id_usuario, refresh_token, status, data_criacao)
            VALUES ($1, $2, $3, TRUE, now())
            RETURNING access_token, id_usuario, refresh_token, status, data_criacao
            "#,
        )
        .bind(access)
        .bind(id_usuario)
        .bind(refresh)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }

    /// True when an active record matches both the owner and the raw
    /// token string. A syntactically valid but revoked or unknown token
    /// fails this check.
    pub async fn is_active(&self, id_usuario: i64, access_token: &str) -> ApiResult<bool> {
        let row: Option<(bool,)> = sqlx::query_as(
            r#"
            SELECT status
            FROM tokens
            WHERE id_usuario = $1 AND access_token = $2
            "#,
        )
        .bind(id_usuario)
        .bind(access_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(matches!(row, Some((true,))))
    }

    /// Revoke the caller's matching token record; returns false when no
    /// such record exists
    pub async fn revoke(&self, id_usuario: i64, access_token: &str) -> ApiResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tokens
            SET status = FALSE
            WHERE id_usuario = $1 AND access_token = $2
            "#,
        )
        .bind(id_usuario)
        .bind(access_token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete every token record issued before the cutoff,
    /// regardless of owner or status. Used by the reaper.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE data_criacao < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
