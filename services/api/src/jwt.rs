//! JWT service for token issuance and validation
//!
//! Access and refresh tokens are HMAC-signed claim sets carrying the
//! subject (user id) and an expiry. The two token classes are signed
//! with separate secrets, so an access token never validates as a
//! refresh token or vice versa.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// HMAC algorithm (HS256, HS384 or HS512)
    pub algorithm: Algorithm,
    /// Access token expiry in minutes (default: 30)
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in minutes (default: 7 days)
    pub refresh_token_expiry_minutes: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET_KEY`: secret for access tokens (required)
    /// - `JWT_REFRESH_SECRET_KEY`: secret for refresh tokens (required)
    /// - `JWT_ALGORITHM`: HS256 (default), HS384 or HS512
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES`: default 30
    /// - `REFRESH_TOKEN_EXPIRE_MINUTES`: default 10080
    pub fn from_env() -> Result<Self> {
        let access_secret = env::var("JWT_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET_KEY environment variable not set"))?;

        let refresh_secret = env::var("JWT_REFRESH_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET_KEY environment variable not set"))?;

        let algorithm = match env::var("JWT_ALGORITHM").as_deref() {
            Ok("HS384") => Algorithm::HS384,
            Ok("HS512") => Algorithm::HS512,
            Ok("HS256") | Err(_) => Algorithm::HS256,
            Ok(other) => anyhow::bail!("Unsupported JWT algorithm: {}", other),
        };

        let access_token_expiry_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let refresh_token_expiry_minutes = env::var("REFRESH_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60 * 24 * 7);

        Ok(JwtConfig {
            access_secret,
            refresh_secret,
            algorithm,
            access_token_expiry_minutes,
            refresh_token_expiry_minutes,
        })
    }
}

/// JWT claims structure
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Token class, each signed with its own secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Access,
    Refresh,
}

/// Decode failure markers; malformed input never panics
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expirado")]
    Expired,
    #[error("assinatura inválida")]
    InvalidSignature,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        JwtService {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            algorithm: config.algorithm,
            access_ttl: Duration::minutes(config.access_token_expiry_minutes),
            refresh_ttl: Duration::minutes(config.refresh_token_expiry_minutes),
        }
    }

    /// Default TTL for access tokens
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Default TTL for refresh tokens
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Generate an access token for a subject
    pub fn issue_access_token(&self, subject: i64, ttl: Duration) -> Result<String> {
        self.issue(subject, ttl, &self.access_encoding)
    }

    /// Generate a refresh token for a subject
    pub fn issue_refresh_token(&self, subject: i64, ttl: Duration) -> Result<String> {
        self.issue(subject, ttl, &self.refresh_encoding)
    }

    fn issue(&self, subject: i64, ttl: Duration, key: &EncodingKey) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, key)?;
        Ok(token)
    }

    /// Validate a token of the given class and return its claims
    pub fn decode(&self, token: &str, class: TokenClass) -> Result<Claims, TokenError> {
        let key = match class {
            TokenClass::Access => &self.access_decoding,
            TokenClass::Refresh => &self.refresh_decoding,
        };

        // Zero leeway: a token issued with a non-positive TTL is already
        // expired.
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        match decode::<Claims>(token, key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::InvalidSignature),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            access_secret: "access-secret-for-tests".to_string(),
            refresh_secret: "refresh-secret-for-tests".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_minutes: 30,
            refresh_token_expiry_minutes: 60 * 24 * 7,
        })
    }

    #[test]
    fn issue_and_decode_roundtrip() {
        let jwt = service();
        let token = jwt
            .issue_access_token(42, Duration::minutes(30))
            .expect("failed to issue token");

        let claims = jwt
            .decode(&token, TokenClass::Access)
            .expect("failed to decode token");
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn negative_ttl_is_expired_immediately() {
        let jwt = service();
        let token = jwt
            .issue_access_token(1, Duration::minutes(-1))
            .expect("failed to issue token");

        assert_eq!(
            jwt.decode(&token, TokenClass::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn access_token_does_not_validate_as_refresh() {
        let jwt = service();
        let token = jwt
            .issue_access_token(7, Duration::minutes(30))
            .expect("failed to issue token");

        assert_eq!(
            jwt.decode(&token, TokenClass::Refresh),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn malformed_input_is_a_failure_marker() {
        let jwt = service();
        assert_eq!(
            jwt.decode("not-a-token", TokenClass::Access),
            Err(TokenError::InvalidSignature)
        );
        assert_eq!(jwt.decode("", TokenClass::Access), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn tampered_token_fails_signature_check() {
        let jwt = service();
        let mut token = jwt
            .issue_access_token(9, Duration::minutes(30))
            .expect("failed to issue token");
        token.push('x');

        assert_eq!(
            jwt.decode(&token, TokenClass::Access),
            Err(TokenError::InvalidSignature)
        );
    }
}
