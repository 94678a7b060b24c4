//! Password hashing and verification
//!
//! Argon2 with a random salt; hashes are one-way and verification is
//! constant-time via the PHC string comparison.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a plaintext password
pub fn hash_senha(senha: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(senha.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

/// Verify a plaintext password against a stored hash
pub fn verificar_senha(senha: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    Ok(argon2.verify_password(senha.as_bytes(), &parsed_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext() {
        let hash = hash_senha("pw1").expect("failed to hash");
        assert_ne!(hash, "pw1");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn verify_roundtrip() {
        let hash = hash_senha("correct horse").expect("failed to hash");
        assert!(verificar_senha("correct horse", &hash).expect("failed to verify"));
        assert!(!verificar_senha("wrong horse", &hash).expect("failed to verify"));
    }

    #[test]
    fn garbage_hash_is_an_error_not_a_match() {
        assert!(verificar_senha("pw", "not-a-phc-string").is_err());
    }
}
