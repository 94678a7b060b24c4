//! Input validation utilities

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email é obrigatório".to_string());
    }

    if email.len() > 254 {
        return Err("Email deve ter no máximo 254 caracteres".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Formato de email inválido".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_senha(senha: &str) -> Result<(), String> {
    if senha.is_empty() {
        return Err("Senha é obrigatória".to_string());
    }

    if senha.len() > 128 {
        return Err("Senha deve ter no máximo 128 caracteres".to_string());
    }

    Ok(())
}

/// Validate room capacity
pub fn validate_capacidade(capacidade: i32) -> Result<(), String> {
    if capacidade <= 0 {
        return Err("Capacidade deve ser um inteiro positivo".to_string());
    }

    Ok(())
}

/// Validate a reservation window: start must precede end
pub fn validate_janela(data_inicial: DateTime<Utc>, data_final: DateTime<Utc>) -> Result<(), String> {
    if data_inicial >= data_final {
        return Err("Data inicial deve ser anterior à data final".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn email_accepts_short_domains() {
        assert!(validate_email("ana@x.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("sem-arroba").is_err());
    }

    #[test]
    fn senha_must_be_present() {
        assert!(validate_senha("pw1").is_ok());
        assert!(validate_senha("").is_err());
    }

    #[test]
    fn capacidade_must_be_positive() {
        assert!(validate_capacidade(1).is_ok());
        assert!(validate_capacidade(0).is_err());
        assert!(validate_capacidade(-3).is_err());
    }

    #[test]
    fn janela_must_not_be_inverted_or_empty() {
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();

        assert!(validate_janela(t1, t2).is_ok());
        assert!(validate_janela(t2, t1).is_err());
        assert!(validate_janela(t1, t1).is_err());
    }
}
