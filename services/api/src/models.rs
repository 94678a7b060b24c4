//! Booking service models
//!
//! Field names follow the published API contract (Portuguese wire
//! format); success messages and entity payloads are distinct JSON
//! shapes and are never conflated.

use serde::Serialize;

pub mod reservation;
pub mod room;
pub mod token;
pub mod user;

// Re-export for convenience
pub use reservation::{Reserva, ReservaComSala, ReservaPayload};
pub use room::{Sala, SalaPayload};
pub use token::{Token, TokenSchema};
pub use user::{AlterarSenhaRequest, LoginRequest, RegistroRequest, Usuario};

/// Structured success message returned by mutation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct Mensagem {
    pub label: String,
    pub payload: String,
}

/// Build the standard message response
pub fn mensagem(conteudo: impl Into<String>) -> Mensagem {
    Mensagem {
        label: "mensagem".to_string(),
        payload: conteudo.into(),
    }
}
