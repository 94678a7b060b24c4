//! Room reservation booking service
//!
//! Library crate backing the `api` binary; the modules are exposed so
//! the integration tests can drive the repositories directly.

use sqlx::PgPool;

pub mod availability;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod reaper;
pub mod repositories;
pub mod routes;
pub mod validation;

use availability::AvailabilityEngine;
use jwt::JwtService;
use repositories::{
    TokenRepository, UserRepository, reservation::ReservationRepository, room::RoomRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub token_repository: TokenRepository,
    pub room_repository: RoomRepository,
    pub reservation_repository: ReservationRepository,
    pub availability: AvailabilityEngine,
}
