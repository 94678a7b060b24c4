use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use api::AppState;
use api::availability::AvailabilityEngine;
use api::jwt::{JwtConfig, JwtService};
use api::reaper::TokenReaper;
use api::repositories::{
    TokenRepository, UserRepository, reservation::ReservationRepository, room::RoomRepository,
};
use api::routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting room reservation service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations").run(&pool).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    let user_repository = UserRepository::new(pool.clone());
    let token_repository = TokenRepository::new(pool.clone());
    let room_repository = RoomRepository::new(pool.clone());
    let reservation_repository = ReservationRepository::new(pool.clone());
    let availability = AvailabilityEngine::new(pool.clone());

    // Stale tokens are reaped by a scheduled job, one day of retention
    let reaper_schedule =
        std::env::var("TOKEN_REAPER_SCHEDULE").unwrap_or_else(|_| "0 0 * * * *".to_string());
    let reaper = TokenReaper::new(token_repository.clone(), chrono::Duration::days(1));
    let _scheduler = reaper.start(&reaper_schedule).await?;

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        user_repository,
        token_repository,
        room_repository,
        reservation_repository,
        availability,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Room reservation service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
