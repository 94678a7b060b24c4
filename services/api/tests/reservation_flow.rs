//! Integration tests for the reservation lifecycle
//!
//! These tests drive the repositories against a live PostgreSQL
//! instance; point `DATABASE_URL` at a scratch database and run them
//! with `cargo test -- --ignored`.

use api::availability::{AvailabilityEngine, Janela};
use api::error::ApiError;
use api::models::{ReservaPayload, SalaPayload};
use api::repositories::{
    UserRepository, reservation::ReservationRepository, room::RoomRepository,
};
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;

async fn setup() -> PgPool {
    let db_config = common::database::DatabaseConfig::from_env().expect("database config");
    let pool = common::database::init_pool(&db_config)
        .await
        .expect("database pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

fn unique_email(tag: &str) -> String {
    format!(
        "{}-{}@x.com",
        tag,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

fn instante(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, min, 0).unwrap()
}

fn payload(sala_id: i64, inicio: (u32, u32), fim: (u32, u32)) -> ReservaPayload {
    ReservaPayload {
        sala_reservada: sala_id,
        data_inicial: instante(inicio.0, inicio.1),
        data_final: instante(fim.0, fim.1),
        descricao: "Reunião de planejamento".to_string(),
        tipo_evento: "reuniao".to_string(),
        quantidade_pessoas: 5,
        items: None,
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn duplicate_registration_is_rejected_and_hash_is_opaque() {
    let pool = setup().await;
    let users = UserRepository::new(pool);

    let email = unique_email("ana");
    let user = users
        .create("ana", &email, "pw1")
        .await
        .expect("first registration");

    // The stored hash never equals the plaintext password
    assert_ne!(user.senha, "pw1");
    assert!(user.senha.starts_with("$argon2"));

    let err = users
        .create("ana", &email, "pw1")
        .await
        .expect_err("duplicate registration must fail");
    assert!(matches!(err, ApiError::AlreadyExists(_)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn owner_comes_from_caller_and_update_preserves_identity() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let rooms = RoomRepository::new(pool.clone());
    let reservations = ReservationRepository::new(pool);

    let dona = users
        .create("ana", &unique_email("ana"), "pw1")
        .await
        .expect("register owner");
    let sala = rooms
        .create(&SalaPayload {
            nome: "Sala Azul".to_string(),
            capacidade: 10,
        })
        .await
        .expect("create room");

    // The payload carries no owner; the repository binds the caller
    let reserva = reservations
        .create(&payload(sala.id, (9, 0), (10, 0)), dona.id)
        .await
        .expect("create reservation");
    assert_eq!(reserva.reservado_por, Some(dona.id));

    // Editing moves the window but never the stored id or owner
    let updated = reservations
        .update(reserva.id, &payload(sala.id, (14, 0), (15, 0)), dona.id)
        .await
        .expect("update reservation");
    assert_eq!(updated.id, reserva.id);
    assert_eq!(updated.reservado_por, Some(dona.id));

    // A different authenticated user cannot edit or delete it
    let intrusa = users
        .create("bia", &unique_email("bia"), "pw2")
        .await
        .expect("register second user");
    let err = reservations
        .update(reserva.id, &payload(sala.id, (16, 0), (17, 0)), intrusa.id)
        .await
        .expect_err("non-owner update must fail");
    assert!(matches!(err, ApiError::Forbidden(_)));

    let err = reservations
        .delete(reserva.id, intrusa.id)
        .await
        .expect_err("non-owner delete must fail");
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn missing_room_is_an_invalid_reference() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let reservations = ReservationRepository::new(pool);

    let user = users
        .create("ana", &unique_email("ana"), "pw1")
        .await
        .expect("register user");

    let err = reservations
        .create(&payload(-1, (9, 0), (10, 0)), user.id)
        .await
        .expect_err("dangling room reference must fail");
    assert!(matches!(err, ApiError::InvalidReference(_)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn booked_room_is_absent_from_disponiveis() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let rooms = RoomRepository::new(pool.clone());
    let reservations = ReservationRepository::new(pool.clone());
    let availability = AvailabilityEngine::new(pool);

    let user = users
        .create("ana", &unique_email("ana"), "pw1")
        .await
        .expect("register user");
    let sala = rooms
        .create(&SalaPayload {
            nome: "Sala Verde".to_string(),
            capacidade: 8,
        })
        .await
        .expect("create room");

    reservations
        .create(&payload(sala.id, (9, 0), (10, 0)), user.id)
        .await
        .expect("create reservation");

    // Overlapping query window: the room must be excluded
    let ocupada = Janela::new(instante(9, 30), instante(10, 30));
    let livres = availability
        .rooms_available(&ocupada)
        .await
        .expect("availability query");
    assert!(!livres.iter().any(|s| s.id == sala.id));

    // Back-to-back window: the room is free again
    let seguinte = Janela::new(instante(10, 0), instante(11, 0));
    let livres = availability
        .rooms_available(&seguinte)
        .await
        .expect("availability query");
    assert!(livres.iter().any(|s| s.id == sala.id));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn overlapping_create_is_rejected() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let rooms = RoomRepository::new(pool.clone());
    let reservations = ReservationRepository::new(pool);

    let user = users
        .create("ana", &unique_email("ana"), "pw1")
        .await
        .expect("register user");
    let sala = rooms
        .create(&SalaPayload {
            nome: "Sala Amarela".to_string(),
            capacidade: 6,
        })
        .await
        .expect("create room");

    reservations
        .create(&payload(sala.id, (9, 0), (10, 0)), user.id)
        .await
        .expect("first reservation");

    let err = reservations
        .create(&payload(sala.id, (9, 30), (10, 30)), user.id)
        .await
        .expect_err("overlapping reservation must fail");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn concurrent_creates_cannot_double_book() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let rooms = RoomRepository::new(pool.clone());
    let reservations = ReservationRepository::new(pool);

    let user = users
        .create("ana", &unique_email("ana"), "pw1")
        .await
        .expect("register user");
    let sala = rooms
        .create(&SalaPayload {
            nome: "Sala Disputada".to_string(),
            capacidade: 12,
        })
        .await
        .expect("create room");

    // Both writers target overlapping windows on the same room; the
    // room-row lock serializes them so exactly one commits.
    let first = {
        let repo = reservations.clone();
        let p = payload(sala.id, (9, 0), (10, 0));
        let uid = user.id;
        tokio::spawn(async move { repo.create(&p, uid).await })
    };
    let second = {
        let repo = reservations.clone();
        let p = payload(sala.id, (9, 30), (10, 30));
        let uid = user.id;
        tokio::spawn(async move { repo.create(&p, uid).await })
    };

    let a = first.await.expect("join first writer");
    let b = second.await.expect("join second writer");

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one of the two writers must win");

    let loser = if a.is_err() { a.err() } else { b.err() };
    assert!(matches!(loser, Some(ApiError::Conflict(_))));
}
