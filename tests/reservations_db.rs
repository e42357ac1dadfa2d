//! Booking engine tests against a live PostgreSQL database
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use courtbook_server::{
    clock::FixedClock,
    config::BookingConfig,
    models::{
        reservation::CreateReservationRequest, summary::SummaryQuery, ReservationStatus,
        TariffSource, UserClaims,
    },
    repository::{reservations::map_overlap_violation, Repository},
    services::Services,
    AppError,
};

struct Fixture {
    services: Services,
    pool: PgPool,
    club_id: i32,
    court_id: i32,
    player: UserClaims,
    manager: UserClaims,
}

async fn setup() -> Fixture {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let tag = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (login, firstname, lastname, phone) VALUES ($1, 'Lucia', 'Paz', '555-0101') RETURNING id",
    )
    .bind(format!("lucia-{}", tag))
    .fetch_one(&pool)
    .await
    .unwrap();

    let club_id: i32 = sqlx::query_scalar(
        "INSERT INTO clubs (name, add_on_price, night_start, night_end) VALUES ($1, 500, '22:00', '06:00') RETURNING id",
    )
    .bind(format!("Club {}", tag))
    .fetch_one(&pool)
    .await
    .unwrap();

    let court_id: i32 = sqlx::query_scalar(
        "INSERT INTO courts (club_id, name, day_price, night_price) VALUES ($1, 'Cancha 1', 1000, 1400) RETURNING id",
    )
    .bind(club_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO club_hours (club_id, weekday, open_time, close_time) VALUES ($1, 1, '08:00', '02:00')")
        .bind(club_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO tariff_rules (club_id, weekday, from_time, to_time, price_per_hour) VALUES ($1, 1, '18:00', '22:00', 2000)")
        .bind(club_id)
        .execute(&pool)
        .await
        .unwrap();

    let now = NaiveDate::from_ymd_opt(2029, 12, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let services = Services::new(
        Repository::new(pool.clone()),
        Arc::new(FixedClock(now)),
        &BookingConfig::default(),
    );

    Fixture {
        services,
        pool,
        club_id,
        court_id,
        player: UserClaims {
            sub: "lucia".to_string(),
            user_id,
            club_id: None,
            exp: 0,
            iat: 0,
        },
        manager: UserClaims {
            sub: "club".to_string(),
            user_id: user_id + 100_000,
            club_id: Some(club_id),
            exp: 0,
            iat: 0,
        },
    }
}

// 2030-01-07 is a Monday
fn request(court_id: i32, date: &str, start_time: &str, hours: i64) -> CreateReservationRequest {
    CreateReservationRequest {
        court_id: Some(court_id),
        date: Some(date.to_string()),
        start_time: Some(start_time.to_string()),
        duration_hours: Some(hours.into()),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn test_concurrent_bookings_admit_exactly_one() {
    let f = setup().await;
    let svc = &f.services.reservations;

    let (a, b) = tokio::join!(
        svc.create_reservation(&f.player, request(f.court_id, "2030-01-07", "10:00", 2)),
        svc.create_reservation(&f.player, request(f.court_id, "2030-01-07", "11:00", 1)),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(AppError::Conflict(_)))));
}

#[tokio::test]
#[ignore]
async fn test_cancel_frees_the_slot() {
    let f = setup().await;
    let svc = &f.services.reservations;

    let first = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-07", "19:00", 2))
        .await
        .unwrap();
    assert_eq!(first.tariff_source, TariffSource::Rule);
    assert_eq!(first.monto_total, Decimal::from(4000));
    assert_eq!(first.contact_name.as_deref(), Some("Lucia"));

    let again = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-07", "20:00", 1))
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let cancelled = svc.cancel_reservation(&f.player, first.id).await.unwrap();
    assert_eq!(cancelled.estado, ReservationStatus::Cancelada);

    let rebooked = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-07", "20:00", 1))
        .await
        .unwrap();
    assert_eq!(rebooked.estado, ReservationStatus::Pendiente);

    let recancel = svc.cancel_reservation(&f.player, first.id).await;
    assert!(matches!(recancel, Err(AppError::Validation(_))));

    // Back-to-back window on the same court is free
    svc.create_reservation(&f.player, request(f.court_id, "2030-01-07", "21:00", 1))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_late_booking_blocks_the_next_morning() {
    let f = setup().await;
    let svc = &f.services.reservations;

    let late = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-07", "23:30", 2))
        .await
        .unwrap();
    assert_eq!(late.tariff_source, TariffSource::CourtNight);

    let conflict = svc
        .has_conflict(f.court_id, "2030-01-08", "01:00", Some(1))
        .await
        .unwrap();
    assert!(conflict);
    let free = svc
        .has_conflict(f.court_id, "2030-01-08", "01:30", Some(1))
        .await
        .unwrap();
    assert!(!free);
}

#[tokio::test]
#[ignore]
async fn test_early_morning_uses_previous_evening_hours() {
    let f = setup().await;
    let svc = &f.services.reservations;

    // Only Monday has hours (08:00-02:00); 2030-01-08 is a Tuesday
    let early = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-08", "00:30", 1))
        .await
        .unwrap();
    assert_eq!(early.tariff_source, TariffSource::CourtNight);
    assert_eq!(early.monto_base, Decimal::from(1400));

    let past_close = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-08", "01:30", 1))
        .await;
    assert!(matches!(past_close, Err(AppError::Validation(_))));
}

#[tokio::test]
#[ignore]
async fn test_exclusion_constraint_maps_to_conflict() {
    let f = setup().await;

    let insert = "INSERT INTO reservations (court_id, date, start_time, end_time, duration_hours, created_by, \
                  price_per_hour, monto_base, monto_total, kind, tariff_source) \
                  VALUES ($1, $2, $3, $4, $5, 1, 1000, 1000, 1000, 'privada', 'court_day')";
    let date = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();
    let at = |h| chrono::NaiveTime::from_hms_opt(h, 0, 0).unwrap();

    sqlx::query(insert)
        .bind(f.court_id)
        .bind(date)
        .bind(at(10))
        .bind(at(12))
        .bind(2_i16)
        .execute(&f.pool)
        .await
        .unwrap();

    let err = sqlx::query(insert)
        .bind(f.court_id)
        .bind(date)
        .bind(at(11))
        .bind(at(12))
        .bind(1_i16)
        .execute(&f.pool)
        .await
        .unwrap_err();
    assert!(matches!(
        map_overlap_violation(err, f.court_id),
        AppError::Conflict(_)
    ));
}

#[tokio::test]
#[ignore]
async fn test_summary_reconciles_with_rows() {
    let f = setup().await;
    let svc = &f.services.reservations;

    let mut with_add_on = request(f.court_id, "2030-01-07", "10:00", 1);
    with_add_on.add_on_requested = Some(true);
    let a = svc.create_reservation(&f.player, with_add_on).await.unwrap();
    let b = svc
        .create_reservation(&f.player, request(f.court_id, "2030-01-07", "12:00", 2))
        .await
        .unwrap();
    svc.cancel_reservation(&f.manager, b.id).await.unwrap();

    let query = SummaryQuery {
        date: Some("2030-01-07".to_string()),
        ..Default::default()
    };
    let day = f
        .services
        .summary
        .summarize(&f.manager, f.club_id, &query)
        .await
        .unwrap();

    assert_eq!(day.totals.count, 2);
    assert_eq!(day.totals.active_count, 1);
    assert_eq!(day.totals.cancelled_count, 1);
    assert_eq!(day.totals.add_on_amount, Decimal::from(500));
    assert_eq!(day.totals.gross_amount, a.monto_total + b.monto_total);

    let monthly = f
        .services
        .summary
        .monthly(&f.manager, f.club_id, 2030, 1)
        .await
        .unwrap();
    assert_eq!(monthly.totals, day.totals);

    let deleted = sqlx::query("DELETE FROM clubs WHERE id = $1")
        .bind(f.club_id)
        .execute(&f.pool)
        .await
        .unwrap();
    assert_eq!(deleted.rows_affected(), 1);
}
