//! Repository layer for database operations

pub mod clubs;
pub mod reservations;
pub mod users;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Club, Court, NewReservation, OperatingHours, PaymentStatus, Reservation,
        ReservationStatus, TariffRule, TimeWindow, UserProfile,
    },
};

/// Storage operations the booking engine depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_court(&self, court_id: i32) -> AppResult<Court>;

    async fn get_club(&self, club_id: i32) -> AppResult<Club>;

    /// Hours row for an ISO weekday, if configured
    async fn hours_for(&self, club_id: i32, weekday: i16) -> AppResult<Option<OperatingHours>>;

    async fn tariff_rules(&self, club_id: i32, weekday: i16) -> AppResult<Vec<TariffRule>>;

    async fn get_user_profile(&self, user_id: i32) -> AppResult<UserProfile>;

    /// Lock-free read: does any active reservation overlap `window`?
    async fn has_conflict(&self, court_id: i32, window: TimeWindow) -> AppResult<bool>;

    /// Insert `reservation` unless an active one overlaps it, atomically
    async fn reserve_if_free(&self, reservation: NewReservation) -> AppResult<Reservation>;

    async fn get_reservation(&self, id: i32) -> AppResult<Reservation>;

    /// Compare-and-set on `estado`
    async fn update_status(
        &self,
        id: i32,
        expected: ReservationStatus,
        estado: ReservationStatus,
        estado_pago: PaymentStatus,
    ) -> AppResult<Reservation>;

    async fn delete_reservation(&self, id: i32) -> AppResult<()>;

    /// Reservations of a club's courts dated within `[start, end]`
    async fn reservations_between(
        &self,
        club_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;

    /// Move active reservations ended by `now` to finalizada
    async fn finalize_elapsed(&self, now: NaiveDateTime) -> AppResult<u64>;

    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub clubs: clubs::ClubsRepository,
    pub reservations: reservations::ReservationsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            clubs: clubs::ClubsRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl BookingStore for Repository {
    async fn get_court(&self, court_id: i32) -> AppResult<Court> {
        self.clubs.get_court(court_id).await
    }

    async fn get_club(&self, club_id: i32) -> AppResult<Club> {
        self.clubs.get_club(club_id).await
    }

    async fn hours_for(&self, club_id: i32, weekday: i16) -> AppResult<Option<OperatingHours>> {
        self.clubs.hours_for(club_id, weekday).await
    }

    async fn tariff_rules(&self, club_id: i32, weekday: i16) -> AppResult<Vec<TariffRule>> {
        self.clubs.tariff_rules(club_id, weekday).await
    }

    async fn get_user_profile(&self, user_id: i32) -> AppResult<UserProfile> {
        self.users.get_profile(user_id).await
    }

    async fn has_conflict(&self, court_id: i32, window: TimeWindow) -> AppResult<bool> {
        self.reservations.has_conflict(court_id, &window).await
    }

    async fn reserve_if_free(&self, reservation: NewReservation) -> AppResult<Reservation> {
        self.reservations.reserve_if_free(&reservation).await
    }

    async fn get_reservation(&self, id: i32) -> AppResult<Reservation> {
        self.reservations.get_by_id(id).await
    }

    async fn update_status(
        &self,
        id: i32,
        expected: ReservationStatus,
        estado: ReservationStatus,
        estado_pago: PaymentStatus,
    ) -> AppResult<Reservation> {
        self.reservations
            .update_status(id, expected, estado, estado_pago)
            .await
    }

    async fn delete_reservation(&self, id: i32) -> AppResult<()> {
        self.reservations.delete(id).await
    }

    async fn reservations_between(
        &self,
        club_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.list_for_club(club_id, start, end).await
    }

    async fn finalize_elapsed(&self, now: NaiveDateTime) -> AppResult<u64> {
        self.reservations.finalize_elapsed(now).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
