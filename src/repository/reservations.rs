//! Reservations repository for database operations

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{NewReservation, PaymentStatus, Reservation, ReservationStatus, TimeWindow},
    services::conflict::{candidate_dates, find_conflict},
};

const RESERVATION_COLUMNS: &str = r#"
    id, court_id, date, start_time, end_time, duration_hours, user_id, created_by,
    contact_name, contact_surname, contact_phone, price_per_hour,
    monto_base, monto_add_on, monto_total, add_on_requested,
    kind, estado, estado_pago, tariff_source, created_at, updated_at
"#;

/// SQLSTATE raised by the `reservations_no_overlap` exclusion constraint
const EXCLUSION_VIOLATION: &str = "23P01";

/// Map an insert error, turning an exclusion-constraint hit into `Conflict`
pub fn map_overlap_violation(err: sqlx::Error, court_id: i32) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return AppError::Conflict(format!(
                "Court {} is already booked for the requested window",
                court_id
            ));
        }
    }
    AppError::Database(err)
}

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Check for an overlapping active reservation without taking locks
    pub async fn has_conflict(&self, court_id: i32, window: &TimeWindow) -> AppResult<bool> {
        let (from, to) = candidate_dates(window.start.date());
        let candidates = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE court_id = $1 AND date BETWEEN $2 AND $3 AND estado = ANY($4)
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(court_id)
        .bind(from)
        .bind(to)
        .bind(ReservationStatus::active_values())
        .fetch_all(&self.pool)
        .await?;

        Ok(find_conflict(&candidates, window).is_some())
    }

    /// Insert a reservation if its window is free.
    ///
    /// Locks the court row first so concurrent attempts on the same court
    /// queue up behind this transaction, then locks and checks the candidate
    /// reservations and inserts. Any error drops the transaction, which rolls
    /// it back.
    pub async fn reserve_if_free(&self, data: &NewReservation) -> AppResult<Reservation> {
        let window = data.window();
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM courts WHERE id = $1 FOR UPDATE")
                .bind(data.court_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Court {} not found", data.court_id)));
        }

        let (from, to) = candidate_dates(data.date);
        let candidates = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE court_id = $1 AND date BETWEEN $2 AND $3 AND estado = ANY($4)
            FOR UPDATE
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(data.court_id)
        .bind(from)
        .bind(to)
        .bind(ReservationStatus::active_values())
        .fetch_all(&mut *tx)
        .await?;

        if let Some(existing) = find_conflict(&candidates, &window) {
            tracing::warn!(
                court_id = data.court_id,
                existing_id = existing.id,
                "Booking rejected: window {} - {} overlaps an active reservation",
                window.start,
                window.end
            );
            return Err(AppError::Conflict(format!(
                "Court {} is already booked on {} from {} to {}",
                data.court_id,
                existing.date,
                existing.start_time.format("%H:%M"),
                existing.end_time.format("%H:%M")
            )));
        }

        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (
                court_id, date, start_time, end_time, duration_hours, user_id, created_by,
                contact_name, contact_surname, contact_phone, price_per_hour,
                monto_base, monto_add_on, monto_total, add_on_requested,
                kind, estado, estado_pago, tariff_source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(data.court_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.duration_hours)
        .bind(data.user_id)
        .bind(data.created_by)
        .bind(&data.contact.name)
        .bind(&data.contact.surname)
        .bind(&data.contact.phone)
        .bind(data.price_per_hour)
        .bind(data.monto_base)
        .bind(data.monto_add_on)
        .bind(data.monto_total)
        .bind(data.add_on_requested)
        .bind(data.kind.as_str())
        .bind(ReservationStatus::Pendiente.as_str())
        .bind(PaymentStatus::PendientePago.as_str())
        .bind(data.tariff_source.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_overlap_violation(e, data.court_id))?;

        tx.commit().await?;

        Ok(reservation)
    }

    /// Update status fields if `estado` is still `expected`
    pub async fn update_status(
        &self,
        id: i32,
        expected: ReservationStatus,
        estado: ReservationStatus,
        estado_pago: PaymentStatus,
    ) -> AppResult<Reservation> {
        let updated = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET estado = $3, estado_pago = $4, updated_at = NOW()
            WHERE id = $1 AND estado = $2
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(estado.as_str())
        .bind(estado_pago.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(reservation) => Ok(reservation),
            None => {
                // Distinguish a missing row from a lost race
                let current = self.get_by_id(id).await?;
                Err(AppError::Conflict(format!(
                    "Reservation {} changed to {} concurrently",
                    id, current.estado
                )))
            }
        }
    }

    /// Delete a reservation
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reservation with id {} not found", id)));
        }
        Ok(())
    }

    /// Reservations of a club's courts dated within `[start, end]`
    pub async fn list_for_club(
        &self,
        club_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE court_id IN (SELECT id FROM courts WHERE club_id = $1)
              AND date BETWEEN $2 AND $3
            ORDER BY date, start_time, id
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(club_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mark active reservations whose window ended by `now` as finalizada
    pub async fn finalize_elapsed(&self, now: NaiveDateTime) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET estado = $1, updated_at = NOW()
            WHERE estado = ANY($2)
              AND date + start_time + duration_hours * INTERVAL '1 hour' <= $3
            "#,
        )
        .bind(ReservationStatus::Finalizada.as_str())
        .bind(ReservationStatus::active_values())
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
