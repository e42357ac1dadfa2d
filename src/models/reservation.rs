//! Reservation model and related types

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{PaymentStatus, ReservationKind, ReservationStatus, TariffSource};

/// Shortest bookable slot, in hours
pub const MIN_DURATION_HOURS: i64 = 1;
/// Longest bookable slot, in hours
pub const MAX_DURATION_HOURS: i64 = 8;

/// Reservation model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub court_id: i32,
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    /// Wall-clock end; falls on `date + 1` when not after `start_time`
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub duration_hours: i16,
    /// Linked user (None for walk-in bookings)
    pub user_id: Option<i32>,
    /// User who issued the booking request
    pub created_by: i32,
    pub contact_name: Option<String>,
    pub contact_surname: Option<String>,
    pub contact_phone: Option<String>,
    #[schema(value_type = String)]
    pub price_per_hour: Decimal,
    #[schema(value_type = String)]
    pub monto_base: Decimal,
    #[schema(value_type = String)]
    pub monto_add_on: Decimal,
    #[schema(value_type = String)]
    pub monto_total: Decimal,
    pub add_on_requested: bool,
    #[sqlx(try_from = "String")]
    pub kind: ReservationKind,
    #[sqlx(try_from = "String")]
    pub estado: ReservationStatus,
    #[sqlx(try_from = "String")]
    pub estado_pago: PaymentStatus,
    #[sqlx(try_from = "String")]
    pub tariff_source: TariffSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Absolute time window occupied by this reservation
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_slot(self.date, self.start_time, self.duration_hours as i64)
    }

    /// Whether `user_id` owns this reservation (linked user or requester)
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.created_by == user_id || self.user_id == Some(user_id)
    }
}

/// Half-open `[start, end)` window in club-local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn from_slot(date: NaiveDate, start_time: NaiveTime, duration_hours: i64) -> Self {
        let start = date.and_time(start_time);
        Self {
            start,
            end: start + Duration::hours(duration_hours),
        }
    }

    /// Two windows overlap iff each starts before the other ends.
    /// Back-to-back windows do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Create reservation request, as received from callers
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    pub court_id: Option<i32>,
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Start time (HH:MM:SS or HH:MM)
    pub start_time: Option<String>,
    /// Whole hours, 1 to 8 (default 1)
    #[schema(value_type = Option<i64>)]
    pub duration_hours: Option<serde_json::Number>,
    /// Request the club add-on service (default false)
    pub add_on_requested: Option<bool>,
    /// "relacionada" (default) or "privada"
    pub kind: Option<String>,
    /// User the booking is for; defaults to the caller for "relacionada"
    pub linked_user_id: Option<i32>,
    #[validate(length(max = 100, message = "contact_name is too long"))]
    pub contact_name: Option<String>,
    #[validate(length(max = 100, message = "contact_surname is too long"))]
    pub contact_surname: Option<String>,
    #[validate(length(max = 30, message = "contact_phone is too long"))]
    pub contact_phone: Option<String>,
}

/// Contact details stored on a reservation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
}

/// Creation request after boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub court_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i16,
    pub add_on_requested: bool,
    pub kind: ReservationKind,
    pub linked_user_id: Option<i32>,
    pub contact: ContactInfo,
}

impl BookingRequest {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_slot(self.date, self.start_time, self.duration_hours as i64)
    }
}

/// Fully priced reservation ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub court_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_hours: i16,
    pub user_id: Option<i32>,
    pub created_by: i32,
    pub contact: ContactInfo,
    pub price_per_hour: Decimal,
    pub monto_base: Decimal,
    pub monto_add_on: Decimal,
    pub monto_total: Decimal,
    pub add_on_requested: bool,
    pub kind: ReservationKind,
    pub tariff_source: TariffSource,
}

impl NewReservation {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_slot(self.date, self.start_time, self.duration_hours as i64)
    }
}

/// Status update request; either field may be omitted
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateReservationStatus {
    /// New `estado`
    pub estado: Option<String>,
    /// New `estado_pago`
    pub estado_pago: Option<String>,
}

/// Query parameters for a conflict check
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ConflictQuery {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM:SS or HH:MM)
    pub start_time: String,
    /// Whole hours (default 1)
    pub duration_hours: Option<i64>,
}

/// Conflict check result
#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictResponse {
    pub court_id: i32,
    pub conflict: bool,
}
