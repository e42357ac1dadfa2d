//! Reservation booking service

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        reservation::{
            ContactInfo, CreateReservationRequest, UpdateReservationStatus, MAX_DURATION_HOURS,
            MIN_DURATION_HOURS,
        },
        BookingRequest, CourtState, NewReservation, Reservation, ReservationKind, TimeWindow,
        UserClaims,
    },
    repository::BookingStore,
};

use super::{
    hours::{ensure_open, iso_weekday, DayHours},
    lifecycle::{self, StatusChange},
    tariff,
};

pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

pub fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM:SS)", field)))
}

pub fn parse_duration(value: Option<i64>) -> AppResult<i16> {
    let hours = value.unwrap_or(MIN_DURATION_HOURS);
    if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&hours) {
        return Err(AppError::Validation(format!(
            "duration_hours must be between {} and {}",
            MIN_DURATION_HOURS, MAX_DURATION_HOURS
        )));
    }
    Ok(hours as i16)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Turn a raw creation request into a `BookingRequest`.
///
/// Checks run in a fixed order and the first failure is returned: required
/// fields, duration, window not in the past, then kind-specific and contact
/// fields.
pub fn validate_request(
    requester: &UserClaims,
    request: &CreateReservationRequest,
    clock: &dyn Clock,
) -> AppResult<BookingRequest> {
    use validator::Validate;

    let (Some(court_id), Some(date), Some(start_time)) = (
        request.court_id,
        non_blank(&request.date),
        non_blank(&request.start_time),
    ) else {
        return Err(AppError::Validation(
            "court_id, date and start_time are required".to_string(),
        ));
    };

    let duration = match &request.duration_hours {
        None => None,
        Some(n) => Some(n.as_i64().ok_or_else(|| {
            AppError::Validation("duration_hours must be an integer".to_string())
        })?),
    };
    let duration_hours = parse_duration(duration)?;

    let date = parse_date(&date, "date")?;
    let start_time = parse_time(&start_time, "start_time")?;
    if date.and_time(start_time) < clock.now() {
        return Err(AppError::Validation(
            "Requested date and time are in the past".to_string(),
        ));
    }

    let kind = match request.kind.as_deref() {
        Some(kind) => kind.parse::<ReservationKind>()?,
        None => ReservationKind::default(),
    };

    let contact = ContactInfo {
        name: non_blank(&request.contact_name),
        surname: non_blank(&request.contact_surname),
        phone: non_blank(&request.contact_phone),
    };

    let linked_user_id = match kind {
        ReservationKind::Privada => {
            if contact.name.is_none() || contact.surname.is_none() {
                return Err(AppError::Validation(
                    "contact_name and contact_surname are required for private reservations"
                        .to_string(),
                ));
            }
            None
        }
        ReservationKind::Relacionada => {
            // A player booking for themselves; clubs must name the user
            let linked = request
                .linked_user_id
                .or_else(|| requester.club_id.is_none().then_some(requester.user_id));
            if linked.is_none() {
                return Err(AppError::Validation(
                    "linked_user_id is required for linked reservations".to_string(),
                ));
            }
            linked
        }
    };

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = BookingRequest {
        court_id,
        date,
        start_time,
        duration_hours,
        add_on_requested: request.add_on_requested.unwrap_or(false),
        kind,
        linked_user_id,
        contact,
    };

    Ok(booking)
}

#[derive(Clone)]
pub struct ReservationsService {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl ReservationsService {
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate, price and commit a new reservation
    #[tracing::instrument(skip(self, request), fields(user_id = requester.user_id))]
    pub async fn create_reservation(
        &self,
        requester: &UserClaims,
        request: CreateReservationRequest,
    ) -> AppResult<Reservation> {
        let booking = validate_request(requester, &request, self.clock.as_ref())?;
        let window = booking.window();

        let court = self.store.get_court(booking.court_id).await?;
        if court.state != CourtState::Available {
            return Err(AppError::Validation(format!(
                "Court {} is not available for booking",
                court.id
            )));
        }
        if let Some(club_id) = requester.club_id {
            if court.club_id != club_id {
                return Err(AppError::Authorization(format!(
                    "Court {} does not belong to club {}",
                    court.id, club_id
                )));
            }
        }

        let mut contact = booking.contact.clone();
        if let Some(user_id) = booking.linked_user_id {
            let profile = self.store.get_user_profile(user_id).await?;
            contact.name = contact.name.or(profile.firstname);
            contact.surname = contact.surname.or(profile.lastname);
            contact.phone = contact.phone.or(profile.phone);
        }

        let weekday = iso_weekday(booking.date);
        let hours = self.store.hours_for(court.club_id, weekday).await?;
        let today = DayHours::from_row(hours.as_ref());
        let previous = if today.admits(&window) {
            DayHours::NotConfigured
        } else {
            let day_before = iso_weekday(booking.date - Duration::days(1));
            let hours = self.store.hours_for(court.club_id, day_before).await?;
            DayHours::from_row(hours.as_ref())
        };
        ensure_open(today, previous, &window)?;

        if self.store.has_conflict(court.id, window).await? {
            return Err(AppError::Conflict(format!(
                "Court {} is already booked for the requested window",
                court.id
            )));
        }

        let club = self.store.get_club(court.club_id).await?;
        let rules = self.store.tariff_rules(club.id, weekday).await?;
        let price = tariff::resolve_price(&club, &court, &rules, &window)?;

        let monto_base = tariff::base_amount(price.price_per_hour, booking.duration_hours);
        let monto_add_on = tariff::add_on_amount(&club, booking.add_on_requested);

        let reservation = self
            .store
            .reserve_if_free(NewReservation {
                court_id: court.id,
                date: booking.date,
                start_time: booking.start_time,
                end_time: window.end.time(),
                duration_hours: booking.duration_hours,
                user_id: booking.linked_user_id,
                created_by: requester.user_id,
                contact,
                price_per_hour: tariff::round_money(price.price_per_hour),
                monto_base,
                monto_add_on,
                monto_total: tariff::round_money(monto_base + monto_add_on),
                add_on_requested: booking.add_on_requested,
                kind: booking.kind,
                tariff_source: price.source,
            })
            .await?;

        tracing::info!(
            reservation_id = reservation.id,
            court_id = reservation.court_id,
            total = %reservation.monto_total,
            source = price.source.as_str(),
            "Reservation created for {} {}",
            reservation.date,
            reservation.start_time
        );

        Ok(reservation)
    }

    /// Read a reservation visible to the requester
    pub async fn get_reservation(&self, requester: &UserClaims, id: i32) -> AppResult<Reservation> {
        let reservation = self.store.get_reservation(id).await?;
        if reservation.is_owned_by(requester.user_id) {
            return Ok(reservation);
        }
        let court = self.store.get_court(reservation.court_id).await?;
        requester.require_club(court.club_id)?;
        Ok(reservation)
    }

    /// Lock-free availability check for a window
    pub async fn has_conflict(
        &self,
        court_id: i32,
        date: &str,
        start_time: &str,
        duration_hours: Option<i64>,
    ) -> AppResult<bool> {
        let window = TimeWindow::from_slot(
            parse_date(date, "date")?,
            parse_time(start_time, "start_time")?,
            parse_duration(duration_hours)? as i64,
        );
        let court = self.store.get_court(court_id).await?;
        self.store.has_conflict(court.id, window).await
    }

    /// Cancel a reservation, freeing its slot
    #[tracing::instrument(skip(self), fields(user_id = requester.user_id))]
    pub async fn cancel_reservation(&self, requester: &UserClaims, id: i32) -> AppResult<Reservation> {
        let reservation = self.change_status(requester, id, StatusChange::cancel()).await?;
        tracing::info!(reservation_id = id, "Reservation cancelled");
        Ok(reservation)
    }

    /// Update `estado` and/or `estado_pago`
    #[tracing::instrument(skip(self, request), fields(user_id = requester.user_id))]
    pub async fn update_status(
        &self,
        requester: &UserClaims,
        id: i32,
        request: &UpdateReservationStatus,
    ) -> AppResult<Reservation> {
        let change = StatusChange::parse(request)?;
        self.change_status(requester, id, change).await
    }

    async fn change_status(
        &self,
        requester: &UserClaims,
        id: i32,
        change: StatusChange,
    ) -> AppResult<Reservation> {
        let reservation = self.store.get_reservation(id).await?;
        let court = self.store.get_court(reservation.court_id).await?;
        lifecycle::authorize(requester, &reservation, court.club_id, &change)?;

        let (estado, estado_pago) = lifecycle::apply(&reservation, &change, self.clock.now())?;
        self.store
            .update_status(id, reservation.estado, estado, estado_pago)
            .await
    }

    /// Administrative removal by the club owning the court
    #[tracing::instrument(skip(self), fields(user_id = requester.user_id))]
    pub async fn delete_reservation(&self, requester: &UserClaims, id: i32) -> AppResult<()> {
        let reservation = self.store.get_reservation(id).await?;
        let court = self.store.get_court(reservation.court_id).await?;
        requester.require_club(court.club_id)?;
        self.store.delete_reservation(id).await?;
        tracing::info!(reservation_id = id, court_id = court.id, "Reservation deleted");
        Ok(())
    }

    /// Move every elapsed active reservation to finalizada
    pub async fn finalize_elapsed(&self) -> AppResult<u64> {
        let count = self.store.finalize_elapsed(self.clock.now()).await?;
        if count > 0 {
            tracing::info!("Finalized {} elapsed reservations", count);
        }
        Ok(count)
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
