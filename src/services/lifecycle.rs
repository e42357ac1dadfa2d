//! Reservation lifecycle rules
//!
//! `estado` moves forward through pendiente -> confirmada -> pagada; any active
//! reservation may be cancelled, or finalized once its window has ended.
//! cancelada and finalizada are terminal. `estado_pago` changes independently.

use chrono::NaiveDateTime;

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::UpdateReservationStatus, PaymentStatus, Reservation, ReservationStatus,
        UserClaims,
    },
};

/// A requested change of one or both status fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub estado: Option<ReservationStatus>,
    pub estado_pago: Option<PaymentStatus>,
}

impl StatusChange {
    pub fn cancel() -> Self {
        Self {
            estado: Some(ReservationStatus::Cancelada),
            estado_pago: None,
        }
    }

    pub fn parse(request: &UpdateReservationStatus) -> AppResult<Self> {
        let estado = request
            .estado
            .as_deref()
            .map(str::parse::<ReservationStatus>)
            .transpose()?;
        let estado_pago = request
            .estado_pago
            .as_deref()
            .map(str::parse::<PaymentStatus>)
            .transpose()?;

        if estado.is_none() && estado_pago.is_none() {
            return Err(AppError::Validation(
                "estado or estado_pago is required".to_string(),
            ));
        }
        Ok(Self { estado, estado_pago })
    }

    pub fn is_cancellation_only(&self) -> bool {
        self.estado == Some(ReservationStatus::Cancelada) && self.estado_pago.is_none()
    }
}

fn progress_rank(status: ReservationStatus) -> Option<u8> {
    match status {
        ReservationStatus::Pendiente => Some(0),
        ReservationStatus::Confirmada => Some(1),
        ReservationStatus::Pagada => Some(2),
        ReservationStatus::Cancelada | ReservationStatus::Finalizada => None,
    }
}

/// Validate a single `estado` transition
pub fn check_transition(
    from: ReservationStatus,
    to: ReservationStatus,
    window_end: NaiveDateTime,
    now: NaiveDateTime,
) -> AppResult<()> {
    if from == ReservationStatus::Cancelada && to == ReservationStatus::Cancelada {
        return Err(AppError::Validation("Reservation is already cancelled".to_string()));
    }
    if from.is_terminal() {
        return Err(AppError::Validation(format!(
            "Reservation is {} and can no longer change",
            from
        )));
    }
    if from == to {
        return Err(AppError::Validation(format!("Reservation is already {}", from)));
    }

    match to {
        ReservationStatus::Cancelada => Ok(()),
        ReservationStatus::Finalizada if now < window_end => Err(AppError::Validation(
            "Reservation cannot be finalized before its end time".to_string(),
        )),
        ReservationStatus::Finalizada => Ok(()),
        _ => match (progress_rank(from), progress_rank(to)) {
            (Some(a), Some(b)) if b > a => Ok(()),
            _ => Err(AppError::Validation(format!(
                "Cannot move reservation from {} to {}",
                from, to
            ))),
        },
    }
}

/// Only the club manager may change statuses; owners may also cancel
pub fn authorize(
    claims: &UserClaims,
    reservation: &Reservation,
    court_club_id: i32,
    change: &StatusChange,
) -> AppResult<()> {
    if claims.manages_club(court_club_id) {
        return Ok(());
    }
    if change.is_cancellation_only() && reservation.is_owned_by(claims.user_id) {
        return Ok(());
    }
    Err(AppError::Authorization(format!(
        "Not allowed to update reservation {}",
        reservation.id
    )))
}

/// Resulting (estado, estado_pago) after applying `change`
pub fn apply(
    reservation: &Reservation,
    change: &StatusChange,
    now: NaiveDateTime,
) -> AppResult<(ReservationStatus, PaymentStatus)> {
    let estado = match change.estado {
        Some(next) => {
            check_transition(reservation.estado, next, reservation.window().end, now)?;
            next
        }
        None => reservation.estado,
    };
    let estado_pago = change.estado_pago.unwrap_or(reservation.estado_pago);
    Ok((estado, estado_pago))
}
