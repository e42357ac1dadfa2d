//! Overlap detection between a requested window and existing reservations

use chrono::{Duration, NaiveDate};

use crate::models::{Reservation, TimeWindow};

/// Dates whose reservations may intersect a window starting on `date`:
/// bookings on the previous day can run past midnight, and a late window
/// can reach into the next day.
pub fn candidate_dates(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    (date - Duration::days(1), date + Duration::days(1))
}

/// First active reservation overlapping `window`
pub fn find_conflict<'a>(existing: &'a [Reservation], window: &TimeWindow) -> Option<&'a Reservation> {
    existing
        .iter()
        .filter(|r| r.estado.is_active())
        .find(|r| r.window().overlaps(window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentStatus, ReservationKind, ReservationStatus, TariffSource};
    use chrono::{NaiveTime, Utc};
    use rust_decimal::Decimal;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn reservation(id: i32, date: NaiveDate, start: u32, hours: i16, estado: ReservationStatus) -> Reservation {
        let window = TimeWindow::from_slot(date, t(start), hours as i64);
        Reservation {
            id,
            court_id: 1,
            date,
            start_time: t(start),
            end_time: window.end.time(),
            duration_hours: hours,
            user_id: Some(3),
            created_by: 3,
            contact_name: None,
            contact_surname: None,
            contact_phone: None,
            price_per_hour: Decimal::from(1000),
            monto_base: Decimal::from(1000 * hours as i64),
            monto_add_on: Decimal::ZERO,
            monto_total: Decimal::from(1000 * hours as i64),
            add_on_requested: false,
            kind: ReservationKind::Relacionada,
            estado,
            estado_pago: PaymentStatus::PendientePago,
            tariff_source: TariffSource::CourtDay,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_active_reservations_block() {
        let existing = vec![
            reservation(1, day(10), 10, 2, ReservationStatus::Cancelada),
            reservation(2, day(10), 10, 2, ReservationStatus::Finalizada),
        ];
        let window = TimeWindow::from_slot(day(10), t(11), 1);
        assert!(find_conflict(&existing, &window).is_none());

        let existing = vec![reservation(3, day(10), 10, 2, ReservationStatus::Confirmada)];
        assert_eq!(find_conflict(&existing, &window).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_back_to_back_does_not_conflict() {
        let existing = vec![
            reservation(1, day(10), 8, 2, ReservationStatus::Pagada),
            reservation(2, day(10), 12, 1, ReservationStatus::Pendiente),
        ];
        let window = TimeWindow::from_slot(day(10), t(10), 2);
        assert!(find_conflict(&existing, &window).is_none());
    }

    #[test]
    fn test_previous_day_spill_over_conflicts() {
        let existing = vec![reservation(1, day(9), 23, 3, ReservationStatus::Pendiente)];
        let window = TimeWindow::from_slot(day(10), t(1), 1);
        assert_eq!(find_conflict(&existing, &window).map(|r| r.id), Some(1));

        let (from, to) = candidate_dates(day(10));
        assert_eq!(from, day(9));
        assert_eq!(to, day(11));
    }
}
