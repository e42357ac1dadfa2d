//! Reservation summary service (club dashboard)

use std::{collections::BTreeMap, sync::Arc};

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{
        summary::SummaryQuery, DaySummary, PaymentStatus, Reservation, ReservationStatus,
        Summary, SummaryTotals, UserClaims,
    },
    repository::BookingStore,
};

use super::reservations::parse_date;

fn empty_status_counts() -> BTreeMap<String, i64> {
    [
        ReservationStatus::Pendiente,
        ReservationStatus::Confirmada,
        ReservationStatus::Pagada,
        ReservationStatus::Cancelada,
        ReservationStatus::Finalizada,
    ]
    .iter()
    .map(|s| (s.as_str().to_string(), 0))
    .collect()
}

fn empty_payment_counts() -> BTreeMap<String, i64> {
    [
        PaymentStatus::PendientePago,
        PaymentStatus::Senado,
        PaymentStatus::Pagado,
        PaymentStatus::Cancelado,
    ]
    .iter()
    .map(|s| (s.as_str().to_string(), 0))
    .collect()
}

fn merge_counts(into: &mut BTreeMap<String, i64>, from: &BTreeMap<String, i64>) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}

impl SummaryTotals {
    fn add_reservation(&mut self, r: &Reservation) {
        self.count += 1;
        if r.estado.is_active() {
            self.active_count += 1;
        }
        if r.estado.is_cancelled() {
            self.cancelled_count += 1;
        }
        self.gross_amount += r.monto_total;
        self.base_amount += r.monto_base;
        self.add_on_amount += r.monto_add_on;
    }

    fn merge(&mut self, other: &SummaryTotals) {
        self.count += other.count;
        self.active_count += other.active_count;
        self.cancelled_count += other.cancelled_count;
        self.gross_amount += other.gross_amount;
        self.base_amount += other.base_amount;
        self.add_on_amount += other.add_on_amount;
    }
}

/// Summarize the reservations of a single day.
/// Rows dated on another day are ignored.
pub fn summarize_day<'a>(
    date: NaiveDate,
    rows: impl IntoIterator<Item = &'a Reservation>,
) -> DaySummary {
    let mut day = DaySummary {
        date,
        per_status: empty_status_counts(),
        per_payment_status: empty_payment_counts(),
        totals: SummaryTotals::default(),
    };
    for r in rows.into_iter().filter(|r| r.date == date) {
        *day.per_status.entry(r.estado.as_str().to_string()).or_insert(0) += 1;
        *day
            .per_payment_status
            .entry(r.estado_pago.as_str().to_string())
            .or_insert(0) += 1;
        day.totals.add_reservation(r);
    }
    day
}

/// Fold daily summaries into one range summary
pub fn fold_days(club_id: i32, start: NaiveDate, end: NaiveDate, days: Vec<DaySummary>) -> Summary {
    let mut summary = Summary {
        club_id,
        start_date: start,
        end_date: end,
        per_status: empty_status_counts(),
        per_payment_status: empty_payment_counts(),
        totals: SummaryTotals::default(),
        days: Vec::with_capacity(days.len()),
    };
    for day in days {
        merge_counts(&mut summary.per_status, &day.per_status);
        merge_counts(&mut summary.per_payment_status, &day.per_payment_status);
        summary.totals.merge(&day.totals);
        summary.days.push(day);
    }
    summary
}

/// Run the daily summarizer over `[start, end]` and fold the results
pub fn summarize_range(
    club_id: i32,
    start: NaiveDate,
    end: NaiveDate,
    rows: &[Reservation],
) -> Summary {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Reservation>> = BTreeMap::new();
    for r in rows {
        by_date.entry(r.date).or_default().push(r);
    }

    let days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| {
            let rows = by_date.get(&d).map(Vec::as_slice).unwrap_or(&[]);
            summarize_day(d, rows.iter().copied())
        })
        .collect();

    fold_days(club_id, start, end, days)
}

/// Monday and Sunday of the ISO week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::Validation(format!("Invalid month {}-{}", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((first, next - Duration::days(1)))
}

#[derive(Clone)]
pub struct SummaryService {
    store: Arc<dyn BookingStore>,
    max_days: i64,
}

impl SummaryService {
    pub fn new(store: Arc<dyn BookingStore>, max_days: i64) -> Self {
        Self { store, max_days }
    }

    fn check_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<()> {
        if end < start {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        let days = (end - start).num_days() + 1;
        if days > self.max_days {
            return Err(AppError::Validation(format!(
                "Summary range is limited to {} days",
                self.max_days
            )));
        }
        Ok(())
    }

    /// Summary for a single `date` or an inclusive `start_date..end_date` range
    pub async fn summarize(
        &self,
        requester: &UserClaims,
        club_id: i32,
        query: &SummaryQuery,
    ) -> AppResult<Summary> {
        let (start, end) = match (&query.date, &query.start_date, &query.end_date) {
            (Some(date), None, None) => {
                let date = parse_date(date, "date")?;
                (date, date)
            }
            (None, Some(start), Some(end)) => {
                (parse_date(start, "start_date")?, parse_date(end, "end_date")?)
            }
            _ => {
                return Err(AppError::Validation(
                    "Provide either date or both start_date and end_date".to_string(),
                ))
            }
        };
        self.summarize_between(requester, club_id, start, end).await
    }

    /// Summary of the ISO week containing `date`
    pub async fn weekly(&self, requester: &UserClaims, club_id: i32, date: &str) -> AppResult<Summary> {
        let (start, end) = week_bounds(parse_date(date, "date")?);
        self.summarize_between(requester, club_id, start, end).await
    }

    /// Summary of a calendar month
    pub async fn monthly(
        &self,
        requester: &UserClaims,
        club_id: i32,
        year: i32,
        month: u32,
    ) -> AppResult<Summary> {
        let (start, end) = month_bounds(year, month)?;
        self.summarize_between(requester, club_id, start, end).await
    }

    #[tracing::instrument(skip(self, requester), fields(user_id = requester.user_id))]
    async fn summarize_between(
        &self,
        requester: &UserClaims,
        club_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Summary> {
        requester.require_club(club_id)?;
        self.check_range(start, end)?;

        let rows = self.store.reservations_between(club_id, start, end).await?;
        tracing::debug!("Summarizing {} reservations", rows.len());
        Ok(summarize_range(club_id, start, end, &rows))
    }
}
