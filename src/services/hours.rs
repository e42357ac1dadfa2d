//! Operating-hours checks

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    error::{AppError, AppResult},
    models::{OperatingHours, TimeWindow},
};

/// ISO weekday number: 1 = Monday ... 7 = Sunday
pub fn iso_weekday(date: NaiveDate) -> i16 {
    date.weekday().number_from_monday() as i16
}

/// Opening state of a club for one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHours {
    /// No hours row for that weekday
    NotConfigured,
    /// Row present but marked inactive
    Closed,
    Open { open: NaiveTime, close: NaiveTime },
}

impl DayHours {
    pub fn from_row(row: Option<&OperatingHours>) -> Self {
        match row {
            None => DayHours::NotConfigured,
            Some(h) if !h.active => DayHours::Closed,
            Some(h) => DayHours::Open {
                open: h.open_time,
                close: h.close_time,
            },
        }
    }

    /// Absolute opening interval on `date`. A close at or before the open
    /// time belongs to the following day.
    pub fn bounds_on(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let DayHours::Open { open, close } = *self else {
            return None;
        };
        let opens_at = date.and_time(open);
        let mut closes_at = date.and_time(close);
        if close <= open {
            closes_at += Duration::days(1);
        }
        Some((opens_at, closes_at))
    }

    /// Whether the whole window fits inside the opening interval of its start day
    pub fn admits(&self, window: &TimeWindow) -> bool {
        self.admits_on(window.start.date(), window)
    }

    /// Whether the whole window fits inside the opening interval that starts on `date`
    pub fn admits_on(&self, date: NaiveDate, window: &TimeWindow) -> bool {
        match self.bounds_on(date) {
            Some((opens_at, closes_at)) => opens_at <= window.start && window.end <= closes_at,
            None => false,
        }
    }
}

/// Reject windows the club's hours do not allow.
///
/// `today` holds the hours of the window's start day and `previous` those of
/// the day before, whose evening may run past midnight into the window.
pub fn ensure_open(today: DayHours, previous: DayHours, window: &TimeWindow) -> AppResult<()> {
    let day_before = window.start.date() - Duration::days(1);
    if previous.admits_on(day_before, window) {
        return Ok(());
    }
    match today {
        DayHours::NotConfigured | DayHours::Closed => Err(AppError::Validation(format!(
            "Club is closed on {}",
            window.start.date()
        ))),
        DayHours::Open { open, close } if !today.admits(window) => {
            Err(AppError::Validation(format!(
                "Requested window {}-{} is outside opening hours {}-{}",
                window.start.format("%H:%M"),
                window.end.format("%H:%M"),
                open.format("%H:%M"),
                close.format("%H:%M"),
            )))
        }
        DayHours::Open { .. } => Ok(()),
    }
}
