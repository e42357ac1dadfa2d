//! Wall-clock abstraction
//!
//! Reservation dates and times are club-local wall-clock values, so the clock
//! hands out a `NaiveDateTime` in that zone rather than a UTC instant.

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

pub trait Clock: Send + Sync {
    /// Current club-local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system time, shifted to a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fixed_clock() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let clock = SystemClock::with_offset_minutes(100_000);
        assert_eq!(clock.offset, FixedOffset::east_opt(0).unwrap());
    }
}
