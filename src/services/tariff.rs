//! Tariff resolution
//!
//! Price per hour comes from the most specific tariff rule fully covering the
//! requested window, falling back to the court's day or night base price.

use chrono::{NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{AppError, AppResult},
    models::{Club, Court, TariffRule, TariffSource, TimeWindow},
};

use super::hours::iso_weekday;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Hourly price and the layer it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub price_per_hour: Decimal,
    pub source: TariffSource,
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Window as minutes from midnight of its start day; the end may exceed one day
fn window_minutes(window: &TimeWindow) -> (u32, u32) {
    let start = minute_of_day(window.start.time());
    let length = (window.end - window.start).num_minutes().max(0) as u32;
    (start, start + length)
}

/// Whether `rule` covers the window end to end (partial overlap is not enough)
pub fn rule_covers(rule: &TariffRule, window: &TimeWindow) -> bool {
    let (start, end) = window_minutes(window);
    let from = minute_of_day(rule.from_time);
    let mut to = minute_of_day(rule.to_time);
    if to <= from {
        to += MINUTES_PER_DAY;
    }
    from <= start && end <= to
}

/// Pick the applicable rule: latest `from_time` wins, then lowest id
pub fn select_rule<'a>(
    club_id: i32,
    rules: &'a [TariffRule],
    window: &TimeWindow,
) -> Option<&'a TariffRule> {
    let weekday = iso_weekday(window.start.date());
    rules
        .iter()
        .filter(|r| r.club_id == club_id && r.weekday == weekday && rule_covers(r, window))
        .min_by(|a, b| b.from_time.cmp(&a.from_time).then(a.id.cmp(&b.id)))
}

/// Whether `start` falls inside the club's night window, which may wrap midnight
pub fn is_night(club: &Club, start: NaiveTime) -> bool {
    let (Some(night_start), Some(night_end)) = (club.night_start, club.night_end) else {
        return false;
    };
    if night_start < night_end {
        night_start <= start && start < night_end
    } else if night_start > night_end {
        start >= night_start || start < night_end
    } else {
        false
    }
}

pub fn resolve_price(
    club: &Club,
    court: &Court,
    rules: &[TariffRule],
    window: &TimeWindow,
) -> AppResult<ResolvedPrice> {
    if let Some(rule) = select_rule(club.id, rules, window) {
        return Ok(ResolvedPrice {
            price_per_hour: rule.price_per_hour,
            source: TariffSource::Rule,
        });
    }

    let night = is_night(club, window.start.time());
    let resolved = match (night, court.night_price, court.day_price) {
        (true, Some(price), _) => Some((price, TariffSource::CourtNight)),
        (_, _, Some(price)) => Some((price, TariffSource::CourtDay)),
        _ => None,
    };

    resolved
        .map(|(price_per_hour, source)| ResolvedPrice {
            price_per_hour,
            source,
        })
        .ok_or_else(|| {
            AppError::NoPriceAvailable(format!(
                "No tariff rule or base price configured for court {}",
                court.id
            ))
        })
}

/// Round to cents (half away from zero), as persisted
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn base_amount(price_per_hour: Decimal, duration_hours: i16) -> Decimal {
    round_money(price_per_hour * Decimal::from(duration_hours))
}

/// Add-on fee: only when requested and priced by the club
pub fn add_on_amount(club: &Club, requested: bool) -> Decimal {
    match (requested, club.add_on_price) {
        (true, Some(price)) => round_money(price),
        _ => Decimal::ZERO,
    }
}
