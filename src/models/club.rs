//! Club, court, operating-hours and tariff models
//!
//! These rows are maintained by the club administration CRUD; the booking
//! engine only reads them.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::CourtState;

/// A club owning courts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Club {
    pub id: i32,
    pub name: String,
    /// Flat fee charged when the add-on (e.g. match recording) is requested
    #[schema(value_type = Option<String>)]
    pub add_on_price: Option<Decimal>,
    /// Start of the night pricing window
    #[schema(value_type = Option<String>)]
    pub night_start: Option<NaiveTime>,
    /// End of the night pricing window; may be earlier than `night_start`
    #[schema(value_type = Option<String>)]
    pub night_end: Option<NaiveTime>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A bookable court
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Court {
    pub id: i32,
    pub club_id: i32,
    pub name: String,
    /// Base price per hour outside the night window
    #[schema(value_type = Option<String>)]
    pub day_price: Option<Decimal>,
    /// Base price per hour inside the night window
    #[schema(value_type = Option<String>)]
    pub night_price: Option<Decimal>,
    #[sqlx(try_from = "String")]
    pub state: CourtState,
}

/// Opening hours of a club for one ISO weekday
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OperatingHours {
    pub club_id: i32,
    /// 1 = Monday ... 7 = Sunday
    pub weekday: i16,
    pub open_time: NaiveTime,
    /// At or before `open_time` when the club closes after midnight
    pub close_time: NaiveTime,
    pub active: bool,
}

/// Weekday/time-range price override
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TariffRule {
    pub id: i32,
    pub club_id: i32,
    /// 1 = Monday ... 7 = Sunday
    pub weekday: i16,
    pub from_time: NaiveTime,
    /// Exclusive end; at or before `from_time` when the rule runs past midnight
    pub to_time: NaiveTime,
    pub price_per_hour: Decimal,
}
