//! Reservation summary (dashboard) types

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Counts and monetary sums over a set of reservations
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SummaryTotals {
    pub count: i64,
    /// Reservations in pendiente, confirmada or pagada
    pub active_count: i64,
    pub cancelled_count: i64,
    /// Sum of `monto_total`
    #[schema(value_type = String)]
    pub gross_amount: Decimal,
    /// Sum of `monto_base`
    #[schema(value_type = String)]
    pub base_amount: Decimal,
    /// Sum of `monto_add_on`
    #[schema(value_type = String)]
    pub add_on_amount: Decimal,
}

/// Summary of a single day
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Reservation count per `estado`
    pub per_status: BTreeMap<String, i64>,
    /// Reservation count per `estado_pago`
    pub per_payment_status: BTreeMap<String, i64>,
    pub totals: SummaryTotals,
}

/// Summary of an inclusive date range, folded from its days
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Summary {
    pub club_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub per_status: BTreeMap<String, i64>,
    pub per_payment_status: BTreeMap<String, i64>,
    pub totals: SummaryTotals,
    /// One entry per day in the range
    pub days: Vec<DaySummary>,
}

/// Query parameters for GET /clubs/{id}/summary
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    /// Single day (YYYY-MM-DD)
    pub date: Option<String>,
    /// Range start (YYYY-MM-DD), inclusive
    pub start_date: Option<String>,
    /// Range end (YYYY-MM-DD), inclusive
    pub end_date: Option<String>,
}

/// Query parameters for the weekly summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct WeeklySummaryQuery {
    /// Any day of the ISO week (YYYY-MM-DD)
    pub date: String,
}

/// Query parameters for the monthly summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthlySummaryQuery {
    pub year: i32,
    /// 1 to 12
    pub month: u32,
}
