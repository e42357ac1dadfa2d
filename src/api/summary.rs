//! Club dashboard summary endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::summary::{MonthlySummaryQuery, Summary, SummaryQuery, WeeklySummaryQuery},
};

use super::AuthenticatedUser;

/// Summary for a day or an inclusive date range
#[utoipa::path(
    get,
    path = "/clubs/{id}/summary",
    tag = "summary",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Club ID"),
        SummaryQuery
    ),
    responses(
        (status = 200, description = "Reservation summary", body = Summary),
        (status = 400, description = "Invalid or too long date range"),
        (status = 403, description = "Caller does not manage this club")
    )
)]
pub async fn get_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(club_id): Path<i32>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Summary>> {
    let summary = state.services.summary.summarize(&claims, club_id, &query).await?;
    Ok(Json(summary))
}

/// Summary of the ISO week (Monday to Sunday) containing a date
#[utoipa::path(
    get,
    path = "/clubs/{id}/summary/weekly",
    tag = "summary",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Club ID"),
        WeeklySummaryQuery
    ),
    responses(
        (status = 200, description = "Weekly summary", body = Summary),
        (status = 400, description = "Invalid date"),
        (status = 403, description = "Caller does not manage this club")
    )
)]
pub async fn get_weekly_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(club_id): Path<i32>,
    Query(query): Query<WeeklySummaryQuery>,
) -> AppResult<Json<Summary>> {
    let summary = state.services.summary.weekly(&claims, club_id, &query.date).await?;
    Ok(Json(summary))
}

/// Summary of a calendar month
#[utoipa::path(
    get,
    path = "/clubs/{id}/summary/monthly",
    tag = "summary",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Club ID"),
        MonthlySummaryQuery
    ),
    responses(
        (status = 200, description = "Monthly summary", body = Summary),
        (status = 400, description = "Invalid month"),
        (status = 403, description = "Caller does not manage this club")
    )
)]
pub async fn get_monthly_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(club_id): Path<i32>,
    Query(query): Query<MonthlySummaryQuery>,
) -> AppResult<Json<Summary>> {
    let summary = state
        .services
        .summary
        .monthly(&claims, club_id, query.year, query.month)
        .await?;
    Ok(Json(summary))
}
