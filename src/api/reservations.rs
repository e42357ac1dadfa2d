//! Reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reservation::{
        ConflictQuery, ConflictResponse, CreateReservationRequest, Reservation,
        UpdateReservationStatus,
    },
};

use super::AuthenticatedUser;

/// Book a court
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Invalid request, past date or club closed"),
        (status = 403, description = "Court belongs to another club"),
        (status = 404, description = "Court or linked user not found"),
        (status = 409, description = "Court already booked for the window"),
        (status = 422, description = "No price configured for the window")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state
        .services
        .reservations
        .create_reservation(&claims, request)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Get reservation by ID
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation details", body = Reservation),
        (status = 403, description = "Not the owner or the club"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.get_reservation(&claims, id).await?;
    Ok(Json(reservation))
}

/// Cancel a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 400, description = "Already cancelled or finalized"),
        (status = 403, description = "Not the owner or the club"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Status changed concurrently")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state
        .services
        .reservations
        .cancel_reservation(&claims, id)
        .await?;
    Ok(Json(reservation))
}

/// Update reservation and payment status
#[utoipa::path(
    patch,
    path = "/reservations/{id}/status",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservationStatus,
    responses(
        (status = 200, description = "Status updated", body = Reservation),
        (status = 400, description = "Invalid status or transition"),
        (status = 403, description = "Not allowed to change this reservation"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Status changed concurrently")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateReservationStatus>,
) -> AppResult<Json<Reservation>> {
    let reservation = state
        .services
        .reservations
        .update_status(&claims, id, &request)
        .await?;
    Ok(Json(reservation))
}

/// Delete a reservation (club only)
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 403, description = "Court belongs to another club"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reservations.delete_reservation(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a window on a court is already booked
#[utoipa::path(
    get,
    path = "/courts/{id}/conflicts",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Court ID"),
        ConflictQuery
    ),
    responses(
        (status = 200, description = "Conflict check result", body = ConflictResponse),
        (status = 400, description = "Invalid date, time or duration"),
        (status = 404, description = "Court not found")
    )
)]
pub async fn check_conflict(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(court_id): Path<i32>,
    Query(query): Query<ConflictQuery>,
) -> AppResult<Json<ConflictResponse>> {
    let conflict = state
        .services
        .reservations
        .has_conflict(court_id, &query.date, &query.start_time, query.duration_hours)
        .await?;
    Ok(Json(ConflictResponse { court_id, conflict }))
}
