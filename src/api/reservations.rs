//! Reservation management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    availability::AvailabilityReport,
    error::AppResult,
    models::reservation::{
        BatchCreateReservations, CreateReservation, Reservation, ReservationQuery,
        UpdateReservation,
    },
};

use super::PaginatedResponse;

/// Reference-date override, threaded through for reproducible behavior
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    /// Reference "today" (default: current date)
    pub as_of: Option<NaiveDate>,
}

/// Admission outcome for a single reservation request. A rejection is a
/// normal, well-typed response, not a fault.
#[derive(Serialize, ToSchema)]
pub struct ReservationAdmissionResponse {
    /// Whether the reservation was admitted and written
    pub admitted: bool,
    /// The availability decision behind it
    pub availability: AvailabilityReport,
    /// The created reservation, when admitted
    pub reservation: Option<Reservation>,
}

/// Admission outcome for a batch request (all-or-nothing)
#[derive(Serialize, ToSchema)]
pub struct BatchAdmissionResponse {
    /// Whether every line was admitted and written
    pub admitted: bool,
    /// One availability decision per input line, in input order
    pub lines: Vec<AvailabilityReport>,
    /// Created reservations; empty when any line was rejected
    pub reservations: Vec<Reservation>,
}

/// Overdue sweep outcome
#[derive(Serialize, ToSchema)]
pub struct SweepOverdueResponse {
    /// Reservations flipped to overdue
    pub marked: u64,
}

/// List reservations
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    params(
        ("tool_id" = Option<i32>, Query, description = "Filter by tool"),
        ("status" = Option<i16>, Query, description = "Filter by status code"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of reservations", body = PaginatedResponse<Reservation>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<PaginatedResponse<Reservation>>> {
    let (items, total) = state.services.reservations.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get reservation details by ID
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation details", body = Reservation),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.get(id).await?;
    Ok(Json(reservation))
}

/// Create a reservation (admission-checked)
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = CreateReservation,
    params(
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    responses(
        (status = 201, description = "Reservation created", body = ReservationAdmissionResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Tool not found"),
        (status = 422, description = "Insufficient stock or tool under maintenance", body = ReservationAdmissionResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    Query(query): Query<AsOfQuery>,
    Json(data): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<ReservationAdmissionResponse>)> {
    let (reservation, availability) = state
        .services
        .reservations
        .create(data, query.as_of)
        .await?;

    let status = if reservation.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((
        status,
        Json(ReservationAdmissionResponse {
            admitted: reservation.is_some(),
            availability,
            reservation,
        }),
    ))
}

/// Create several reservations atomically
#[utoipa::path(
    post,
    path = "/reservations/batch",
    tag = "reservations",
    request_body = BatchCreateReservations,
    params(
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    responses(
        (status = 201, description = "All reservations created", body = BatchAdmissionResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Tool not found"),
        (status = 422, description = "At least one line rejected; nothing written", body = BatchAdmissionResponse)
    )
)]
pub async fn create_reservations_batch(
    State(state): State<crate::AppState>,
    Query(query): Query<AsOfQuery>,
    Json(data): Json<BatchCreateReservations>,
) -> AppResult<(StatusCode, Json<BatchAdmissionResponse>)> {
    let outcome = state
        .services
        .reservations
        .create_batch(data, query.as_of)
        .await?;

    let status = if outcome.admitted {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((
        status,
        Json(BatchAdmissionResponse {
            admitted: outcome.admitted,
            lines: outcome.lines,
            reservations: outcome.reservations,
        }),
    ))
}

/// Update a reservation (date/quantity changes re-run admission)
#[utoipa::path(
    put,
    path = "/reservations/{id}",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID"),
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated", body = Reservation),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Insufficient stock for the new dates")
    )
)]
pub async fn update_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AsOfQuery>,
    Json(data): Json<UpdateReservation>,
) -> AppResult<Json<Reservation>> {
    let updated = state
        .services
        .reservations
        .update(id, data, query.as_of)
        .await?;
    Ok(Json(updated))
}

/// Hand the tool over to the customer
#[utoipa::path(
    post,
    path = "/reservations/{id}/deliver",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation delivered", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Not in a deliverable state")
    )
)]
pub async fn deliver_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.deliver(id).await?;
    Ok(Json(reservation))
}

/// Take the tool back in stock
#[utoipa::path(
    post,
    path = "/reservations/{id}/return",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Tool returned", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Not in a returnable state")
    )
)]
pub async fn return_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.return_tool(id).await?;
    Ok(Json(reservation))
}

/// Cancel a reservation before delivery
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Not in a cancellable state")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.cancel(id).await?;
    Ok(Json(reservation))
}

/// Settle a returned reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/complete",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation completed", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Not in a completable state")
    )
)]
pub async fn complete_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.complete(id).await?;
    Ok(Json(reservation))
}

/// Archive (soft-delete) a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/archive",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation archived", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Already archived")
    )
)]
pub async fn archive_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.archive(id).await?;
    Ok(Json(reservation))
}

/// Restore an archived reservation to its prior status
#[utoipa::path(
    post,
    path = "/reservations/{id}/restore",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation restored", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Not archived")
    )
)]
pub async fn restore_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.restore(id).await?;
    Ok(Json(reservation))
}

/// Mark delivered reservations past their end date as overdue
#[utoipa::path(
    post,
    path = "/reservations/sweep-overdue",
    tag = "reservations",
    params(
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    responses(
        (status = 200, description = "Sweep complete", body = SweepOverdueResponse)
    )
)]
pub async fn sweep_overdue(
    State(state): State<crate::AppState>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<SweepOverdueResponse>> {
    let marked = state.services.reservations.sweep_overdue(query.as_of).await?;
    Ok(Json(SweepOverdueResponse { marked }))
}

/// Hard delete a reservation
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reservations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
