//! Availability query endpoints.
//!
//! Thin wrappers over the availability engine: the per-tool range check,
//! the per-tool calendar, and the all-tools single-day grid. Grid entries
//! expose both the quantity-aware unit count and the coarser any-overlap
//! flag so callers pick their semantic explicitly.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{availability::AvailabilityReport, error::AppResult};

/// Per-tool availability check parameters
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// First rental day (inclusive, YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Last rental day (inclusive, YYYY-MM-DD)
    pub end_date: NaiveDate,
    /// Units requested (default 1)
    pub quantity: Option<i32>,
    /// Units already held in a pending cart for overlapping dates
    pub held_quantity: Option<i32>,
    /// Reference "today" (default: current date)
    pub as_of: Option<NaiveDate>,
}

/// Per-tool calendar parameters
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub as_of: Option<NaiveDate>,
}

/// Single-day grid parameters
#[derive(Debug, Deserialize)]
pub struct DateGridQuery {
    pub as_of: Option<NaiveDate>,
}

/// One day of a tool's calendar
#[derive(Debug, Serialize, ToSchema)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Free units that day; negative when historically over-booked
    pub units_available: i32,
    /// True when any blocking reservation covers the day
    pub any_unit_blocked: bool,
}

/// One tool's availability on the grid date
#[derive(Debug, Serialize, ToSchema)]
pub struct ToolDayAvailability {
    pub tool_id: i32,
    pub name: String,
    pub total_stock: i32,
    pub units_available: i32,
    pub any_unit_blocked: bool,
}

/// Check whether a tool can be rented over a date range
#[utoipa::path(
    get,
    path = "/tools/{id}/availability",
    tag = "availability",
    params(
        ("id" = i32, Path, description = "Tool ID"),
        ("start_date" = String, Query, description = "First rental day (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Last rental day (YYYY-MM-DD)"),
        ("quantity" = Option<i32>, Query, description = "Units requested (default: 1)"),
        ("held_quantity" = Option<i32>, Query, description = "Units already held in a pending cart"),
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    responses(
        (status = 200, description = "Availability decision", body = AvailabilityReport),
        (status = 400, description = "Invalid date range or quantity"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn check_tool_availability(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityReport>> {
    let report = state
        .services
        .availability
        .check_tool(
            id,
            query.start_date,
            query.end_date,
            query.quantity,
            query.held_quantity,
            query.as_of,
        )
        .await?;
    Ok(Json(report))
}

/// Per-day availability for one tool over a range
#[utoipa::path(
    get,
    path = "/tools/{id}/calendar",
    tag = "availability",
    params(
        ("id" = i32, Path, description = "Tool ID"),
        ("start_date" = String, Query, description = "First day (YYYY-MM-DD)"),
        ("end_date" = String, Query, description = "Last day (YYYY-MM-DD)"),
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    responses(
        (status = 200, description = "Per-day availability", body = Vec<DayAvailability>),
        (status = 400, description = "Invalid or oversized date range"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn tool_calendar(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<Vec<DayAvailability>>> {
    let calendar = state
        .services
        .availability
        .tool_calendar(id, query.start_date, query.end_date, query.as_of)
        .await?;
    Ok(Json(calendar))
}

/// Single-day availability across every tool
#[utoipa::path(
    get,
    path = "/availability/date/{date}",
    tag = "availability",
    params(
        ("date" = String, Path, description = "Grid date (YYYY-MM-DD)"),
        ("as_of" = Option<String>, Query, description = "Reference date (default: today)")
    ),
    responses(
        (status = 200, description = "Per-tool availability for the date", body = Vec<ToolDayAvailability>)
    )
)]
pub async fn date_grid(
    State(state): State<crate::AppState>,
    Path(date): Path<NaiveDate>,
    Query(query): Query<DateGridQuery>,
) -> AppResult<Json<Vec<ToolDayAvailability>>> {
    let grid = state.services.availability.date_grid(date, query.as_of).await?;
    Ok(Json(grid))
}
