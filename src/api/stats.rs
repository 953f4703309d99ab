//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Tool fleet statistics
    pub tools: ToolStats,
    /// Reservation statistics
    pub reservations: ReservationStats,
}

#[derive(Serialize, ToSchema)]
pub struct ToolStats {
    /// Total number of tools in the catalog
    pub total: i64,
    /// Sum of stock over all tools
    pub total_stock: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ReservationStats {
    /// Booked, not yet handed over
    pub active: i64,
    /// Currently with customers
    pub delivered: i64,
    /// Past their end date, not back yet
    pub overdue: i64,
}

/// Fleet and reservation counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Current statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
