//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, health, reservations, stats, tools};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ToolHire API",
        version = "1.0.0",
        description = "Tool Rental Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "ToolHire Team", email = "contact@toolhire.dev")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Tools
        tools::list_tools,
        tools::get_tool,
        tools::create_tool,
        tools::update_tool,
        tools::delete_tool,
        // Availability
        availability::check_tool_availability,
        availability::tool_calendar,
        availability::date_grid,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::create_reservations_batch,
        reservations::update_reservation,
        reservations::deliver_reservation,
        reservations::return_reservation,
        reservations::cancel_reservation,
        reservations::complete_reservation,
        reservations::archive_reservation,
        reservations::restore_reservation,
        reservations::sweep_overdue,
        reservations::delete_reservation,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Tools
            crate::models::tool::Tool,
            crate::models::tool::CreateTool,
            crate::models::tool::UpdateTool,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::BatchCreateReservations,
            crate::models::reservation::UpdateReservation,
            crate::models::enums::ReservationStatus,
            crate::models::enums::ToolCategory,
            reservations::ReservationAdmissionResponse,
            reservations::BatchAdmissionResponse,
            reservations::SweepOverdueResponse,
            // Availability
            crate::availability::AvailabilityReport,
            availability::DayAvailability,
            availability::ToolDayAvailability,
            // Stats
            stats::StatsResponse,
            stats::ToolStats,
            stats::ReservationStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tools", description = "Tool catalog management"),
        (name = "availability", description = "Availability queries"),
        (name = "reservations", description = "Reservation management"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
