//! Reservation (booking) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ReservationStatus;

/// Reservation record from database.
///
/// Dates are inclusive local calendar dates, no time component; the whole
/// system deliberately works in calendar days to avoid timezone drift.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub tool_id: i32,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// First rental day (inclusive)
    pub start_date: NaiveDate,
    /// Last rental day (inclusive)
    pub end_date: NaiveDate,
    /// Units held; absent means 1
    pub quantity: Option<i32>,
    /// Lifecycle status code (see ReservationStatus)
    pub status: i16,
    /// Status held before archiving, reinstated on restore
    pub previous_status: Option<i16>,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Decoded lifecycle status
    pub fn status(&self) -> ReservationStatus {
        self.status.into()
    }

    /// Units held by this reservation (default 1)
    pub fn units(&self) -> i32 {
        self.quantity.unwrap_or(1)
    }
}

/// Create reservation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    pub tool_id: i32,
    pub customer_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    /// First rental day (inclusive, YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Last rental day (inclusive, YYYY-MM-DD)
    pub end_date: NaiveDate,
    /// Units requested (default 1)
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    /// Units the same requester already holds in a pending cart for
    /// overlapping dates; subtracted from the pool at admission
    #[validate(range(min = 0, message = "Held quantity must not be negative"))]
    pub held_quantity: Option<i32>,
    pub notes: Option<String>,
}

/// Batch create request: all lines are admitted and written atomically
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchCreateReservations {
    #[validate(length(min = 1, message = "At least one reservation required"), nested)]
    pub reservations: Vec<CreateReservation>,
}

/// Update reservation request (dates and quantity re-run admission)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservation {
    pub customer_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

/// Reservation list query parameters
#[derive(Debug, Deserialize)]
pub struct ReservationQuery {
    pub tool_id: Option<i32>,
    pub status: Option<i16>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
