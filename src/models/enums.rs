//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Reservation lifecycle status codes (stored in reservations.status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum ReservationStatus {
    /// Booked, not yet handed over
    Active = 0,
    /// Tool physically with the customer
    Delivered = 1,
    /// End date passed without the tool coming back
    Overdue = 2,
    /// Tool physically back in stock
    Returned = 3,
    /// Cancelled before delivery, never consumed stock
    Cancelled = 4,
    /// Historical, fully settled
    Completed = 5,
    /// Soft-deleted from operational views
    Archived = 6,
}

impl From<i16> for ReservationStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => ReservationStatus::Delivered,
            2 => ReservationStatus::Overdue,
            3 => ReservationStatus::Returned,
            4 => ReservationStatus::Cancelled,
            5 => ReservationStatus::Completed,
            6 => ReservationStatus::Archived,
            _ => ReservationStatus::Active,
        }
    }
}

impl From<ReservationStatus> for i16 {
    fn from(s: ReservationStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Delivered => "delivered",
            ReservationStatus::Overdue => "overdue",
            ReservationStatus::Returned => "returned",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Archived => "archived",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ToolCategory
// ---------------------------------------------------------------------------

/// Tool category codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum ToolCategory {
    PowerTool = 0,
    HandTool = 1,
    Garden = 2,
    Ladder = 3,
    Measuring = 4,
    Cleaning = 5,
    Other = 6,
}

impl From<i16> for ToolCategory {
    fn from(v: i16) -> Self {
        match v {
            0 => ToolCategory::PowerTool,
            1 => ToolCategory::HandTool,
            2 => ToolCategory::Garden,
            3 => ToolCategory::Ladder,
            4 => ToolCategory::Measuring,
            5 => ToolCategory::Cleaning,
            _ => ToolCategory::Other,
        }
    }
}

impl From<ToolCategory> for i16 {
    fn from(c: ToolCategory) -> Self {
        c as i16
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ToolCategory::PowerTool => "Power Tool",
            ToolCategory::HandTool => "Hand Tool",
            ToolCategory::Garden => "Garden",
            ToolCategory::Ladder => "Ladder",
            ToolCategory::Measuring => "Measuring",
            ToolCategory::Cleaning => "Cleaning",
            ToolCategory::Other => "Other",
        };
        write!(f, "{}", label)
    }
}
