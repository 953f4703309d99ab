//! API handlers for ToolHire REST endpoints

pub mod availability;
pub mod health;
pub mod openapi;
pub mod reservations;
pub mod stats;
pub mod tools;

use serde::Serialize;
use utoipa::ToSchema;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}
