//! Tool (rental catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Tool record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tool {
    pub id: i32,
    /// Tool name / description
    pub name: String,
    pub description: Option<String>,
    /// Category (0=power tool, 1=hand tool, 2=garden, 3=ladder, 4=measuring, 5=cleaning, 6=other)
    pub category: Option<i16>,
    /// Total units owned; ceiling for all overlap calculations
    pub stock: i32,
    /// Maintenance flag; false takes the tool off the rental floor entirely
    pub is_available: bool,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create tool request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTool {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<i16>,
    /// Total units owned
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    pub is_available: Option<bool>,
    pub notes: Option<String>,
}

/// Update tool request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTool {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<i16>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i32>,
    pub is_available: Option<bool>,
    pub notes: Option<String>,
}

/// Tool list query parameters
#[derive(Debug, Deserialize)]
pub struct ToolQuery {
    pub name: Option<String>,
    pub category: Option<i16>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
