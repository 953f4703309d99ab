//! Availability query service.
//!
//! Read-only paths over the availability engine: per-tool admission checks,
//! the all-tools single-day grid, and the per-tool calendar. The write path
//! (create with admission) lives in the reservations repository where the
//! check and the insert share one transaction.

use chrono::{Local, NaiveDate};

use crate::{
    api::availability::{DayAvailability, ToolDayAvailability},
    availability::{any_unit_blocked, check_admission, units_available_on, AvailabilityReport, DateRange},
    error::{AppError, AppResult},
    repository::Repository,
};

/// Cap on per-tool calendar queries, one leap year
const MAX_CALENDAR_DAYS: i64 = 366;

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
        as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Per-tool availability check for a date range
    pub async fn check_tool(
        &self,
        tool_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        quantity: Option<i32>,
        held_quantity: Option<i32>,
        as_of: Option<NaiveDate>,
    ) -> AppResult<AvailabilityReport> {
        let range = DateRange::new(start_date, end_date)?;
        let quantity = quantity.unwrap_or(1);
        let held_quantity = held_quantity.unwrap_or(0);
        if quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".to_string()));
        }
        if held_quantity < 0 {
            return Err(AppError::Validation("Held quantity must not be negative".to_string()));
        }

        let tool = self.repository.tools.get_by_id(tool_id).await?;
        let reservations = self.repository.reservations.list_for_tool(tool_id).await?;

        Ok(check_admission(
            &tool,
            &reservations,
            range,
            quantity,
            held_quantity,
            Self::as_of_or_today(as_of),
        ))
    }

    /// Single-day availability across every tool. Each entry carries both
    /// the quantity-aware count and the coarser any-overlap flag.
    pub async fn date_grid(
        &self,
        date: NaiveDate,
        as_of: Option<NaiveDate>,
    ) -> AppResult<Vec<ToolDayAvailability>> {
        let as_of = Self::as_of_or_today(as_of);
        let tools = self.repository.tools.list_all().await?;
        let reservations = self.repository.reservations.list_started_by(date).await?;

        let grid = tools
            .into_iter()
            .map(|tool| {
                if !tool.is_available {
                    return ToolDayAvailability {
                        tool_id: tool.id,
                        name: tool.name,
                        total_stock: tool.stock,
                        units_available: 0,
                        any_unit_blocked: true,
                    };
                }
                let units = units_available_on(&tool, &reservations, date, as_of);
                let blocked = any_unit_blocked(&tool, &reservations, date, as_of);
                ToolDayAvailability {
                    tool_id: tool.id,
                    name: tool.name,
                    total_stock: tool.stock,
                    units_available: units,
                    any_unit_blocked: blocked,
                }
            })
            .collect();

        Ok(grid)
    }

    /// Per-day availability for one tool over a range
    pub async fn tool_calendar(
        &self,
        tool_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        as_of: Option<NaiveDate>,
    ) -> AppResult<Vec<DayAvailability>> {
        let range = DateRange::new(start_date, end_date)?;
        let days = (range.end - range.start).num_days() + 1;
        if days > MAX_CALENDAR_DAYS {
            return Err(AppError::Validation(format!(
                "Calendar range is limited to {} days",
                MAX_CALENDAR_DAYS
            )));
        }

        let as_of = Self::as_of_or_today(as_of);
        let tool = self.repository.tools.get_by_id(tool_id).await?;
        let reservations = self.repository.reservations.list_for_tool(tool_id).await?;

        let calendar = range
            .start
            .iter_days()
            .take_while(|d| *d <= range.end)
            .map(|date| {
                if !tool.is_available {
                    return DayAvailability {
                        date,
                        units_available: 0,
                        any_unit_blocked: true,
                    };
                }
                DayAvailability {
                    date,
                    units_available: units_available_on(&tool, &reservations, date, as_of),
                    any_unit_blocked: any_unit_blocked(&tool, &reservations, date, as_of),
                }
            })
            .collect();

        Ok(calendar)
    }
}
