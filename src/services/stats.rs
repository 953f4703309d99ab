//! Statistics service

use crate::{
    api::stats::{ReservationStats, StatsResponse, ToolStats},
    error::AppResult,
    models::enums::ReservationStatus,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Fleet and reservation counters for the admin dashboard
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let tools_total = self.repository.tools.count().await?;
        let total_stock = self.repository.tools.total_stock().await?;

        let active = self
            .repository
            .reservations
            .count_by_status(ReservationStatus::Active)
            .await?;
        let delivered = self
            .repository
            .reservations
            .count_by_status(ReservationStatus::Delivered)
            .await?;
        let overdue = self
            .repository
            .reservations
            .count_by_status(ReservationStatus::Overdue)
            .await?;

        Ok(StatsResponse {
            tools: ToolStats {
                total: tools_total,
                total_stock,
            },
            reservations: ReservationStats {
                active,
                delivered,
                overdue,
            },
        })
    }
}
