//! Business logic services

pub mod availability;
pub mod reservations;
pub mod stats;
pub mod tools;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub tools: tools::ToolsService,
    pub reservations: reservations::ReservationsService,
    pub availability: availability::AvailabilityService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            tools: tools::ToolsService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            availability: availability::AvailabilityService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
