//! Reservation lifecycle service

use chrono::{Local, NaiveDate};
use validator::Validate;

use crate::{
    availability::AvailabilityReport,
    error::{AppError, AppResult},
    models::reservation::{
        BatchCreateReservations, CreateReservation, Reservation, ReservationQuery,
        UpdateReservation,
    },
    repository::{reservations::BatchAdmissionOutcome, Repository},
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// "Today" in the deployment's local calendar; overridable per request
    /// so behavior stays reproducible.
    fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
        as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// List reservations with filters and pagination
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<(Vec<Reservation>, i64)> {
        self.repository.reservations.list(query).await
    }

    /// Get a reservation by ID
    pub async fn get(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.get_by_id(id).await
    }

    /// Admission-checked create
    pub async fn create(
        &self,
        data: CreateReservation,
        as_of: Option<NaiveDate>,
    ) -> AppResult<(Option<Reservation>, AvailabilityReport)> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository
            .reservations
            .create_admitted(&data, Self::as_of_or_today(as_of))
            .await
    }

    /// All-or-nothing batch create
    pub async fn create_batch(
        &self,
        data: BatchCreateReservations,
        as_of: Option<NaiveDate>,
    ) -> AppResult<BatchAdmissionOutcome> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository
            .reservations
            .create_batch_admitted(&data.reservations, Self::as_of_or_today(as_of))
            .await
    }

    /// Edit a reservation; date/quantity changes re-run admission
    pub async fn update(
        &self,
        id: i32,
        data: UpdateReservation,
        as_of: Option<NaiveDate>,
    ) -> AppResult<Reservation> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository
            .reservations
            .update_admitted(id, &data, Self::as_of_or_today(as_of))
            .await
    }

    /// Hand the tool over to the customer
    pub async fn deliver(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.deliver(id).await
    }

    /// Take the tool back in stock
    pub async fn return_tool(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.return_tool(id).await
    }

    /// Cancel before delivery
    pub async fn cancel(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.cancel(id).await
    }

    /// Settle a returned reservation
    pub async fn complete(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.complete(id).await
    }

    /// Soft-delete
    pub async fn archive(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.archive(id).await
    }

    /// Undo a soft-delete
    pub async fn restore(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.restore(id).await
    }

    /// Flip delivered reservations past their end date to overdue
    pub async fn sweep_overdue(&self, as_of: Option<NaiveDate>) -> AppResult<u64> {
        self.repository
            .reservations
            .sweep_overdue(Self::as_of_or_today(as_of))
            .await
    }

    /// Hard delete (admin)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.reservations.delete(id).await
    }
}
