//! Reservations repository for database operations.
//!
//! Admission (availability check + insert) runs inside a single transaction
//! holding a per-tool advisory lock, so two concurrent bookings for the same
//! tool cannot both observe sufficient availability and over-commit stock.

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    availability::{check_admission, AvailabilityReport, DateRange},
    error::{AppError, AppResult},
    models::{
        enums::ReservationStatus,
        reservation::{CreateReservation, Reservation, ReservationQuery, UpdateReservation},
        tool::Tool,
    },
};

/// Advisory lock namespace for per-tool admission serialization
const TOOL_LOCK_CLASS: i32 = 0x544F_4F4C;

/// Outcome of an all-or-nothing batch admission
pub struct BatchAdmissionOutcome {
    pub admitted: bool,
    /// One report per input line, in input order
    pub lines: Vec<AvailabilityReport>,
    /// Created reservations; empty when any line was rejected
    pub reservations: Vec<Reservation>,
}

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    /// List reservations with filters and pagination
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<(Vec<Reservation>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE ($1::int IS NULL OR tool_id = $1)
              AND ($2::smallint IS NULL OR status = $2)
            ORDER BY start_date DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.tool_id)
        .bind(query.status)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE ($1::int IS NULL OR tool_id = $1)
              AND ($2::smallint IS NULL OR status = $2)
            "#,
        )
        .bind(query.tool_id)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((reservations, total))
    }

    /// All reservations of one tool; the engine decides which ones block
    pub async fn list_for_tool(&self, tool_id: i32) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE tool_id = $1 ORDER BY start_date",
        )
        .bind(tool_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Superset of reservations that could block `date` (overdue blocking is
    /// open-ended past the stated end date, so only the start bound filters)
    pub async fn list_started_by(&self, date: NaiveDate) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE start_date <= $1 ORDER BY tool_id, start_date",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    async fn lock_tool(tx: &mut Transaction<'_, Postgres>, tool_id: i32) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(TOOL_LOCK_CLASS)
            .bind(tool_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn tool_in_tx(tx: &mut Transaction<'_, Postgres>, tool_id: i32) -> AppResult<Tool> {
        sqlx::query_as::<_, Tool>("SELECT * FROM tools WHERE id = $1")
            .bind(tool_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", tool_id)))
    }

    async fn reservations_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        tool_id: i32,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE tool_id = $1",
        )
        .bind(tool_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(reservations)
    }

    async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        data: &CreateReservation,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations
                (tool_id, customer_name, customer_email, start_date, end_date, quantity, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(data.tool_id)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.quantity)
        .bind(i16::from(ReservationStatus::Active))
        .bind(&data.notes)
        .fetch_one(&mut **tx)
        .await?;
        Ok(reservation)
    }

    /// Admission-checked create. Returns the created reservation when
    /// admitted, None with the rejection report otherwise; the check and the
    /// insert are one atomic unit under the tool's advisory lock.
    pub async fn create_admitted(
        &self,
        data: &CreateReservation,
        as_of: NaiveDate,
    ) -> AppResult<(Option<Reservation>, AvailabilityReport)> {
        let range = DateRange::new(data.start_date, data.end_date)?;

        let mut tx = self.pool.begin().await?;
        Self::lock_tool(&mut tx, data.tool_id).await?;

        let tool = Self::tool_in_tx(&mut tx, data.tool_id).await?;
        let reservations = Self::reservations_in_tx(&mut tx, data.tool_id).await?;

        let report = check_admission(
            &tool,
            &reservations,
            range,
            data.quantity.unwrap_or(1),
            data.held_quantity.unwrap_or(0),
            as_of,
        );

        if !report.available {
            tx.rollback().await?;
            return Ok((None, report));
        }

        let reservation = Self::insert_in_tx(&mut tx, data).await?;
        tx.commit().await?;

        Ok((Some(reservation), report))
    }

    /// Batch admission: every line is checked and, only if all pass, all are
    /// inserted in one transaction. Tool locks are taken in ascending ID
    /// order before any check.
    pub async fn create_batch_admitted(
        &self,
        lines: &[CreateReservation],
        as_of: NaiveDate,
    ) -> AppResult<BatchAdmissionOutcome> {
        for line in lines {
            DateRange::new(line.start_date, line.end_date)?;
        }

        let mut tx = self.pool.begin().await?;

        let mut tool_ids: Vec<i32> = lines.iter().map(|l| l.tool_id).collect();
        tool_ids.sort_unstable();
        tool_ids.dedup();
        for tool_id in &tool_ids {
            Self::lock_tool(&mut tx, *tool_id).await?;
        }

        let mut admitted = true;
        let mut reports = Vec::with_capacity(lines.len());
        let mut created = Vec::with_capacity(lines.len());

        for line in lines {
            let range = DateRange::new(line.start_date, line.end_date)?;
            let tool = Self::tool_in_tx(&mut tx, line.tool_id).await?;
            // Re-read inside the transaction so earlier lines of this batch
            // count against later ones for the same tool.
            let reservations = Self::reservations_in_tx(&mut tx, line.tool_id).await?;

            let report = check_admission(
                &tool,
                &reservations,
                range,
                line.quantity.unwrap_or(1),
                line.held_quantity.unwrap_or(0),
                as_of,
            );

            if report.available && admitted {
                created.push(Self::insert_in_tx(&mut tx, line).await?);
            } else if !report.available {
                admitted = false;
            }
            reports.push(report);
        }

        if admitted {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
            created.clear();
        }

        Ok(BatchAdmissionOutcome {
            admitted,
            lines: reports,
            reservations: created,
        })
    }

    /// Edit dates/quantity/contact. Date or quantity changes re-run admission
    /// with the reservation itself excluded from the blocker set.
    pub async fn update_admitted(
        &self,
        id: i32,
        data: &UpdateReservation,
        as_of: NaiveDate,
    ) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let tool_id: i32 = sqlx::query_scalar("SELECT tool_id FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?;

        Self::lock_tool(&mut tx, tool_id).await?;

        // Re-read under the lock so the admission check sees settled state
        let existing = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?;

        let start_date = data.start_date.unwrap_or(existing.start_date);
        let end_date = data.end_date.unwrap_or(existing.end_date);
        let quantity = data.quantity.or(existing.quantity);
        let range = DateRange::new(start_date, end_date)?;

        let still_blocking = matches!(
            existing.status(),
            ReservationStatus::Active | ReservationStatus::Delivered | ReservationStatus::Overdue
        );

        if still_blocking {
            let tool = Self::tool_in_tx(&mut tx, existing.tool_id).await?;
            let others: Vec<Reservation> = Self::reservations_in_tx(&mut tx, existing.tool_id)
                .await?
                .into_iter()
                .filter(|r| r.id != id)
                .collect();

            let report = check_admission(&tool, &others, range, quantity.unwrap_or(1), 0, as_of);
            if !report.available {
                tx.rollback().await?;
                return Err(AppError::BusinessRule(
                    report
                        .reason
                        .unwrap_or_else(|| "Insufficient stock for these dates".to_string()),
                ));
            }
        }

        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET customer_name = $2, customer_email = $3, start_date = $4,
                end_date = $5, quantity = $6, notes = $7, modif_date = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.customer_name.as_ref().or(existing.customer_name.as_ref()))
        .bind(data.customer_email.as_ref().or(existing.customer_email.as_ref()))
        .bind(start_date)
        .bind(end_date)
        .bind(quantity)
        .bind(data.notes.as_ref().or(existing.notes.as_ref()))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn set_status(
        &self,
        id: i32,
        status: ReservationStatus,
        previous_status: Option<i16>,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $2, previous_status = $3, modif_date = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(i16::from(status))
        .bind(previous_status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(reservation)
    }

    /// Hand the tool over to the customer
    pub async fn deliver(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.get_by_id(id).await?;
        if reservation.status() != ReservationStatus::Active {
            return Err(AppError::BusinessRule(format!(
                "Cannot deliver a {} reservation",
                reservation.status()
            )));
        }
        self.set_status(id, ReservationStatus::Delivered, None).await
    }

    /// Take the tool back in stock
    pub async fn return_tool(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.get_by_id(id).await?;
        match reservation.status() {
            ReservationStatus::Delivered | ReservationStatus::Overdue => {
                self.set_status(id, ReservationStatus::Returned, None).await
            }
            status => Err(AppError::BusinessRule(format!(
                "Cannot return a {} reservation",
                status
            ))),
        }
    }

    /// Cancel before delivery
    pub async fn cancel(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.get_by_id(id).await?;
        if reservation.status() != ReservationStatus::Active {
            return Err(AppError::BusinessRule(format!(
                "Cannot cancel a {} reservation",
                reservation.status()
            )));
        }
        self.set_status(id, ReservationStatus::Cancelled, None).await
    }

    /// Settle a returned reservation
    pub async fn complete(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.get_by_id(id).await?;
        if reservation.status() != ReservationStatus::Returned {
            return Err(AppError::BusinessRule(format!(
                "Cannot complete a {} reservation",
                reservation.status()
            )));
        }
        self.set_status(id, ReservationStatus::Completed, None).await
    }

    /// Soft-delete: hide from operational views, remember the prior status
    pub async fn archive(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.get_by_id(id).await?;
        if reservation.status() == ReservationStatus::Archived {
            return Err(AppError::BusinessRule("Reservation is already archived".to_string()));
        }
        self.set_status(id, ReservationStatus::Archived, Some(reservation.status))
            .await
    }

    /// Restore an archived reservation to its prior status
    pub async fn restore(&self, id: i32) -> AppResult<Reservation> {
        let reservation = self.get_by_id(id).await?;
        if reservation.status() != ReservationStatus::Archived {
            return Err(AppError::BusinessRule("Reservation is not archived".to_string()));
        }
        let previous = reservation
            .previous_status
            .map(ReservationStatus::from)
            .unwrap_or(ReservationStatus::Active);
        self.set_status(id, previous, None).await
    }

    /// Mark delivered reservations whose end date has passed as overdue.
    /// Returns the number of reservations flipped.
    pub async fn sweep_overdue(&self, as_of: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = $1, modif_date = $2
            WHERE status = $3 AND end_date < $4
            "#,
        )
        .bind(i16::from(ReservationStatus::Overdue))
        .bind(Utc::now())
        .bind(i16::from(ReservationStatus::Delivered))
        .bind(as_of)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Hard delete (admin)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reservation {} not found", id)));
        }
        Ok(())
    }

    /// Count reservations in a given status (for stats)
    pub async fn count_by_status(&self, status: ReservationStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = $1")
                .bind(i16::from(status))
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
