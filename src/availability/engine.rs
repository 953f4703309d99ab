//! Core overlap arithmetic.
//!
//! Blocking rule per status:
//!
//! - `Active` / `Delivered` block every day of `[start_date, end_date]`.
//! - `Overdue` blocks `[start_date, as_of]`: the tool is still out, so it
//!   keeps consuming stock through "today" even past its stated end date,
//!   but it must not reserve future dates indefinitely.
//! - `Returned`, `Cancelled`, `Completed` and `Archived` never block.
//!
//! The engine never reads the system clock; `as_of` is always threaded in
//! by the caller so behavior is reproducible in tests and consistent
//! within a single request.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{enums::ReservationStatus, reservation::Reservation, tool::Tool},
};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting inverted bounds before any engine call
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::Validation(format!(
                "End date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Single-day range
    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }
}

/// Availability decision returned to every caller
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityReport {
    /// Whether the request can be admitted
    pub available: bool,
    /// Free units over the range; negative when stock was reduced after
    /// over-booking (surfaced raw for admin display, clamped for admission)
    pub available_units: i32,
    /// Total units owned
    pub total_stock: i32,
    /// Units held by blocking reservations over the range
    pub reserved_units: i32,
    /// Rejection reason, None when admitted
    pub reason: Option<String>,
}

/// Days a reservation actually consumes stock, per its status.
/// None when the reservation never blocks.
fn effective_interval(
    reservation: &Reservation,
    as_of: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    match reservation.status() {
        ReservationStatus::Active | ReservationStatus::Delivered => {
            Some((reservation.start_date, reservation.end_date))
        }
        // Still out: blocks from its start through "today" only.
        ReservationStatus::Overdue => {
            if reservation.start_date <= as_of {
                Some((reservation.start_date, as_of))
            } else {
                None
            }
        }
        ReservationStatus::Returned
        | ReservationStatus::Cancelled
        | ReservationStatus::Completed
        | ReservationStatus::Archived => None,
    }
}

/// Sum of units held by reservations of this tool that block any day of `range`
pub fn reserved_units(
    tool: &Tool,
    reservations: &[Reservation],
    range: DateRange,
    as_of: NaiveDate,
) -> i32 {
    reservations
        .iter()
        .filter(|r| r.tool_id == tool.id)
        .filter_map(|r| effective_interval(r, as_of).map(|interval| (r, interval)))
        .filter(|(_, (eff_start, eff_end))| *eff_start <= range.end && *eff_end >= range.start)
        .map(|(r, _)| r.units())
        .sum()
}

/// Units of `tool` free over `range`. May be negative when historical
/// over-booking exceeds current stock.
pub fn available_units(
    tool: &Tool,
    reservations: &[Reservation],
    range: DateRange,
    as_of: NaiveDate,
) -> i32 {
    tool.stock - reserved_units(tool, reservations, range, as_of)
}

/// Admission decision for `requested_qty` units over `range`.
///
/// `already_held_qty` covers units the same requester holds in pending cart
/// lines for overlapping dates; they are subtracted from the pool so a
/// single client cannot double-count availability before checkout commits.
pub fn check_admission(
    tool: &Tool,
    reservations: &[Reservation],
    range: DateRange,
    requested_qty: i32,
    already_held_qty: i32,
    as_of: NaiveDate,
) -> AvailabilityReport {
    if !tool.is_available {
        return AvailabilityReport {
            available: false,
            available_units: 0,
            total_stock: tool.stock,
            reserved_units: 0,
            reason: Some("Tool is currently unavailable for maintenance".to_string()),
        };
    }

    let reserved = reserved_units(tool, reservations, range, as_of);
    let available = tool.stock - reserved;
    // Negative availability is diagnostic only; admission treats it as zero.
    let usable = available.max(0) - already_held_qty;
    let admit = usable >= requested_qty;

    AvailabilityReport {
        available: admit,
        available_units: available,
        total_stock: tool.stock,
        reserved_units: reserved,
        reason: if admit {
            None
        } else {
            Some(format!("Only {} available for these dates", usable.max(0)))
        },
    }
}

/// Single-day, quantity-aware availability (calendar grid)
pub fn units_available_on(
    tool: &Tool,
    reservations: &[Reservation],
    date: NaiveDate,
    as_of: NaiveDate,
) -> i32 {
    available_units(tool, reservations, DateRange::single(date), as_of)
}

/// Whether any blocking reservation covers `date`, regardless of quantity.
/// Coarser than [`units_available_on`]: a tool with stock 5 and one unit out
/// is blocked here but still has 4 units available there. Callers pick the
/// semantic they want; the calendar endpoints expose both.
pub fn any_unit_blocked(
    tool: &Tool,
    reservations: &[Reservation],
    date: NaiveDate,
    as_of: NaiveDate,
) -> bool {
    reservations
        .iter()
        .filter(|r| r.tool_id == tool.id)
        .filter_map(|r| effective_interval(r, as_of))
        .any(|(eff_start, eff_end)| eff_start <= date && eff_end >= date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tool(stock: i32) -> Tool {
        Tool {
            id: 1,
            name: "Angle grinder".to_string(),
            description: None,
            category: None,
            stock,
            is_available: true,
            notes: None,
            crea_date: None,
            modif_date: None,
        }
    }

    fn reservation(
        id: i32,
        status: ReservationStatus,
        start: NaiveDate,
        end: NaiveDate,
        quantity: Option<i32>,
    ) -> Reservation {
        Reservation {
            id,
            tool_id: 1,
            customer_name: None,
            customer_email: None,
            start_date: start,
            end_date: end,
            quantity,
            status: status.into(),
            previous_status: None,
            notes: None,
            crea_date: None,
            modif_date: None,
        }
    }

    #[test]
    fn test_active_blocks_its_window() {
        let t = tool(2);
        let rs = vec![reservation(
            1,
            ReservationStatus::Active,
            date(2025, 6, 1),
            date(2025, 6, 5),
            Some(1),
        )];
        let as_of = date(2025, 5, 28);

        let range = DateRange::new(date(2025, 6, 3), date(2025, 6, 7)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 1);

        // Range entirely after the window
        let range = DateRange::new(date(2025, 6, 6), date(2025, 6, 9)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 2);
    }

    #[test]
    fn test_overlap_bounds_are_inclusive() {
        let t = tool(1);
        let rs = vec![reservation(
            1,
            ReservationStatus::Delivered,
            date(2025, 6, 1),
            date(2025, 6, 5),
            None,
        )];
        let as_of = date(2025, 6, 1);

        // Range starting on the reservation's last day still collides
        let range = DateRange::new(date(2025, 6, 5), date(2025, 6, 8)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 0);

        // Range ending on the reservation's first day still collides
        let range = DateRange::new(date(2025, 5, 29), date(2025, 6, 1)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 0);
    }

    #[test]
    fn test_non_blocking_statuses_never_reduce_availability() {
        let t = tool(3);
        let as_of = date(2025, 6, 3);
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 10)).unwrap();

        let baseline = available_units(&t, &[], range, as_of);
        for status in [
            ReservationStatus::Returned,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
            ReservationStatus::Archived,
        ] {
            let rs = vec![reservation(1, status, date(2025, 6, 1), date(2025, 6, 10), Some(3))];
            assert_eq!(
                available_units(&t, &rs, range, as_of),
                baseline,
                "status {:?} must not block",
                status
            );
        }
    }

    #[test]
    fn test_overdue_caps_at_as_of() {
        let t = tool(2);
        let as_of = date(2025, 6, 3);
        // Overdue with an end date far in the future
        let rs = vec![reservation(
            1,
            ReservationStatus::Overdue,
            date(2025, 5, 20),
            date(2025, 12, 31),
            Some(1),
        )];

        // Range entirely after as_of: overdue must not reduce availability
        let range = DateRange::new(date(2025, 6, 4), date(2025, 6, 10)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 2);

        // Range touching as_of: it does
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 3)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 1);
    }

    #[test]
    fn test_overdue_blocks_past_its_end_date() {
        // End date already passed, tool still out: blocks through as_of
        let t = tool(1);
        let as_of = date(2025, 6, 10);
        let rs = vec![reservation(
            1,
            ReservationStatus::Overdue,
            date(2025, 5, 20),
            date(2025, 5, 25),
            None,
        )];

        let range = DateRange::new(date(2025, 6, 8), date(2025, 6, 10)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 0);

        let range = DateRange::new(date(2025, 6, 11), date(2025, 6, 15)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 1);
    }

    #[test]
    fn test_maintenance_short_circuit() {
        let mut t = tool(5);
        t.is_available = false;
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 2)).unwrap();

        let report = check_admission(&t, &[], range, 1, 0, date(2025, 6, 1));
        assert!(!report.available);
        assert_eq!(report.available_units, 0);
        assert!(report.reason.as_deref().unwrap().contains("maintenance"));
    }

    #[test]
    fn test_cart_double_count_prevention() {
        let t = tool(1);
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 2)).unwrap();

        // One unit free, but the requester already holds one in their cart
        let report = check_admission(&t, &[], range, 1, 1, date(2025, 6, 1));
        assert!(!report.available);
        assert_eq!(report.available_units, 1);
        assert_eq!(report.reason.as_deref(), Some("Only 0 available for these dates"));
    }

    #[test]
    fn test_overbooking_scenario() {
        // Stock 3; active qty 2 over 06-01..06-05; overdue qty 1 over
        // 05-20..06-10 with as_of 06-03.
        let t = tool(3);
        let as_of = date(2025, 6, 3);
        let rs = vec![
            reservation(1, ReservationStatus::Active, date(2025, 6, 1), date(2025, 6, 5), Some(2)),
            reservation(2, ReservationStatus::Overdue, date(2025, 5, 20), date(2025, 6, 10), Some(1)),
        ];

        // 06-01..06-03: both block, everything is out
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 3)).unwrap();
        assert_eq!(reserved_units(&t, &rs, range, as_of), 3);
        assert_eq!(available_units(&t, &rs, range, as_of), 0);
        assert!(!check_admission(&t, &rs, range, 1, 0, as_of).available);

        // 06-06..06-08: active ended 06-05, overdue capped at 06-03
        let range = DateRange::new(date(2025, 6, 6), date(2025, 6, 8)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 3);
        assert!(check_admission(&t, &rs, range, 3, 0, as_of).available);
        assert!(!check_admission(&t, &rs, range, 4, 0, as_of).available);
    }

    #[test]
    fn test_negative_availability_surfaced_but_clamped() {
        // Stock reduced to 1 after two units were already booked
        let t = tool(1);
        let as_of = date(2025, 6, 1);
        let rs = vec![reservation(
            1,
            ReservationStatus::Active,
            date(2025, 6, 1),
            date(2025, 6, 5),
            Some(2),
        )];
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 5)).unwrap();

        assert_eq!(available_units(&t, &rs, range, as_of), -1);

        let report = check_admission(&t, &rs, range, 1, 0, as_of);
        assert!(!report.available);
        assert_eq!(report.available_units, -1);
        assert_eq!(report.reason.as_deref(), Some("Only 0 available for these dates"));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let t = tool(2);
        let as_of = date(2025, 6, 1);
        let rs = vec![reservation(
            1,
            ReservationStatus::Active,
            date(2025, 6, 1),
            date(2025, 6, 5),
            None,
        )];
        let range = DateRange::new(date(2025, 6, 2), date(2025, 6, 3)).unwrap();
        assert_eq!(available_units(&t, &rs, range, as_of), 1);
    }

    #[test]
    fn test_other_tools_do_not_interfere() {
        let t = tool(1);
        let as_of = date(2025, 6, 1);
        let mut other = reservation(
            1,
            ReservationStatus::Active,
            date(2025, 6, 1),
            date(2025, 6, 5),
            Some(1),
        );
        other.tool_id = 99;
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 5)).unwrap();
        assert_eq!(available_units(&t, &[other], range, as_of), 1);
    }

    #[test]
    fn test_grid_boolean_vs_quantity_aware() {
        // Stock 5, one unit out: the coarse test says blocked, the
        // quantity-aware one still shows 4 free.
        let t = tool(5);
        let as_of = date(2025, 6, 2);
        let rs = vec![reservation(
            1,
            ReservationStatus::Delivered,
            date(2025, 6, 1),
            date(2025, 6, 5),
            Some(1),
        )];
        let day = date(2025, 6, 2);

        assert!(any_unit_blocked(&t, &rs, day, as_of));
        assert_eq!(units_available_on(&t, &rs, day, as_of), 4);
    }

    #[test]
    fn test_idempotent_over_identical_inputs() {
        let t = tool(3);
        let as_of = date(2025, 6, 3);
        let rs = vec![
            reservation(1, ReservationStatus::Active, date(2025, 6, 1), date(2025, 6, 5), Some(2)),
            reservation(2, ReservationStatus::Overdue, date(2025, 5, 20), date(2025, 6, 10), None),
        ];
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 3)).unwrap();

        let first = available_units(&t, &rs, range, as_of);
        let second = available_units(&t, &rs, range, as_of);
        assert_eq!(first, second);
        assert_eq!(rs.len(), 2);
    }

    #[test]
    fn test_sequential_admissions_never_exceed_stock() {
        // Admit one-unit requests until the engine refuses, then check no
        // single day holds more units than the tool owns.
        let t = tool(3);
        let as_of = date(2025, 6, 1);
        let requests = [
            (date(2025, 6, 1), date(2025, 6, 4)),
            (date(2025, 6, 2), date(2025, 6, 6)),
            (date(2025, 6, 3), date(2025, 6, 5)),
            (date(2025, 6, 4), date(2025, 6, 8)),
            (date(2025, 6, 1), date(2025, 6, 10)),
            (date(2025, 6, 7), date(2025, 6, 9)),
        ];

        let mut admitted: Vec<Reservation> = Vec::new();
        for (i, (start, end)) in requests.iter().enumerate() {
            let range = DateRange::new(*start, *end).unwrap();
            let report = check_admission(&t, &admitted, range, 1, 0, as_of);
            if report.available {
                admitted.push(reservation(
                    i as i32,
                    ReservationStatus::Active,
                    *start,
                    *end,
                    Some(1),
                ));
            }
        }

        for day in date(2025, 6, 1).iter_days().take_while(|d| *d <= date(2025, 6, 10)) {
            let held: i32 = admitted
                .iter()
                .filter(|r| r.start_date <= day && r.end_date >= day)
                .map(|r| r.units())
                .sum();
            assert!(held <= t.stock, "day {} holds {} units over stock {}", day, held, t.stock);
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(DateRange::new(date(2025, 6, 5), date(2025, 6, 1)).is_err());
        assert!(DateRange::new(date(2025, 6, 5), date(2025, 6, 5)).is_ok());
    }
}
