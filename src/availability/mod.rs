//! Availability and stock-overlap engine
//!
//! Pure, clock-free computations answering "how many units of a tool are
//! free for a date range" and "can a request be admitted", given the tool's
//! stock and its reservation list. All callers (creation, per-tool check,
//! batch creation, calendar grid) delegate here instead of re-deriving the
//! per-status blocking rules.

mod engine;

pub use engine::{
    any_unit_blocked, available_units, check_admission, reserved_units, units_available_on,
    AvailabilityReport, DateRange,
};
