//! The availability rule set.
//!
//! Both call sites, the range scan behind `available-dates` and the
//! single-date check behind `validate-date`, go through the evaluators in
//! this module, so their verdicts cannot diverge for the same date. The
//! engine and validator take a caller-supplied `now` instant plus snapshots
//! of blackout entries and booked counts fetched once per call; nothing in
//! here reads a clock or performs I/O.

mod availability;
mod blackout;
mod capacity;
mod clock;
mod resolve;
mod validate;

pub use availability::{compute_availability, day_exclusion};
pub use blackout::is_blacked_out;
pub use capacity::CapacityLookup;
pub use clock::{add_calendar_days, days_between, is_weekend, local_date, minutes_since_midnight};
pub use resolve::ResolvedRules;
pub use validate::validate_date;
