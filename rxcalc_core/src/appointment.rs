//! Appointment date arithmetic.
//!
//! Small helpers for the refill workflow: the regimen covers the days
//! between today and the next INR appointment.

use chrono::{Duration, NaiveDate};

/// The date `days` days after `start`. Negative values walk backwards,
/// matching the clinic sheet's +/- day buttons.
pub fn next_appointment(start: NaiveDate, days: i64) -> NaiveDate {
    start + Duration::days(days)
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_until(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
