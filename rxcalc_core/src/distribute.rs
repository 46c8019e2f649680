//! Weekly dose distribution.
//!
//! Splits a weekly target dose into seven daily doses in 0.5 mg steps, as
//! evenly as possible. The sum is exact and no two days differ by more than
//! 0.5 mg.

use crate::{Error, Result};

pub const DAYS_PER_WEEK: usize = 7;

/// Split a weekly target into seven daily doses, returned in distribution
/// order (not weekday order) as half-milligram units.
///
/// The target is converted to half-units with round-to-nearest; each day
/// gets the integer share and the first `remainder` slots get one extra
/// half-unit. Which weekday ends up with an extra half-unit is decided
/// later by complexity sorting, so the slot order here carries no meaning.
pub fn distribute_weekly(target_mg: f64) -> Result<[u32; DAYS_PER_WEEK]> {
    if !target_mg.is_finite() || target_mg < 0.0 {
        return Err(Error::InvalidInput(format!(
            "weekly dose must be a non-negative number of mg, got {target_mg}"
        )));
    }

    let total_half_units = (target_mg * 2.0).round() as u32;
    let base = total_half_units / DAYS_PER_WEEK as u32;
    let remainder = (total_half_units % DAYS_PER_WEEK as u32) as usize;

    let mut days = [base; DAYS_PER_WEEK];
    for day in days.iter_mut().take(remainder) {
        *day += 1;
    }

    tracing::debug!(target_mg, total_half_units, "distributed weekly dose");
    Ok(days)
}

/// Convert half-milligram units back to milligrams.
pub fn half_units_to_mg(half_units: u32) -> f64 {
    half_units as f64 / 2.0
}
