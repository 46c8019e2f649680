//! Warfarin dose titration.
//!
//! INR follow-up visits adjust the weekly dose either to an explicit new
//! target or by a percentage step (±5, ±10, ±15 % buttons on the clinic
//! sheet). Targets are kept on the 0.5 mg grid the regimen planner expects.

use crate::config::DosingConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Round a milligram value to the nearest 0.5.
pub fn round_to_half(mg: f64) -> f64 {
    (mg * 2.0).round() / 2.0
}

/// Direction of a dose change.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoseDirection {
    Increase,
    Decrease,
    Unchanged,
}

/// A computed change between the current and target weekly dose.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseChange {
    pub current_mg: f64,
    pub target_mg: f64,
    /// Target snapped to the 0.5 mg grid; feed this to the planner.
    pub rounded_target_mg: f64,
    pub change_mg: f64,
    pub percent_change: f64,
    pub direction: DoseDirection,
}

impl DoseChange {
    /// Compare a target weekly dose against the current one.
    pub fn compute(current_mg: f64, target_mg: f64) -> Result<DoseChange> {
        if !current_mg.is_finite() || current_mg <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "current weekly dose must be positive, got {current_mg}"
            )));
        }
        if !target_mg.is_finite() || target_mg < 0.0 {
            return Err(Error::InvalidInput(format!(
                "target weekly dose must be non-negative, got {target_mg}"
            )));
        }

        let change_mg = target_mg - current_mg;
        let percent_change = change_mg / current_mg * 100.0;
        let direction = if change_mg > 0.0 {
            DoseDirection::Increase
        } else if change_mg < 0.0 {
            DoseDirection::Decrease
        } else {
            DoseDirection::Unchanged
        };

        Ok(DoseChange {
            current_mg,
            target_mg,
            rounded_target_mg: round_to_half(target_mg),
            change_mg,
            percent_change,
            direction,
        })
    }
}

/// Apply a percentage step to the current weekly dose, snap to the 0.5 mg
/// grid, and clamp into the configured dose range (ties on the grid round
/// half-up, matching the clinic sheet).
pub fn adjust_by_percent(
    current_mg: f64,
    percent: f64,
    limits: &DosingConfig,
) -> Result<f64> {
    if !current_mg.is_finite() || current_mg <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "current weekly dose must be positive, got {current_mg}"
        )));
    }
    if !percent.is_finite() {
        return Err(Error::InvalidInput("percentage must be a number".into()));
    }

    let raw = current_mg * (1.0 + percent / 100.0);
    let snapped = round_to_half(raw.max(0.0));
    let clamped = snapped.clamp(limits.min_weekly_mg, limits.max_weekly_mg);

    if clamped != snapped {
        tracing::info!(
            snapped,
            clamped,
            "adjusted dose clamped into the configured range"
        );
    }
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> DosingConfig {
        DosingConfig::default()
    }

    #[test]
    fn test_round_to_half() {
        assert_eq!(round_to_half(11.2), 11.0);
        assert_eq!(round_to_half(11.3), 11.5);
        assert_eq!(round_to_half(11.25), 11.5); // half-up
        assert_eq!(round_to_half(11.5), 11.5);
    }

    #[test]
    fn test_change_directions() {
        let up = DoseChange::compute(11.0, 11.5).unwrap();
        assert_eq!(up.direction, DoseDirection::Increase);
        assert!((up.percent_change - 4.545454545454546).abs() < 1e-9);

        let down = DoseChange::compute(20.0, 18.0).unwrap();
        assert_eq!(down.direction, DoseDirection::Decrease);
        assert_eq!(down.percent_change, -10.0);

        let flat = DoseChange::compute(14.0, 14.0).unwrap();
        assert_eq!(flat.direction, DoseDirection::Unchanged);
        assert_eq!(flat.percent_change, 0.0);
    }

    #[test]
    fn test_rounded_target_snaps_to_grid() {
        let change = DoseChange::compute(11.0, 11.7).unwrap();
        assert_eq!(change.rounded_target_mg, 11.5);
    }

    #[test]
    fn test_adjust_by_percent() {
        // +10 % of 21.0 = 23.1 → 23.0
        assert_eq!(adjust_by_percent(21.0, 10.0, &limits()).unwrap(), 23.0);
        // -15 % of 21.0 = 17.85 → 18.0
        assert_eq!(adjust_by_percent(21.0, -15.0, &limits()).unwrap(), 18.0);
        // 0 % is a no-op on the grid
        assert_eq!(adjust_by_percent(21.0, 0.0, &limits()).unwrap(), 21.0);
    }

    #[test]
    fn test_adjust_clamps_to_dose_range() {
        // Default range is 3.0..=100.0 mg/week
        assert_eq!(adjust_by_percent(3.5, -50.0, &limits()).unwrap(), 3.0);
        assert_eq!(adjust_by_percent(95.0, 20.0, &limits()).unwrap(), 100.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(DoseChange::compute(0.0, 10.0).is_err());
        assert!(DoseChange::compute(-5.0, 10.0).is_err());
        assert!(DoseChange::compute(10.0, f64::NAN).is_err());
        assert!(adjust_by_percent(0.0, 10.0, &limits()).is_err());
        assert!(adjust_by_percent(10.0, f64::NAN, &limits()).is_err());
    }
}
