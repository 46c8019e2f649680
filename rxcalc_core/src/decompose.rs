//! Greedy pill decomposition.
//!
//! Finds a combination of available tablet strengths summing exactly to one
//! daily dose, taking the largest strength that still fits at every step.
//!
//! The greedy scan is a heuristic, not a complete solver: it can miss
//! combinations a backtracking search would find (1.0 mg from {0.75, 0.5}
//! fails even though 0.5 + 0.5 works). That is accepted behavior: the
//! denominations are whole/half/quarter splits of the base tablets, where
//! greedy does well, and the prioritizer and aggregator assume these exact
//! semantics, including the pill cap.

use crate::types::Denomination;

/// Hard cap on pills per day; a dose needing more is reported infeasible.
pub const MAX_PILLS_PER_DAY: usize = 10;

/// Decompose a daily dose (half-milligram units) into pills drawn from
/// `denominations`, which must be sorted descending.
///
/// Returns `None` when the dose cannot be formed exactly; it is never
/// silently approximated. A zero dose is always feasible with no pills.
pub fn decompose(
    dose_half_units: u32,
    denominations: &[Denomination],
) -> Option<Vec<Denomination>> {
    if dose_half_units == 0 {
        return Some(Vec::new());
    }
    if denominations.is_empty() {
        return None;
    }
    debug_assert!(
        denominations.windows(2).all(|w| w[0] >= w[1]),
        "denominations must be sorted descending"
    );

    // Quarter-mg units so half-tablet splits stay exact integers
    let mut remaining = dose_half_units * 2;
    let mut pills = Vec::new();

    for &denomination in denominations {
        let quarters = denomination.quarter_mg();
        while remaining >= quarters && pills.len() < MAX_PILLS_PER_DAY {
            remaining -= quarters;
            pills.push(denomination);
        }
        if remaining == 0 {
            break;
        }
    }

    if remaining > 0 {
        None
    } else {
        Some(pills)
    }
}

/// Convenience wrapper taking a milligram dose, absorbing floating-point
/// error within the usual tolerance. Doses that are not multiples of
/// 0.5 mg (or are negative) cannot be formed.
pub fn decompose_mg(dose_mg: f64, denominations: &[Denomination]) -> Option<Vec<Denomination>> {
    if !dose_mg.is_finite() || dose_mg < 0.0 {
        return None;
    }
    let half_units = (dose_mg * 2.0).round();
    if (dose_mg * 2.0 - half_units).abs() > crate::types::MG_TOLERANCE * 2.0 {
        return None;
    }
    decompose(half_units as u32, denominations)
}
