//! Appointment-period pill aggregation.
//!
//! Scales one week's pill usage to the appointment length and rolls the
//! result up into whole base tablets per family, always rounding up so the
//! patient never runs short before the refill.

use crate::distribute::DAYS_PER_WEEK;
use crate::types::{PeriodSummary, PillUsage};

/// Scale weekly per-denomination counts to `appointment_days`, rounding up
/// per denomination. `appointment_days == 0` means "one week equivalent":
/// the weekly counts pass through unscaled.
pub fn scale_for_period(weekly: &PillUsage, appointment_days: u32) -> PillUsage {
    let mut period = PillUsage::default();
    for (denomination, count) in weekly.iter() {
        let scaled = if appointment_days == 0 {
            count
        } else {
            let numerator = count as u64 * appointment_days as u64;
            let week = DAYS_PER_WEEK as u64;
            ((numerator + week - 1) / week) as u32
        };
        period.set(denomination, scaled);
    }
    period
}

/// Group period counts back into the three base tablet families. Each
/// family's total milligrams are divided by the base strength and rounded
/// up to a whole-tablet count.
pub fn summarize_families(period: &PillUsage) -> PeriodSummary {
    let mut quarters_by_family: std::collections::BTreeMap<crate::types::PillFamily, u32> =
        std::collections::BTreeMap::new();

    for (denomination, count) in period.iter() {
        let family = match denomination.family() {
            Some(family) => family,
            None => {
                tracing::warn!(
                    strength = %denomination,
                    "denomination outside the 2/3/5 mg families, skipping"
                );
                continue;
            }
        };
        *quarters_by_family.entry(family).or_insert(0) += denomination.quarter_mg() * count;
    }

    let mut summary = PeriodSummary::default();
    for (family, quarters) in quarters_by_family {
        let base = family.base_quarter_mg();
        summary.tablets.insert(family, (quarters + base - 1) / base);
    }
    summary
}
