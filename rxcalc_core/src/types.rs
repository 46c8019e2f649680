//! Core domain types for the rxcalc clinical dosing toolkit.
//!
//! This module defines the fundamental types used throughout the system:
//! - Weekdays and the weekly regimen layout
//! - Tablet families and denominations (fixed-point quarter-milligram units)
//! - Pill selections, daily assignments and usage/summary maps
//!
//! All dose arithmetic is done in integer quarter- or half-milligram units.
//! Floating-point milligram values only appear at API boundaries and are
//! absorbed with a small tolerance when converting in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tolerance used when converting floating-point milligram inputs into
/// fixed-point units.
pub const MG_TOLERANCE: f64 = 1e-3;

// ============================================================================
// Weekdays
// ============================================================================

/// Day of the week, Monday-first (matches the printed pill organizer).
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven weekdays in Monday-first presentation order.
    pub const WEEK: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Tablet families and denominations
// ============================================================================

/// Base tablet family. Each family's denominations are mutually exclusive
/// splits (whole/half/quarter) of the same physical tablet and are stocked
/// as a group.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum PillFamily {
    Base2,
    Base3,
    Base5,
}

impl PillFamily {
    pub const ALL: [PillFamily; 3] = [PillFamily::Base2, PillFamily::Base3, PillFamily::Base5];

    /// Strength of the whole base tablet in quarter-milligram units.
    pub fn base_quarter_mg(&self) -> u32 {
        match self {
            PillFamily::Base2 => 8,
            PillFamily::Base3 => 12,
            PillFamily::Base5 => 20,
        }
    }

    pub fn base_mg(&self) -> f64 {
        self.base_quarter_mg() as f64 / 4.0
    }

    /// The whole base tablet as a denomination.
    pub fn base(&self) -> Denomination {
        Denomination::from_quarter_mg(self.base_quarter_mg())
    }

    /// Denominations obtainable from this family, largest first
    /// (whole, half, quarter tablet).
    pub fn denominations(&self) -> [Denomination; 3] {
        let base = self.base_quarter_mg();
        [
            Denomination::from_quarter_mg(base),
            Denomination::from_quarter_mg(base / 2),
            Denomination::from_quarter_mg(base / 4),
        ]
    }
}

impl fmt::Display for PillFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mg", format_mg(self.base_mg()))
    }
}

/// One available tablet strength, stored as quarter-milligram units so that
/// it is exact, hashable and orderable (usable as a `BTreeMap` key).
///
/// Serialized as a milligram value for readability.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(into = "f64", try_from = "f64")]
pub struct Denomination(u32);

impl Denomination {
    /// Construct from quarter-milligram units. Panics on zero in debug
    /// builds; denominations are strictly positive.
    pub fn from_quarter_mg(quarters: u32) -> Self {
        debug_assert!(quarters > 0, "denominations are strictly positive");
        Denomination(quarters)
    }

    /// Construct from a milligram value, absorbing floating-point error
    /// within [`MG_TOLERANCE`]. Returns `None` for non-positive values or
    /// values that are not multiples of 0.25 mg.
    pub fn from_mg(mg: f64) -> Option<Self> {
        if !mg.is_finite() || mg <= 0.0 {
            return None;
        }
        let quarters = (mg * 4.0).round();
        if (mg * 4.0 - quarters).abs() > MG_TOLERANCE * 4.0 {
            return None;
        }
        Some(Denomination(quarters as u32))
    }

    pub fn quarter_mg(&self) -> u32 {
        self.0
    }

    pub fn mg(&self) -> f64 {
        self.0 as f64 / 4.0
    }

    /// The base family this strength belongs to, if it is one of the nine
    /// known tablet splits.
    pub fn family(&self) -> Option<PillFamily> {
        PillFamily::ALL
            .into_iter()
            .find(|f| f.denominations().contains(self))
    }
}

impl From<Denomination> for f64 {
    fn from(d: Denomination) -> f64 {
        d.mg()
    }
}

impl TryFrom<f64> for Denomination {
    type Error = String;

    fn try_from(mg: f64) -> Result<Self, Self::Error> {
        Denomination::from_mg(mg)
            .ok_or_else(|| format!("invalid tablet strength: {mg} mg"))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_mg(self.mg()))
    }
}

/// Format a milligram value without trailing zeros (2, 1.5, 0.75).
pub fn format_mg(mg: f64) -> String {
    let quarters = (mg * 4.0).round();
    if quarters % 4.0 == 0.0 {
        format!("{:.0}", mg)
    } else if quarters % 2.0 == 0.0 {
        format!("{:.1}", mg)
    } else {
        format!("{:.2}", mg)
    }
}

// ============================================================================
// Pill selection
// ============================================================================

/// Which tablet families the pharmacy has in stock. Families toggle as
/// groups; the selection determines the denominations available to the
/// decomposer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PillSelection {
    pub base2: bool,
    pub base3: bool,
    pub base5: bool,
}

impl Default for PillSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl PillSelection {
    pub fn all() -> Self {
        PillSelection {
            base2: true,
            base3: true,
            base5: true,
        }
    }

    pub fn none() -> Self {
        PillSelection {
            base2: false,
            base3: false,
            base5: false,
        }
    }

    pub fn only(family: PillFamily) -> Self {
        let mut selection = Self::none();
        selection.enable(family);
        selection
    }

    pub fn enable(&mut self, family: PillFamily) {
        match family {
            PillFamily::Base2 => self.base2 = true,
            PillFamily::Base3 => self.base3 = true,
            PillFamily::Base5 => self.base5 = true,
        }
    }

    pub fn enabled(&self, family: PillFamily) -> bool {
        match family {
            PillFamily::Base2 => self.base2,
            PillFamily::Base3 => self.base3,
            PillFamily::Base5 => self.base5,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.base2 || self.base3 || self.base5)
    }

    pub fn families(&self) -> Vec<PillFamily> {
        PillFamily::ALL
            .into_iter()
            .filter(|f| self.enabled(*f))
            .collect()
    }

    /// Union of the enabled families' denominations, sorted descending as
    /// the greedy decomposer expects.
    pub fn denominations(&self) -> Vec<Denomination> {
        let mut denominations: Vec<Denomination> = self
            .families()
            .into_iter()
            .flat_map(|f| f.denominations())
            .collect();
        denominations.sort_unstable_by(|a, b| b.cmp(a));
        denominations
    }
}

// ============================================================================
// Regimen types
// ============================================================================

/// One weekday's dose and the exact pills that form it. The pill list is
/// empty only when the dose is zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayAssignment {
    pub weekday: Weekday,
    pub dose_mg: f64,
    pub pills: Vec<Denomination>,
}

impl DayAssignment {
    /// Number of pills needed for this day's dose.
    pub fn complexity(&self) -> usize {
        self.pills.len()
    }
}

/// A full week of assignments, Monday-first. Daily doses sum to the weekly
/// target dose.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRegimen {
    pub days: [DayAssignment; 7],
}

impl WeeklyRegimen {
    pub fn total_mg(&self) -> f64 {
        self.days.iter().map(|d| d.dose_mg).sum()
    }

    pub fn day(&self, weekday: Weekday) -> &DayAssignment {
        &self.days[weekday as usize]
    }
}

/// Pill counts per denomination, either for one standard week or scaled to
/// an appointment period.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<PillCount>", from = "Vec<PillCount>")]
pub struct PillUsage {
    counts: BTreeMap<Denomination, u32>,
}

/// Serialized form of one [`PillUsage`] entry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PillCount {
    pub mg: f64,
    pub count: u32,
}

impl PillUsage {
    pub fn record(&mut self, denomination: Denomination) {
        *self.counts.entry(denomination).or_insert(0) += 1;
    }

    pub fn set(&mut self, denomination: Denomination, count: u32) {
        if count > 0 {
            self.counts.insert(denomination, count);
        }
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl From<PillUsage> for Vec<PillCount> {
    fn from(usage: PillUsage) -> Self {
        usage
            .counts
            .into_iter()
            .map(|(d, count)| PillCount { mg: d.mg(), count })
            .collect()
    }
}

impl From<Vec<PillCount>> for PillUsage {
    fn from(counts: Vec<PillCount>) -> Self {
        let mut usage = PillUsage::default();
        for entry in counts {
            if let Some(denomination) = Denomination::from_mg(entry.mg) {
                usage.set(denomination, entry.count);
            }
        }
        usage
    }
}

/// Whole base tablets needed per family to cover the appointment period.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodSummary {
    pub tablets: BTreeMap<PillFamily, u32>,
}

impl PeriodSummary {
    pub fn tablets_for(&self, family: PillFamily) -> u32 {
        self.tablets.get(&family).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.tablets.is_empty()
    }
}

/// The full result of one regimen computation. Recomputed from scratch on
/// every invocation; callers may cache the latest value for redisplay.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegimenPlan {
    /// Target weekly dose after rounding to the nearest 0.5 mg. The seven
    /// daily doses sum to exactly this value.
    pub target_dose_mg: f64,
    /// Appointment length in days; 0 means "one week equivalent".
    pub appointment_days: u32,
    pub regimen: WeeklyRegimen,
    pub weekly_usage: PillUsage,
    pub summary: PeriodSummary,
}
