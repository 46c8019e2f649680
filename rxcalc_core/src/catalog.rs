//! Tablet catalog.
//!
//! The nine stocked warfarin strengths: whole, half and quarter splits of
//! the 2, 3 and 5 mg base tablets.

use crate::types::{Denomination, PillFamily};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of tablet splits.
///
/// **Note**: For production use, prefer `get_default_catalog()` which
/// returns a cached reference. This function is retained for testing and
/// custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// How a strength is obtained from its base tablet.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TabletFraction {
    Whole,
    Half,
    Quarter,
}

impl TabletFraction {
    pub const ALL: [TabletFraction; 3] = [
        TabletFraction::Whole,
        TabletFraction::Half,
        TabletFraction::Quarter,
    ];

    pub fn divisor(&self) -> u32 {
        match self {
            TabletFraction::Whole => 1,
            TabletFraction::Half => 2,
            TabletFraction::Quarter => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TabletFraction::Whole => "whole",
            TabletFraction::Half => "half",
            TabletFraction::Quarter => "quarter",
        }
    }
}

/// One stocked strength and where it comes from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tablet {
    pub strength: Denomination,
    pub family: PillFamily,
    pub fraction: TabletFraction,
}

impl Tablet {
    /// Human-readable provenance, e.g. "half of a 3 mg tablet".
    pub fn description(&self) -> String {
        match self.fraction {
            TabletFraction::Whole => format!("whole {} tablet", self.family),
            fraction => format!("{} of a {} tablet", fraction.label(), self.family),
        }
    }
}

/// The complete catalog of stocked tablet splits, sorted by strength
/// descending.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub tablets: Vec<Tablet>,
}

fn build_default_catalog_internal() -> Catalog {
    let mut tablets = Vec::new();
    for family in PillFamily::ALL {
        for fraction in TabletFraction::ALL {
            let quarters = family.base_quarter_mg() / fraction.divisor();
            tablets.push(Tablet {
                strength: Denomination::from_quarter_mg(quarters),
                family,
                fraction,
            });
        }
    }
    tablets.sort_by(|a, b| b.strength.cmp(&a.strength));
    Catalog { tablets }
}

impl Catalog {
    pub fn tablet_for(&self, strength: Denomination) -> Option<&Tablet> {
        self.tablets.iter().find(|t| t.strength == strength)
    }

    pub fn for_family(&self, family: PillFamily) -> Vec<&Tablet> {
        self.tablets.iter().filter(|t| t.family == family).collect()
    }

    /// Validate the catalog for consistency and completeness.
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for tablet in &self.tablets {
            let expected = tablet.family.base_quarter_mg() / tablet.fraction.divisor();
            if tablet.strength.quarter_mg() != expected {
                errors.push(format!(
                    "tablet {} is not a {} of the {} base",
                    tablet.strength,
                    tablet.fraction.label(),
                    tablet.family
                ));
            }
            if tablet.strength.family() != Some(tablet.family) {
                errors.push(format!(
                    "tablet {} does not map back to family {}",
                    tablet.strength, tablet.family
                ));
            }
        }

        for family in PillFamily::ALL {
            let count = self.tablets.iter().filter(|t| t.family == family).count();
            if count != 3 {
                errors.push(format!(
                    "family {} has {} splits, expected whole/half/quarter",
                    family, count
                ));
            }
        }

        let mut strengths: Vec<Denomination> =
            self.tablets.iter().map(|t| t.strength).collect();
        strengths.dedup();
        if strengths.len() != self.tablets.len() {
            errors.push("catalog contains duplicate strengths".to_string());
        }
        if self
            .tablets
            .windows(2)
            .any(|w| w[0].strength < w[1].strength)
        {
            errors.push("catalog is not sorted by strength descending".to_string());
        }

        errors
    }
}
