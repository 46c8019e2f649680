//! Pediatric liquid drug dosing.
//!
//! Weight-based mg/kg/day dosing divided over the day's doses, converted to
//! a syringe volume from the syrup concentration. Volumes are reported to
//! one decimal place, the finest marking on an oral syringe.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One computed liquid dose.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiquidDose {
    pub mg_per_dose: f64,
    pub ml_per_dose: f64,
    pub doses_per_day: u32,
}

/// Compute a liquid dose from weight-based daily dosing.
pub fn liquid_dose(
    weight_kg: f64,
    mg_per_kg_per_day: f64,
    doses_per_day: u32,
    concentration_mg_per_ml: f64,
) -> Result<LiquidDose> {
    for (value, what) in [
        (weight_kg, "weight"),
        (mg_per_kg_per_day, "mg/kg/day dose"),
        (concentration_mg_per_ml, "concentration"),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "{what} must be positive, got {value}"
            )));
        }
    }
    if doses_per_day == 0 {
        return Err(Error::InvalidInput(
            "doses per day must be at least 1".into(),
        ));
    }

    let mg_per_dose = weight_kg * mg_per_kg_per_day / doses_per_day as f64;
    let ml_per_dose = (mg_per_dose / concentration_mg_per_ml * 10.0).round() / 10.0;

    Ok(LiquidDose {
        mg_per_dose,
        ml_per_dose,
        doses_per_day,
    })
}
