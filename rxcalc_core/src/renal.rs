//! Renal function and body-size calculators.
//!
//! Devine ideal body weight, adjusted body weight, BMI (Asian-population
//! cutoffs), Mosteller body surface area and Cockcroft-Gault creatinine
//! clearance. All functions reject non-positive inputs up front.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const CM_PER_INCH: f64 = 2.54;
const UMOL_PER_MG_DL: f64 = 88.4;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(Error::InvalidInput(format!(
                "sex must be male or female, got '{other}'"
            ))),
        }
    }
}

/// Serum creatinine unit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScrUnit {
    MgPerDl,
    UmolPerL,
}

impl FromStr for ScrUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mg/dl" | "mg_dl" | "mgdl" => Ok(ScrUnit::MgPerDl),
            "umol/l" | "umol_l" | "umoll" => Ok(ScrUnit::UmolPerL),
            other => Err(Error::InvalidInput(format!(
                "creatinine unit must be mg/dl or umol/l, got '{other}'"
            ))),
        }
    }
}

fn require_positive(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Devine ideal body weight in kg. Heights at or below 5 feet fall back to
/// the base weight.
pub fn ideal_body_weight(sex: Sex, height_cm: f64) -> Result<f64> {
    require_positive(height_cm, "height")?;

    let height_inches = height_cm / CM_PER_INCH;
    let base = match sex {
        Sex::Male => 50.0,
        Sex::Female => 45.5,
    };
    if height_inches <= 60.0 {
        Ok(base)
    } else {
        Ok(base + 2.3 * (height_inches - 60.0))
    }
}

/// Percent difference of actual weight over (or under) ideal body weight.
pub fn percent_over_ibw(actual_kg: f64, ibw_kg: f64) -> Result<f64> {
    require_positive(actual_kg, "actual weight")?;
    require_positive(ibw_kg, "ideal body weight")?;
    Ok((actual_kg - ibw_kg) / ibw_kg * 100.0)
}

/// Adjusted body weight: IBW + 40 % of the excess over IBW.
pub fn adjusted_body_weight(ibw_kg: f64, actual_kg: f64) -> Result<f64> {
    require_positive(ibw_kg, "ideal body weight")?;
    require_positive(actual_kg, "actual weight")?;
    Ok(ibw_kg + 0.4 * (actual_kg - ibw_kg))
}

/// Body mass index in kg/m².
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<f64> {
    require_positive(weight_kg, "weight")?;
    require_positive(height_cm, "height")?;
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// BMI classification with the Asian-population cutoffs used by the clinic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObeseClass1,
    ObeseClass2,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> BmiCategory {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi <= 22.9 {
            BmiCategory::Normal
        } else if bmi <= 24.9 {
            BmiCategory::Overweight
        } else if bmi <= 29.9 {
            BmiCategory::ObeseClass1
        } else {
            BmiCategory::ObeseClass2
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::ObeseClass1 => "obese class 1",
            BmiCategory::ObeseClass2 => "obese class 2",
        }
    }
}

/// Mosteller body surface area in m².
pub fn body_surface_area(height_cm: f64, weight_kg: f64) -> Result<f64> {
    require_positive(height_cm, "height")?;
    require_positive(weight_kg, "weight")?;
    Ok((height_cm * weight_kg / 3600.0).sqrt())
}

/// Cockcroft-Gault creatinine clearance in mL/min.
pub fn creatinine_clearance(
    sex: Sex,
    age_years: f64,
    weight_kg: f64,
    scr: f64,
    unit: ScrUnit,
) -> Result<f64> {
    require_positive(age_years, "age")?;
    require_positive(weight_kg, "weight")?;
    require_positive(scr, "serum creatinine")?;
    if age_years >= 140.0 {
        return Err(Error::InvalidInput(format!(
            "age must be below 140 years, got {age_years}"
        )));
    }

    let scr_mg_dl = match unit {
        ScrUnit::MgPerDl => scr,
        ScrUnit::UmolPerL => scr / UMOL_PER_MG_DL,
    };

    let crcl = (140.0 - age_years) * weight_kg / (scr_mg_dl * 72.0);
    Ok(match sex {
        Sex::Male => crcl,
        Sex::Female => crcl * 0.85,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibw_devine() {
        // 170 cm male: 66.93 in → 50 + 2.3 × 6.93
        let ibw = ideal_body_weight(Sex::Male, 170.0).unwrap();
        assert!((ibw - 65.94).abs() < 0.01);

        let ibw = ideal_body_weight(Sex::Female, 170.0).unwrap();
        assert!((ibw - 61.44).abs() < 0.01);
    }

    #[test]
    fn test_ibw_short_stature_floor() {
        assert_eq!(ideal_body_weight(Sex::Male, 150.0).unwrap(), 50.0);
        assert_eq!(ideal_body_weight(Sex::Female, 150.0).unwrap(), 45.5);
    }

    #[test]
    fn test_percent_over_ibw() {
        let pct = percent_over_ibw(72.0, 60.0).unwrap();
        assert!((pct - 20.0).abs() < 1e-9);

        let pct = percent_over_ibw(54.0, 60.0).unwrap();
        assert!((pct + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjusted_body_weight() {
        let abw = adjusted_body_weight(60.0, 90.0).unwrap();
        assert!((abw - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_and_categories() {
        let value = bmi(70.0, 175.0).unwrap();
        assert!((value - 22.857).abs() < 0.001);
        assert_eq!(BmiCategory::from_bmi(value), BmiCategory::Normal);

        assert_eq!(BmiCategory::from_bmi(17.0), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(23.5), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(27.0), BmiCategory::ObeseClass1);
        assert_eq!(BmiCategory::from_bmi(31.0), BmiCategory::ObeseClass2);
    }

    #[test]
    fn test_bsa_mosteller() {
        let bsa = body_surface_area(170.0, 70.0).unwrap();
        assert!((bsa - 1.818).abs() < 0.001);
    }

    #[test]
    fn test_cockcroft_gault() {
        // 40 y male, 70 kg, SCr 1.0 mg/dL: (140-40)×70 / 72 = 97.22
        let crcl = creatinine_clearance(Sex::Male, 40.0, 70.0, 1.0, ScrUnit::MgPerDl).unwrap();
        assert!((crcl - 97.222).abs() < 0.001);

        // Female factor 0.85
        let crcl_f =
            creatinine_clearance(Sex::Female, 40.0, 70.0, 1.0, ScrUnit::MgPerDl).unwrap();
        assert!((crcl_f - 97.222 * 0.85).abs() < 0.001);

        // 88.4 µmol/L is 1.0 mg/dL
        let crcl_umol =
            creatinine_clearance(Sex::Male, 40.0, 70.0, 88.4, ScrUnit::UmolPerL).unwrap();
        assert!((crcl_umol - crcl).abs() < 1e-9);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("mg/dL".parse::<ScrUnit>().unwrap(), ScrUnit::MgPerDl);
        assert_eq!("umol/L".parse::<ScrUnit>().unwrap(), ScrUnit::UmolPerL);
        assert!("mmol/l".parse::<ScrUnit>().is_err());

        assert_eq!("M".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_rejects_nonpositive_inputs() {
        assert!(ideal_body_weight(Sex::Male, 0.0).is_err());
        assert!(bmi(-70.0, 175.0).is_err());
        assert!(creatinine_clearance(Sex::Male, 40.0, 70.0, 0.0, ScrUnit::MgPerDl).is_err());
    }
}
