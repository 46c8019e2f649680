#![forbid(unsafe_code)]

//! Core domain model and business logic for the rxcalc clinical dosing
//! toolkit.
//!
//! This crate provides:
//! - Domain types (weekdays, tablet families, denominations, regimens)
//! - The warfarin weekly regimen planner (distribute, decompose,
//!   prioritize, aggregate)
//! - Dose titration, renal function, pediatric liquid dosing and
//!   appointment-date calculators
//! - A pregnancy/lactation drug reference table

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod distribute;
pub mod decompose;
pub mod prioritize;
pub mod aggregate;
pub mod regimen;
pub mod titration;
pub mod renal;
pub mod pediatric;
pub mod appointment;
pub mod reference;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use regimen::plan_week;
pub use titration::{adjust_by_percent, round_to_half, DoseChange, DoseDirection};
pub use reference::{builtin_reference, load_drug_reference};
