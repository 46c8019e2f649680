//! Error types for the rxcalc_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rxcalc_core operations.
///
/// `InvalidInput`, `NoPillsSelected` and `Infeasible` are deliberately
/// distinct variants: callers message "check your dose entry" for the first
/// and "change your pill selection" for the other two.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied value was rejected before any computation ran
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A non-zero weekly dose was requested with no tablet family enabled
    #[error("no tablet family selected; enable at least one of the 2/3/5 mg families")]
    NoPillsSelected,

    /// Some daily dose has no exact pill combination; the whole weekly
    /// computation is discarded, never a partial week
    #[error("no exact pill combination for a {dose_mg} mg day with the selected tablets")]
    Infeasible { dose_mg: f64 },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
