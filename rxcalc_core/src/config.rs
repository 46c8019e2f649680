//! Configuration file support for rxcalc.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rxcalc/config.toml`.

use crate::types::{PillFamily, PillSelection};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dosing: DosingConfig,

    #[serde(default)]
    pub pills: PillConfig,

    #[serde(default)]
    pub reference: ReferenceConfig,
}

/// Warfarin dose range and appointment defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DosingConfig {
    #[serde(default = "default_min_weekly_mg")]
    pub min_weekly_mg: f64,

    #[serde(default = "default_max_weekly_mg")]
    pub max_weekly_mg: f64,

    #[serde(default = "default_appointment_days")]
    pub default_appointment_days: u32,
}

impl Default for DosingConfig {
    fn default() -> Self {
        Self {
            min_weekly_mg: default_min_weekly_mg(),
            max_weekly_mg: default_max_weekly_mg(),
            default_appointment_days: default_appointment_days(),
        }
    }
}

/// Which tablet families the pharmacy stocks by default
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PillConfig {
    #[serde(default = "default_true")]
    pub base2: bool,

    #[serde(default = "default_true")]
    pub base3: bool,

    #[serde(default = "default_true")]
    pub base5: bool,
}

impl Default for PillConfig {
    fn default() -> Self {
        Self {
            base2: true,
            base3: true,
            base5: true,
        }
    }
}

impl PillConfig {
    pub fn selection(&self) -> PillSelection {
        let mut selection = PillSelection::none();
        if self.base2 {
            selection.enable(PillFamily::Base2);
        }
        if self.base3 {
            selection.enable(PillFamily::Base3);
        }
        if self.base5 {
            selection.enable(PillFamily::Base5);
        }
        selection
    }
}

/// Drug reference table configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ReferenceConfig {
    /// Site-maintained JSON file replacing the built-in table
    #[serde(default)]
    pub drug_file: Option<PathBuf>,
}

// Default value functions
fn default_min_weekly_mg() -> f64 {
    3.0
}

fn default_max_weekly_mg() -> f64 {
    100.0
}

fn default_appointment_days() -> u32 {
    7
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("rxcalc").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.dosing.min_weekly_mg < 0.0
            || self.dosing.max_weekly_mg <= self.dosing.min_weekly_mg
        {
            return Err(Error::Config(format!(
                "dose range {}..{} mg/week is not valid",
                self.dosing.min_weekly_mg, self.dosing.max_weekly_mg
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dosing.min_weekly_mg, 3.0);
        assert_eq!(config.dosing.max_weekly_mg, 100.0);
        assert_eq!(config.dosing.default_appointment_days, 7);
        assert_eq!(config.pills.selection(), PillSelection::all());
        assert!(config.reference.drug_file.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.dosing.max_weekly_mg, parsed.dosing.max_weekly_mg);
        assert_eq!(config.pills.selection(), parsed.pills.selection());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[pills]
base5 = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(!config.pills.base5);
        assert!(config.pills.base2); // default
        assert_eq!(config.dosing.default_appointment_days, 7); // default
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.dosing.default_appointment_days = 28;
        config.pills.base3 = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.dosing.default_appointment_days, 28);
        assert!(!loaded.pills.base3);
    }

    #[test]
    fn test_invalid_dose_range_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[dosing]\nmin_weekly_mg = 50.0\nmax_weekly_mg = 10.0\n",
        )
        .unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(Error::Config(_))
        ));
    }
}
