//! Pregnancy and lactation drug reference.
//!
//! A small built-in table of the drugs the clinic is asked about most,
//! plus a loader for a site-maintained JSON file that replaces it. Remote
//! fetching, search widgets and pagination live outside this crate.

use crate::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One drug's pregnancy/lactation guidance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrugEntry {
    pub name: String,
    /// FDA letter category (A/B/C/D/X).
    pub pregnancy_category: String,
    pub pregnancy_info: String,
    /// Hale lactation risk category (L1-L5).
    pub lactation_category: String,
    pub lactation_info: String,
    #[serde(default)]
    pub references: Vec<String>,
}

fn entry(
    name: &str,
    pregnancy_category: &str,
    pregnancy_info: &str,
    lactation_category: &str,
    lactation_info: &str,
) -> DrugEntry {
    DrugEntry {
        name: name.into(),
        pregnancy_category: pregnancy_category.into(),
        pregnancy_info: pregnancy_info.into(),
        lactation_category: lactation_category.into(),
        lactation_info: lactation_info.into(),
        references: Vec::new(),
    }
}

static BUILTIN: Lazy<Vec<DrugEntry>> = Lazy::new(|| {
    let mut entries = vec![
        entry(
            "Warfarin",
            "X",
            "Crosses the placenta; embryopathy with first-trimester exposure. \
             Switch to LMWH before conception where possible.",
            "L2",
            "Minimal transfer into milk; compatible with breastfeeding with \
             routine infant monitoring.",
        ),
        entry(
            "Enalapril",
            "D",
            "ACE inhibitors cause fetal renal injury and oligohydramnios in \
             the second and third trimesters.",
            "L2",
            "Low milk levels; generally considered compatible for older \
             infants.",
        ),
        entry(
            "Atorvastatin",
            "X",
            "Statins are discontinued in pregnancy; cholesterol synthesis is \
             essential for fetal development.",
            "L3",
            "No data; withhold during breastfeeding.",
        ),
        entry(
            "Metformin",
            "B",
            "No increase in congenital anomalies observed; commonly continued \
             for gestational diabetes.",
            "L1",
            "Milk levels are clinically insignificant.",
        ),
        entry(
            "Ibuprofen",
            "C",
            "Avoid from 20 weeks; risk of oligohydramnios and premature \
             ductus closure in the third trimester.",
            "L1",
            "Preferred NSAID during lactation; negligible transfer.",
        ),
        entry(
            "Doxycycline",
            "D",
            "Tetracyclines deposit in fetal teeth and bone after the first \
             trimester.",
            "L3",
            "Short courses acceptable; avoid prolonged use.",
        ),
        entry(
            "Amoxicillin",
            "B",
            "Long history of safe use in pregnancy.",
            "L1",
            "Trace milk levels; watch for infant loose stools or rash.",
        ),
        entry(
            "Isotretinoin",
            "X",
            "Major teratogen; contraception required before, during and after \
             therapy.",
            "L5",
            "Contraindicated while breastfeeding.",
        ),
    ];
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
});

/// The built-in reference table, sorted by drug name.
pub fn builtin_reference() -> &'static [DrugEntry] {
    &BUILTIN
}

/// Load a site-maintained drug reference from a JSON file.
///
/// Returns None if the file doesn't exist (the built-in table applies).
/// An unreadable or malformed file logs a warning and also falls back.
pub fn load_drug_reference(path: &Path) -> Result<Option<Vec<DrugEntry>>> {
    if !path.exists() {
        tracing::debug!("No drug reference file found at {:?}", path);
        return Ok(None);
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                "Failed to read drug reference at {:?}: {}. Using built-in table.",
                path,
                e
            );
            return Ok(None);
        }
    };

    let mut entries: Vec<DrugEntry> = match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "Failed to parse drug reference at {:?}: {}. Using built-in table.",
                path,
                e
            );
            return Ok(None);
        }
    };

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!("Loaded {} drug entries from {:?}", entries.len(), path);
    Ok(Some(entries))
}

/// Case-insensitive substring search over drug names.
pub fn find<'a>(entries: &'a [DrugEntry], query: &str) -> Vec<&'a DrugEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}

/// Validate a reference table for consistency.
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate(entries: &[DrugEntry]) -> Vec<String> {
    let mut errors = Vec::new();

    for e in entries {
        if e.name.trim().is_empty() {
            errors.push("drug entry has empty name".to_string());
        }
        if !matches!(e.pregnancy_category.as_str(), "A" | "B" | "C" | "D" | "X") {
            errors.push(format!(
                "drug '{}' has unknown pregnancy category '{}'",
                e.name, e.pregnancy_category
            ));
        }
        if !matches!(
            e.lactation_category.as_str(),
            "L1" | "L2" | "L3" | "L4" | "L5"
        ) {
            errors.push(format!(
                "drug '{}' has unknown lactation category '{}'",
                e.name, e.lactation_category
            ));
        }
    }

    let mut names: Vec<String> = entries.iter().map(|e| e.name.to_lowercase()).collect();
    names.sort();
    names.dedup();
    if names.len() != entries.len() {
        errors.push("reference table contains duplicate drug names".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_validates() {
        let errors = validate(builtin_reference());
        assert!(
            errors.is_empty(),
            "Built-in reference has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_builtin_is_sorted_by_name() {
        let names: Vec<&str> = builtin_reference().iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_find_is_case_insensitive_substring() {
        let entries = builtin_reference();
        let hits = find(entries, "WARF");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Warfarin");

        assert!(find(entries, "nonexistent-drug").is_empty());
        assert!(find(entries, "  ").is_empty());
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drugs.json");
        assert_eq!(load_drug_reference(&path).unwrap(), None);
    }

    #[test]
    fn test_load_malformed_file_falls_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drugs.json");
        std::fs::write(&path, "{ not json }").unwrap();
        assert_eq!(load_drug_reference(&path).unwrap(), None);
    }

    #[test]
    fn test_load_roundtrip_and_sorting() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drugs.json");

        let entries = vec![
            DrugEntry {
                name: "Zidovudine".into(),
                pregnancy_category: "C".into(),
                pregnancy_info: "Used to prevent vertical transmission.".into(),
                lactation_category: "L3".into(),
                lactation_info: "Avoid where safe alternatives exist.".into(),
                references: vec!["local guideline".into()],
            },
            DrugEntry {
                name: "Amoxicillin".into(),
                pregnancy_category: "B".into(),
                pregnancy_info: "Safe.".into(),
                lactation_category: "L1".into(),
                lactation_info: "Safe.".into(),
                references: vec![],
            },
        ];
        std::fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

        let loaded = load_drug_reference(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        // Re-sorted by name on load
        assert_eq!(loaded[0].name, "Amoxicillin");
        assert_eq!(loaded[1].name, "Zidovudine");
    }
}
