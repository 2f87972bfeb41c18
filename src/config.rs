// ⚙️ Reconstruction Config - Policy parameters as data
// The windows and constants below are heuristics chosen for one country's data shape.
// They live here instead of in the fill rules so they can be swapped per dataset.

use crate::error::ReconstructionError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Entity name matched in both raw sources
    pub country: String,

    /// δ in K(t) = I(t) + (1-δ)K(t-1)
    pub depreciation_rate: f64,

    /// Anchor years for the schooling level growth rate
    pub schooling_anchor_start: i32,
    pub schooling_anchor_end: i32,

    /// Years strictly before this one get investment = gdp × ratio
    pub investment_threshold_year: i32,

    /// Inclusive window the investment/GDP ratio is computed over
    pub investment_reference_start: i32,
    pub investment_reference_end: i32,

    /// How many of the earliest labor observations feed the geometric growth rate
    pub labor_growth_observations: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        ReconstructionConfig {
            country: "Belgium".to_string(),
            depreciation_rate: 0.06,
            schooling_anchor_start: 1990,
            schooling_anchor_end: 2000,
            investment_threshold_year: 1970,
            investment_reference_start: 1970,
            investment_reference_end: 1980,
            labor_growth_observations: 5,
        }
    }
}

impl ReconstructionConfig {
    /// Load config from a JSON file. Missing keys fall back to the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ReconstructionConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Builder: override the country
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ReconstructionError> {
        if self.country.trim().is_empty() {
            return Err(ReconstructionError::InvalidConfig(
                "country must not be empty".to_string(),
            ));
        }

        if !(self.depreciation_rate > 0.0 && self.depreciation_rate < 1.0) {
            return Err(ReconstructionError::InvalidConfig(format!(
                "depreciation_rate must be in (0, 1), got {}",
                self.depreciation_rate
            )));
        }

        if self.schooling_anchor_end <= self.schooling_anchor_start {
            return Err(ReconstructionError::InvalidConfig(format!(
                "schooling anchors must be increasing, got {}..{}",
                self.schooling_anchor_start, self.schooling_anchor_end
            )));
        }

        if self.investment_reference_end < self.investment_reference_start {
            return Err(ReconstructionError::InvalidConfig(format!(
                "investment reference window is empty: {}..={}",
                self.investment_reference_start, self.investment_reference_end
            )));
        }

        if self.labor_growth_observations < 2 {
            return Err(ReconstructionError::InvalidConfig(format!(
                "labor_growth_observations must be at least 2, got {}",
                self.labor_growth_observations
            )));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ReconstructionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.depreciation_rate, 0.06);
        assert_eq!(config.labor_growth_observations, 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ReconstructionConfig =
            serde_json::from_str(r#"{"country": "Netherlands", "depreciation_rate": 0.05}"#)
                .unwrap();

        assert_eq!(config.country, "Netherlands");
        assert_eq!(config.depreciation_rate, 0.05);
        assert_eq!(config.schooling_anchor_start, 1990);
        assert_eq!(config.investment_reference_end, 1980);
    }

    #[test]
    fn test_rejects_bad_depreciation() {
        let mut config = ReconstructionConfig::default();
        config.depreciation_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ReconstructionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_reversed_anchors() {
        let mut config = ReconstructionConfig::default();
        config.schooling_anchor_start = 2000;
        config.schooling_anchor_end = 1990;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("solow_accounting_config_test.json");
        fs::write(&path, r#"{"investment_threshold_year": 1965}"#).unwrap();

        let config = ReconstructionConfig::from_file(&path).unwrap();
        assert_eq!(config.investment_threshold_year, 1965);
        assert_eq!(config.country, "Belgium");

        let _ = fs::remove_file(&path);
    }
}
