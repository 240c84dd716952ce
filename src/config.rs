//! Scene configuration, loadable from TOML.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Step-search tuning for the farthest-placement search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Starting step and upper cap on step growth.
    pub initial_step: f64,
    /// Search stops once the step falls below this.
    pub min_step: f64,
    pub max_iterations: usize,
    /// Step multiplier applied after each accepted probe.
    pub growth_factor: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            initial_step: 0.001,
            min_step: 1e-11,
            max_iterations: 10_000,
            growth_factor: 1.5,
        }
    }
}

/// Scene-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Broad-phase grid cell size in world units.
    pub cell_size: f64,
    /// Box pre-filter tolerance used by the collision pass.
    pub detect_tolerance: f64,
    /// Record wall-clock timing in pass reports.
    pub enable_timing: bool,
    pub placement: PlacementConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            detect_tolerance: 0.001,
            enable_timing: false,
            placement: PlacementConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parse from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a `.toml` file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.cell_size, 1.0);
        assert_eq!(cfg.detect_tolerance, 0.001);
        assert_eq!(cfg.placement.initial_step, 0.001);
        assert_eq!(cfg.placement.min_step, 1e-11);
        assert_eq!(cfg.placement.max_iterations, 10_000);
        assert_eq!(cfg.placement.growth_factor, 1.5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = SceneConfig::from_toml_str(
            r#"
            cell_size = 2.5

            [placement]
            max_iterations = 500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cell_size, 2.5);
        assert_eq!(cfg.detect_tolerance, 0.001);
        assert_eq!(cfg.placement.max_iterations, 500);
        assert_eq!(cfg.placement.initial_step, 0.001);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = SceneConfig::from_toml_str("cell_size = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut cfg = SceneConfig::default();
        cfg.enable_timing = true;
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(SceneConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = SceneConfig::load_from_file("scene.ron").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
