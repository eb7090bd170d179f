use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::scroll::{DEFAULT_OVERSCAN, MAX_OVERSCAN};

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "OverlayConfig::default_mutation_budget")]
    pub mutation_budget: usize,
    #[serde(default = "OverlayConfig::default_panel_height")]
    pub panel_height: f32,
    #[serde(default = "OverlayConfig::default_slide_acceleration")]
    pub slide_acceleration: f32,
    #[serde(default = "OverlayConfig::default_overscan")]
    pub overscan: usize,
    /// Lets the value keys drill into an object from the list, like the select key does.
    #[serde(default)]
    pub lateral_select: bool,
}

impl OverlayConfig {
    const fn default_mutation_budget() -> usize {
        1
    }

    const fn default_panel_height() -> f32 {
        394.0
    }

    const fn default_slide_acceleration() -> f32 {
        1.0
    }

    const fn default_overscan() -> usize {
        DEFAULT_OVERSCAN
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.panel_height.is_finite() && self.panel_height >= 0.0) {
            bail!("overlay.panel_height must be a finite, non-negative number (got {})", self.panel_height);
        }
        if !(self.slide_acceleration.is_finite() && self.slide_acceleration > 0.0) {
            bail!("overlay.slide_acceleration must be positive (got {})", self.slide_acceleration);
        }
        if self.overscan > MAX_OVERSCAN {
            bail!("overlay.overscan must be at most {MAX_OVERSCAN} (got {})", self.overscan);
        }
        Ok(())
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mutation_budget: Self::default_mutation_budget(),
            panel_height: Self::default_panel_height(),
            slide_acceleration: Self::default_slide_acceleration(),
            overscan: Self::default_overscan(),
            lateral_select: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleConfigOverrides {
    pub mutation_budget: Option<usize>,
    pub panel_height: Option<f32>,
}

impl ConsoleConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        cfg.overlay.validate().with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = ?err, "config load failed, falling back to defaults");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConsoleConfigOverrides) {
        if let Some(budget) = overrides.mutation_budget {
            self.overlay.mutation_budget = budget;
        }
        if let Some(height) = overrides.panel_height {
            self.overlay.panel_height = height;
        }
    }
}

impl ConsoleConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.mutation_budget.is_none() && self.panel_height.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.mutation_budget.is_some() {
            fields.push("mutation_budget");
        }
        if self.panel_height.is_some() {
            fields.push("panel_height");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_keys_use_defaults() {
        let cfg: ConsoleConfig = serde_json::from_str(r#"{"overlay":{"mutation_budget":3}}"#).expect("parse");
        assert_eq!(cfg.overlay.mutation_budget, 3);
        assert_eq!(cfg.overlay.panel_height, 394.0);
        assert_eq!(cfg.overlay.slide_acceleration, 1.0);
        assert_eq!(cfg.overlay.overscan, DEFAULT_OVERSCAN);
        assert!(!cfg.overlay.lateral_select);

        let empty: ConsoleConfig = serde_json::from_str("{}").expect("parse empty");
        assert_eq!(empty.overlay.mutation_budget, 1);
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let mut cfg = ConsoleConfig::default();
        let overrides = ConsoleConfigOverrides { mutation_budget: Some(4), panel_height: None };
        assert!(!overrides.is_empty());
        assert_eq!(overrides.applied_fields(), vec!["mutation_budget"]);
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.overlay.mutation_budget, 4);
        assert_eq!(cfg.overlay.panel_height, 394.0);
    }

    #[test]
    fn load_rejects_non_positive_acceleration() {
        let mut temp = NamedTempFile::new().expect("temp config");
        write!(temp, r#"{{"overlay":{{"slide_acceleration":0.0}}}}"#).expect("write config");
        let err = ConsoleConfig::load(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("slide_acceleration"), "unexpected error: {err:#}");

        let fallback = ConsoleConfig::load_or_default(temp.path());
        assert_eq!(fallback.overlay.slide_acceleration, 1.0);
    }

    #[test]
    fn load_rejects_oversized_overscan() {
        let mut temp = NamedTempFile::new().expect("temp config");
        write!(temp, r#"{{"overlay":{{"overscan":18446744073709551615}}}}"#).expect("write config");
        let err = ConsoleConfig::load(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("overlay.overscan"), "unexpected error: {err:#}");

        let edge = OverlayConfig { overscan: MAX_OVERSCAN, ..OverlayConfig::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = ConsoleConfig::load_or_default("does/not/exist.json");
        assert_eq!(cfg.overlay.mutation_budget, 1);
    }
}
