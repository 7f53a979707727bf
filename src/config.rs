//! Export configuration.

use crate::error::Result;
use crate::light::EnergyScale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options for one export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Luminance per unit of light energy, as `mantissa * 10^power`.
    pub energy_mantissa: f64,
    pub energy_power: i32,
    /// Export only selected objects.
    pub only_selected: bool,
    /// Always write the sky dome, even when no sun asks for it.
    pub add_sky: bool,
    /// Classify geometries without an explicit primitive kind by name.
    pub name_heuristics: bool,
    /// Write the `run1`..`run4` shell and batch scripts.
    pub run_scripts: bool,
    /// Write `grids/<object>.pnt` for objects flagged as calculation grids.
    pub calculation_grids: bool,
    /// Font file used by text labels.
    pub font: String,
    /// Nominal radius of point and spot lamp geometry.
    pub lamp_radius: f64,
    /// Directory relative texture paths are resolved against.
    pub image_root: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            energy_mantissa: 0.5,
            energy_power: 0,
            only_selected: false,
            add_sky: false,
            name_heuristics: true,
            run_scripts: true,
            calculation_grids: true,
            font: "helvet.fnt".to_string(),
            lamp_radius: 0.33,
            image_root: None,
        }
    }
}

impl ExportConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn with_energy_scale(mut self, mantissa: f64, power: i32) -> Self {
        self.energy_mantissa = mantissa;
        self.energy_power = power;
        self
    }

    pub fn with_sky(mut self, add_sky: bool) -> Self {
        self.add_sky = add_sky;
        self
    }

    pub fn only_selected(mut self, only_selected: bool) -> Self {
        self.only_selected = only_selected;
        self
    }

    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = Some(root.into());
        self
    }

    pub fn energy_scale(&self) -> EnergyScale {
        EnergyScale::new(self.energy_mantissa, self.energy_power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ExportConfig = serde_json::from_str(r#"{"energy_power": 2}"#).unwrap();
        assert_eq!(config.energy_power, 2);
        assert_eq!(config.energy_mantissa, 0.5);
        assert_eq!(config.font, "helvet.fnt");
        assert_eq!(config.energy_scale().factor(), 50.0);
    }

    #[test]
    fn test_builders() {
        let config = ExportConfig::default()
            .with_energy_scale(0.25, -1)
            .with_sky(true)
            .only_selected(true);
        assert!(config.add_sky && config.only_selected);
        assert_eq!(config.energy_scale(), EnergyScale::new(0.25, -1));
    }
}
