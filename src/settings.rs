use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::common::read_file;
use crate::geom::CIRCLE_STEPS;
use crate::query::{DistanceUnit, Radius};

/// Session defaults. Every field is optional in a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Unit the radius is shown and entered in.
    pub unit: DistanceUnit,
    /// Initial radius, in `unit`.
    pub radius: f64,
    /// Fraction of the extent added on each side when fitting the camera.
    pub camera_margin: f64,
    /// Degrees added on each side of an axis with no extent.
    pub camera_pad_deg: f64,
    /// Segments in the drawn search circle.
    pub circle_steps: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: DistanceUnit::Miles,
            radius: 1.0,
            camera_margin: 0.05,
            camera_pad_deg: 0.01,
            circle_steps: CIRCLE_STEPS,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file; absent fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = read_file(path)?;
        let settings: Settings = serde_json::from_slice(&bytes)
            .with_context(|| format!("[Settings.from_json_file] Failed to parse {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no session can work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.camera_margin >= 0.0 && self.camera_margin.is_finite(), "camera_margin must be a non-negative number");
        ensure!(self.camera_pad_deg >= 0.0 && self.camera_pad_deg.is_finite(), "camera_pad_deg must be a non-negative number");
        ensure!(self.circle_steps >= 3, "circle_steps must be at least 3");
        Ok(())
    }

    /// The initial radius, clamped to the unit's range.
    #[inline] pub fn initial_radius(&self) -> Radius { Radius::from_display(self.radius, self.unit) }
}
