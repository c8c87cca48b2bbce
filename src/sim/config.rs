use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};
use super::sensor::SensorModel;

// ---------------------------------------------------------------------------
// Simulation parameters
// ---------------------------------------------------------------------------

/// Everything a run depends on. Every field has a default, so a parameter
/// file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of distinct light sources.
    pub n_leds: usize,
    /// Number of differently coloured objects.
    pub n_samples: usize,
    /// Number of machines, each with its own mean object height.
    pub n_machines: usize,
    /// Randomised object placements per machine and LED.
    pub height_draws: usize,
    /// Fixed seed for a reproducible run; drawn from entropy when absent.
    pub seed: Option<u64>,
    pub led: LedParams,
    pub object: ObjectParams,
    pub camera: CameraParams,
    pub sensor: SensorModel,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            n_leds: 3,
            n_samples: 30,
            n_machines: 3,
            height_draws: 15,
            seed: None,
            led: LedParams::default(),
            object: ObjectParams::default(),
            camera: CameraParams::default(),
            sensor: SensorModel::default(),
        }
    }
}

/// White LED: blue emitter plus phosphorescent tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedParams {
    pub blue_center_nm: f64,
    pub blue_width_nm: f64,
    pub phosphor_center_nm: f64,
    pub phosphor_width_nm: f64,
    /// Phosphor amplitude relative to the blue peak.
    pub phosphor_ratio: f64,
    /// Full range of the random shift applied to both lobes.
    pub position_jitter_nm: f64,
    /// Full range of the random widening applied to both lobes.
    pub width_jitter_nm: f64,
}

impl Default for LedParams {
    fn default() -> Self {
        Self {
            blue_center_nm: 460.0,
            blue_width_nm: 10.0,
            phosphor_center_nm: 560.0,
            phosphor_width_nm: 50.0,
            phosphor_ratio: 0.4,
            position_jitter_nm: 1.0,
            width_jitter_nm: 2.0,
        }
    }
}

/// Reflective objects and their placement in the chamber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectParams {
    pub center_nm: f64,
    /// Full range of reflectance peak positions around `center_nm`.
    pub center_spread_nm: f64,
    pub min_width_nm: f64,
    pub max_width_nm: f64,
    /// Object size (dimensionless, same unit as heights).
    pub size: f64,
    pub height_mean: f64,
    /// Spread of the per-machine mean height.
    pub machine_height_spread: f64,
    /// Spread of each placement around its machine's mean.
    pub draw_height_spread: f64,
}

impl Default for ObjectParams {
    fn default() -> Self {
        Self {
            center_nm: 500.0,
            center_spread_nm: 200.0,
            min_width_nm: 1.0,
            max_width_nm: 90.0,
            size: 2.0,
            height_mean: 0.5,
            machine_height_spread: 0.01,
            draw_height_spread: 0.01,
        }
    }
}

/// Light-absorbing camera housing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub loc_nm: f64,
    pub scale_nm: f64,
    /// Peak reflectance is `1 / absorbance`.
    pub absorbance: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            loc_nm: 350.0,
            scale_nm: 200.0,
            absorbance: 5.0,
        }
    }
}

/// Upper bound on the number of readings in one run.
pub const MAX_POINTS: usize = 50_000_000;

impl SimulationParams {
    /// Readings a run produces, or `None` if the count overflows `usize`.
    pub fn total_points(&self) -> Option<usize> {
        self.n_machines
            .checked_mul(self.n_leds)?
            .checked_mul(self.height_draws)?
            .checked_mul(self.n_samples)
    }

    /// Read parameters from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading parameter file {}", path.display()))?;
        let params: Self = serde_json::from_str(&text).context("parsing parameter JSON")?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serializing parameters")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing parameter file {}", path.display()))
    }

    /// Reject parameter sets that would make a run meaningless.
    pub fn validate(&self) -> SimResult<()> {
        let counts = [
            ("n_leds", self.n_leds),
            ("n_samples", self.n_samples),
            ("n_machines", self.n_machines),
            ("height_draws", self.height_draws),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(SimError::InvalidParams(format!("{name} must be at least 1")));
            }
        }
        match self.total_points() {
            Some(n) if n <= MAX_POINTS => {}
            _ => {
                return Err(SimError::InvalidParams(format!(
                    "n_machines × n_leds × height_draws × n_samples exceeds {MAX_POINTS}"
                )));
            }
        }

        let finite = [
            ("led.blue_center_nm", self.led.blue_center_nm),
            ("led.phosphor_center_nm", self.led.phosphor_center_nm),
            ("object.center_nm", self.object.center_nm),
            ("object.height_mean", self.object.height_mean),
            ("camera.loc_nm", self.camera.loc_nm),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidParams(format!("{name} must be finite, got {value}")));
            }
        }

        let positive = [
            ("led.blue_width_nm", self.led.blue_width_nm),
            ("led.phosphor_width_nm", self.led.phosphor_width_nm),
            ("object.min_width_nm", self.object.min_width_nm),
            ("object.size", self.object.size),
            ("camera.scale_nm", self.camera.scale_nm),
            ("camera.absorbance", self.camera.absorbance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidParams(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("led.phosphor_ratio", self.led.phosphor_ratio),
            ("led.position_jitter_nm", self.led.position_jitter_nm),
            ("object.center_spread_nm", self.object.center_spread_nm),
            ("object.machine_height_spread", self.object.machine_height_spread),
            ("object.draw_height_spread", self.object.draw_height_spread),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidParams(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        // Width jitter is symmetric, so the narrowest lobe must stay positive.
        let half_jitter = self.led.width_jitter_nm / 2.0;
        let narrowest = self.led.blue_width_nm.min(self.led.phosphor_width_nm);
        if !(half_jitter >= 0.0 && half_jitter < narrowest) {
            return Err(SimError::InvalidParams(format!(
                "led.width_jitter_nm {} would make an LED lobe width non-positive",
                self.led.width_jitter_nm
            )));
        }

        if self.object.max_width_nm < self.object.min_width_nm {
            return Err(SimError::InvalidParams(format!(
                "object.max_width_nm {} is below object.min_width_nm {}",
                self.object.max_width_nm, self.object.min_width_nm
            )));
        }

        self.sensor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationParams::default().validate().unwrap();
    }

    #[test]
    fn partial_json_takes_defaults() {
        let params: SimulationParams =
            serde_json::from_str(r#"{ "n_leds": 5, "object": { "size": 3.0 } }"#).unwrap();
        assert_eq!(params.n_leds, 5);
        assert_eq!(params.n_samples, 30);
        assert_eq!(params.object.size, 3.0);
        assert_eq!(params.object.height_mean, 0.5);
        assert_eq!(params.camera.absorbance, 5.0);
    }

    #[test]
    fn rejects_zero_counts() {
        let params = SimulationParams {
            height_draws: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(SimError::InvalidParams(_))));
    }

    #[test]
    fn rejects_inverted_object_widths() {
        let mut params = SimulationParams::default();
        params.object.max_width_nm = 0.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_jitter_wider_than_lobe() {
        let mut params = SimulationParams::default();
        params.led.width_jitter_nm = 25.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_positions() {
        let mut params = SimulationParams::default();
        params.object.height_mean = f64::NAN;
        assert!(matches!(params.validate(), Err(SimError::InvalidParams(_))));

        let mut params = SimulationParams::default();
        params.camera.loc_nm = f64::INFINITY;
        assert!(params.validate().is_err());

        let mut params = SimulationParams::default();
        params.led.phosphor_center_nm = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_overflowing_point_count() {
        let params = SimulationParams {
            n_machines: usize::MAX,
            n_leds: 2,
            ..Default::default()
        };
        assert_eq!(params.total_points(), None);
        assert!(matches!(params.validate(), Err(SimError::InvalidParams(_))));

        let params = SimulationParams {
            n_samples: MAX_POINTS,
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert_eq!(SimulationParams::default().total_points(), Some(3 * 3 * 15 * 30));
    }

    #[test]
    fn json_file_round_trip() {
        let path =
            std::env::temp_dir().join(format!("led-chroma-params-{}.json", std::process::id()));
        let mut params = SimulationParams::default();
        params.seed = Some(7);
        params.camera.absorbance = 8.0;
        params.to_json_file(&path).unwrap();
        let back = SimulationParams::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, params);
    }
}
