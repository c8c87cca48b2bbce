use serde::{Deserialize, Serialize};

use super::density::normal_pdf;
use super::error::{SimError, SimResult};
use super::grid::WavelengthGrid;
use super::spectrum::Spectrum;

// ---------------------------------------------------------------------------
// Photodiode channel model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

/// A Gaussian sensitivity lobe with its peak height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lobe {
    pub center_nm: f64,
    pub width_nm: f64,
    pub peak: f64,
}

impl Lobe {
    pub const fn new(center_nm: f64, width_nm: f64, peak: f64) -> Self {
        Self {
            center_nm,
            width_nm,
            peak,
        }
    }

    fn curve(&self, grid: &WavelengthGrid, label: &'static str) -> SimResult<Spectrum> {
        Spectrum::from_density(grid, |x| normal_pdf(x, self.center_nm, self.width_nm))?
            .normalized_to_peak(self.peak, label)
    }
}

/// One colour channel: the main band plus a parasitic UV or IR lobe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorChannel {
    pub primary: Lobe,
    pub secondary: Lobe,
}

/// Tri-channel photodiode. The default follows the TAOS 3210 datasheet curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorModel {
    pub red: SensorChannel,
    pub green: SensorChannel,
    pub blue: SensorChannel,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self {
            red: SensorChannel {
                primary: Lobe::new(730.0, 100.0, 1.0),
                secondary: Lobe::new(400.0, 10.0, 0.2),
            },
            green: SensorChannel {
                primary: Lobe::new(524.0, 50.0, 0.55),
                secondary: Lobe::new(850.0, 10.0, 0.75),
            },
            blue: SensorChannel {
                primary: Lobe::new(470.0, 75.0, 0.47),
                secondary: Lobe::new(840.0, 13.0, 0.85),
            },
        }
    }
}

impl SensorModel {
    pub fn channel(&self, channel: Channel) -> &SensorChannel {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut SensorChannel {
        match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        }
    }

    /// Sensitivity of `channel` sampled on `grid`.
    pub fn sensitivity(&self, channel: Channel, grid: &WavelengthGrid) -> SimResult<Spectrum> {
        let ch = self.channel(channel);
        let primary = ch.primary.curve(grid, "sensor primary lobe")?;
        let secondary = ch.secondary.curve(grid, "sensor secondary lobe")?;
        Ok(primary.add(&secondary))
    }

    pub fn validate(&self) -> SimResult<()> {
        for channel in Channel::ALL {
            let ch = self.channel(channel);
            for lobe in [ch.primary, ch.secondary] {
                if !(lobe.width_nm.is_finite() && lobe.width_nm > 0.0) {
                    return Err(SimError::InvalidParams(format!(
                        "sensor.{} lobe width must be positive, got {}",
                        channel.label(),
                        lobe.width_nm
                    )));
                }
                if !(lobe.peak.is_finite() && lobe.peak > 0.0) {
                    return Err(SimError::InvalidParams(format!(
                        "sensor.{} lobe peak must be positive, got {}",
                        channel.label(),
                        lobe.peak
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Sensitivity curves for all three channels on one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorCurves {
    pub red: Spectrum,
    pub green: Spectrum,
    pub blue: Spectrum,
}

impl SensorCurves {
    pub fn build(model: &SensorModel, grid: &WavelengthGrid) -> SimResult<Self> {
        Ok(Self {
            red: model.sensitivity(Channel::Red, grid)?,
            green: model.sensitivity(Channel::Green, grid)?,
            blue: model.sensitivity(Channel::Blue, grid)?,
        })
    }

    pub fn get(&self, channel: Channel) -> &Spectrum {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }
}

/// Lambertian cosine response of the sensor to light arriving at `angle`.
pub fn angular_response(angle: f64) -> f64 {
    angle.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn value_at(grid: &WavelengthGrid, s: &Spectrum, nm: f64) -> f64 {
        let idx = grid
            .wavelengths()
            .iter()
            .position(|&w| w >= nm)
            .unwrap();
        s.values()[idx]
    }

    #[test]
    fn red_channel_has_uv_lobe() {
        let grid = WavelengthGrid::default();
        let red = SensorModel::default().sensitivity(Channel::Red, &grid).unwrap();
        let uv = value_at(&grid, &red, 400.0);
        assert!(uv > 0.18 && uv < 0.25, "uv lobe {uv}");
        assert_relative_eq!(value_at(&grid, &red, 730.0), 1.0, epsilon = 0.01);
    }

    #[test]
    fn infrared_lobes_dominate_green_and_blue_peaks() {
        let grid = WavelengthGrid::default();
        let model = SensorModel::default();
        let green = model.sensitivity(Channel::Green, &grid).unwrap();
        let blue = model.sensitivity(Channel::Blue, &grid).unwrap();
        assert!(value_at(&grid, &green, 850.0) > value_at(&grid, &green, 524.0));
        assert!(value_at(&grid, &blue, 840.0) > value_at(&grid, &blue, 470.0));
    }

    #[test]
    fn lambertian_response() {
        assert_eq!(angular_response(0.0), 1.0);
        assert!(angular_response(1.57) < 1e-3);
    }

    #[test]
    fn rejects_zero_width_lobe() {
        let mut model = SensorModel::default();
        model.channel_mut(Channel::Blue).secondary.width_nm = 0.0;
        assert!(model.validate().is_err());
    }
}
