use super::error::{SimError, SimResult};
use super::geometry::AngularWeights;
use super::sensor::{Channel, SensorCurves};
use super::spectrum::Spectrum;

/// Integrated output of the three photodiode channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelFlux {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelFlux {
    pub fn total(&self) -> f64 {
        self.red + self.green + self.blue
    }

    /// Red and green shares of the total flux.
    pub fn chromaticity(&self) -> SimResult<(f64, f64)> {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(SimError::DegenerateFlux(total));
        }
        Ok((self.red / total, self.green / total))
    }
}

/// Flux seen by one channel: light reflected by the object weighted by its
/// solid angle, plus light reflected by the housing around it.
pub fn channel_flux(
    sensitivity: &Spectrum,
    led: &Spectrum,
    object: &Spectrum,
    camera: &Spectrum,
    weights: AngularWeights,
) -> f64 {
    let from_object = sensitivity.triple_product_sum(object, led) * weights.object;
    let from_camera = sensitivity.triple_product_sum(camera, led) * weights.camera;
    from_object + from_camera
}

/// Flux for all three channels.
pub fn sensor_flux(
    sensor: &SensorCurves,
    led: &Spectrum,
    object: &Spectrum,
    camera: &Spectrum,
    weights: AngularWeights,
) -> ChannelFlux {
    let flux = |channel| channel_flux(sensor.get(channel), led, object, camera, weights);
    ChannelFlux {
        red: flux(Channel::Red),
        green: flux(Channel::Green),
        blue: flux(Channel::Blue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn chromaticity_shares() {
        let f = ChannelFlux {
            red: 2.0,
            green: 1.0,
            blue: 1.0,
        };
        let (r, g) = f.chromaticity().unwrap();
        assert_relative_eq!(r, 0.5);
        assert_relative_eq!(g, 0.25);
    }

    #[test]
    fn zero_flux_has_no_chromaticity() {
        let f = ChannelFlux {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
        };
        assert_eq!(f.chromaticity(), Err(SimError::DegenerateFlux(0.0)));
    }

    #[test]
    fn channel_flux_combines_object_and_camera() {
        let sens = Spectrum::new(vec![1.0, 2.0]);
        let led = Spectrum::new(vec![1.0, 1.0]);
        let obj = Spectrum::new(vec![0.5, 0.0]);
        let cam = Spectrum::new(vec![0.1, 0.1]);
        let weights = AngularWeights {
            object: 10.0,
            camera: 2.0,
        };
        // object: (0.5) * 10 = 5; camera: (0.1 + 0.2) * 2 = 0.6
        assert_relative_eq!(channel_flux(&sens, &led, &obj, &cam, weights), 5.6, epsilon = 1e-12);
    }
}
