use std::f64::consts::FRAC_PI_2;

use super::grid::AngularGrid;
use super::sensor::angular_response;

/// Half-angle subtended by an object of `size` at `height` above the sensor.
/// An object at or below the sensor plane fills the whole hemisphere.
pub fn object_half_angle(size: f64, height: f64) -> f64 {
    if height <= 0.0 {
        FRAC_PI_2
    } else {
        (size / (2.0 * height)).atan()
    }
}

/// Lambertian weights of the light arriving from the object and from the
/// surrounding camera housing, which is modelled as an infinite sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularWeights {
    pub object: f64,
    pub camera: f64,
}

impl AngularWeights {
    /// Angles strictly inside `(-a, a)` see the object; angles strictly
    /// outside `[-a, a]` see the camera.
    pub fn for_half_angle(grid: &AngularGrid, half_angle: f64) -> Self {
        let mut object = 0.0;
        let mut camera = 0.0;
        for &theta in grid.angles() {
            if theta > -half_angle && theta < half_angle {
                object += angular_response(theta);
            } else if theta > half_angle || theta < -half_angle {
                camera += angular_response(theta);
            }
        }
        Self { object, camera }
    }

    pub fn for_object(grid: &AngularGrid, size: f64, height: f64) -> Self {
        Self::for_half_angle(grid, object_half_angle(size, height))
    }
}
