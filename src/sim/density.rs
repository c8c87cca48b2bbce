//! Probability densities used to shape emission, reflectance and
//! sensitivity curves.

use std::f64::consts::PI;

use super::error::{SimError, SimResult};

fn check_scale(scale: f64) -> SimResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidWidth(scale))
    }
}

/// Gaussian density centred on `loc` with standard deviation `scale`.
pub fn normal_pdf(x: f64, loc: f64, scale: f64) -> SimResult<f64> {
    check_scale(scale)?;
    let z = (x - loc) / scale;
    Ok((-0.5 * z * z).exp() / (scale * (2.0 * PI).sqrt()))
}

/// Maxwell–Boltzmann density, shifted by `loc` and stretched by `scale`.
/// Zero for `x < loc`.
pub fn maxwell_pdf(x: f64, loc: f64, scale: f64) -> SimResult<f64> {
    check_scale(scale)?;
    let y = (x - loc) / scale;
    if y < 0.0 {
        return Ok(0.0);
    }
    Ok((2.0 / PI).sqrt() * y * y * (-0.5 * y * y).exp() / scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_peak_value() {
        let p = normal_pdf(460.0, 460.0, 10.0).unwrap();
        assert_relative_eq!(p, 1.0 / (10.0 * (2.0 * PI).sqrt()), epsilon = 1e-12);
    }

    #[test]
    fn normal_one_sigma() {
        let peak = normal_pdf(0.0, 0.0, 2.0).unwrap();
        let at_sigma = normal_pdf(2.0, 0.0, 2.0).unwrap();
        assert_relative_eq!(at_sigma / peak, (-0.5f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn maxwell_zero_below_loc() {
        assert_eq!(maxwell_pdf(349.0, 350.0, 200.0).unwrap(), 0.0);
        assert_eq!(maxwell_pdf(350.0, 350.0, 200.0).unwrap(), 0.0);
    }

    #[test]
    fn maxwell_mode_at_sqrt_two_scale() {
        let mode = 350.0 + 2f64.sqrt() * 200.0;
        let at_mode = maxwell_pdf(mode, 350.0, 200.0).unwrap();
        assert!(at_mode > maxwell_pdf(mode - 20.0, 350.0, 200.0).unwrap());
        assert!(at_mode > maxwell_pdf(mode + 20.0, 350.0, 200.0).unwrap());
    }

    #[test]
    fn rejects_bad_widths() {
        assert_eq!(normal_pdf(0.0, 0.0, 0.0), Err(SimError::InvalidWidth(0.0)));
        assert!(maxwell_pdf(0.0, 0.0, -1.0).is_err());
        assert!(normal_pdf(0.0, 0.0, f64::NAN).is_err());
    }
}
