use super::error::{SimError, SimResult};
use super::grid::WavelengthGrid;

// ---------------------------------------------------------------------------
// Spectrum – intensity per wavelength sample
// ---------------------------------------------------------------------------

/// Intensity values sampled on a [`WavelengthGrid`]. All curves in a run share
/// the same grid, so elementwise operations assume equal lengths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum {
    values: Vec<f64>,
}

impl Spectrum {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Evaluate a fallible density at every grid wavelength.
    pub fn from_density(
        grid: &WavelengthGrid,
        density: impl Fn(f64) -> SimResult<f64>,
    ) -> SimResult<Self> {
        let values = grid
            .wavelengths()
            .iter()
            .map(|&wl| density(wl))
            .collect::<SimResult<Vec<f64>>>()?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Discrete integral: the plain sum over grid samples.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Rescale so that the maximum equals `peak`. `label` names the curve in
    /// the error when its maximum is zero or not finite.
    pub fn normalized_to_peak(&self, peak: f64, label: &'static str) -> SimResult<Self> {
        let max = self.max();
        if !max.is_finite() || max <= 0.0 {
            return Err(SimError::DegenerateCurve(label));
        }
        Ok(self.scaled(peak / max))
    }

    pub fn scaled(&self, k: f64) -> Self {
        Self {
            values: self.values.iter().map(|v| v * k).collect(),
        }
    }

    pub fn add(&self, other: &Spectrum) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    /// Elementwise product, e.g. emission × reflectance.
    pub fn product(&self, other: &Spectrum) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// `Σ self·a·b` without allocating intermediate curves.
    pub fn triple_product_sum(&self, a: &Spectrum, b: &Spectrum) -> f64 {
        self.values
            .iter()
            .zip(&a.values)
            .zip(&b.values)
            .map(|((s, a), b)| s * a * b)
            .sum()
    }

    /// `(wavelength, value)` pairs for plotting.
    pub fn points(&self, grid: &WavelengthGrid) -> Vec<[f64; 2]> {
        grid.wavelengths()
            .iter()
            .zip(&self.values)
            .map(|(&wl, &v)| [wl, v])
            .collect()
    }

    fn zip_with(&self, other: &Spectrum, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.len(), other.len(), "spectra on different grids");
        Self {
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::density::normal_pdf;
    use approx::assert_relative_eq;

    #[test]
    fn normalizes_to_requested_peak() {
        let grid = WavelengthGrid::default();
        let s = Spectrum::from_density(&grid, |x| normal_pdf(x, 500.0, 30.0)).unwrap();
        let n = s.normalized_to_peak(0.75, "test").unwrap();
        assert_relative_eq!(n.max(), 0.75, epsilon = 1e-12);
        assert!(n.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn zero_curve_cannot_be_normalized() {
        let s = Spectrum::new(vec![0.0; 10]);
        assert_eq!(
            s.normalized_to_peak(1.0, "flat"),
            Err(SimError::DegenerateCurve("flat"))
        );
    }

    #[test]
    fn elementwise_ops() {
        let a = Spectrum::new(vec![1.0, 2.0, 3.0]);
        let b = Spectrum::new(vec![0.5, 0.5, 2.0]);
        assert_eq!(a.add(&b).values(), &[1.5, 2.5, 5.0]);
        assert_eq!(a.product(&b).values(), &[0.5, 1.0, 6.0]);
        assert_eq!(a.product(&b).sum(), 7.5);
        assert_eq!(a.triple_product_sum(&b, &b), 0.25 + 0.5 + 12.0);
    }
}
