// ---------------------------------------------------------------------------
// Wavelength grid
// ---------------------------------------------------------------------------

/// Evenly spaced wavelength samples, endpoints included.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthGrid {
    wavelengths: Vec<f64>,
}

impl Default for WavelengthGrid {
    /// 1000 samples over 0–1000 nm.
    fn default() -> Self {
        Self::new(0.0, 1000.0, 1000)
    }
}

impl WavelengthGrid {
    pub fn new(start_nm: f64, end_nm: f64, n: usize) -> Self {
        Self {
            wavelengths: linspace(start_nm, end_nm, n),
        }
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }
}

// ---------------------------------------------------------------------------
// Angular grid (sensor field of view)
// ---------------------------------------------------------------------------

/// Half-range of the sensor's field of view in radians.
pub const FIELD_OF_VIEW_HALF_RAD: f64 = 1.57;

/// Incoming angles sampled across the sensor's field of view.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularGrid {
    angles: Vec<f64>,
}

impl Default for AngularGrid {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl AngularGrid {
    pub fn new(n: usize) -> Self {
        Self {
            angles: linspace(-FIELD_OF_VIEW_HALF_RAD, FIELD_OF_VIEW_HALF_RAD, n),
        }
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }
}

/// `n` evenly spaced values over `[start, end]`, like numpy's `linspace`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
