use rand::Rng;

use super::config::ObjectParams;
use super::density::normal_pdf;
use super::error::SimResult;
use super::grid::WavelengthGrid;
use super::spectrum::Spectrum;

/// Reflectance of one coloured object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectReflectance {
    pub index: usize,
    pub center_nm: f64,
    pub width_nm: f64,
    pub reflectance: Spectrum,
}

/// Gaussian reflectance with unit peak.
pub fn reflectance_curve(
    grid: &WavelengthGrid,
    center_nm: f64,
    width_nm: f64,
) -> SimResult<Spectrum> {
    Spectrum::from_density(grid, |x| normal_pdf(x, center_nm, width_nm))?
        .normalized_to_peak(1.0, "object reflectance")
}

/// Draw `n` objects with random reflectance centre and width.
pub fn generate_objects<R: Rng>(
    params: &ObjectParams,
    grid: &WavelengthGrid,
    n: usize,
    rng: &mut R,
) -> SimResult<Vec<ObjectReflectance>> {
    (0..n)
        .map(|index| {
            let offset = params.center_spread_nm * (rng.random::<f64>() - 0.5);
            let center_nm = params.center_nm + offset;
            let width_nm = params.min_width_nm
                + (params.max_width_nm - params.min_width_nm) * rng.random::<f64>();
            let reflectance = reflectance_curve(grid, center_nm, width_nm)?;
            Ok(ObjectReflectance {
                index,
                center_nm,
                width_nm,
                reflectance,
            })
        })
        .collect()
}
