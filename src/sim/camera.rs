use super::config::CameraParams;
use super::density::maxwell_pdf;
use super::error::SimResult;
use super::grid::WavelengthGrid;
use super::spectrum::Spectrum;

/// Reflectance of the black camera housing: a Maxwell-shaped curve whose peak
/// is `1 / absorbance`.
pub fn camera_reflectance(params: &CameraParams, grid: &WavelengthGrid) -> SimResult<Spectrum> {
    Spectrum::from_density(grid, |x| maxwell_pdf(x, params.loc_nm, params.scale_nm))?
        .normalized_to_peak(1.0 / params.absorbance, "camera reflectance")
}
