use rand::Rng;

use super::config::LedParams;
use super::density::normal_pdf;
use super::error::SimResult;
use super::grid::WavelengthGrid;
use super::spectrum::Spectrum;

/// One simulated white LED.
#[derive(Debug, Clone, PartialEq)]
pub struct LedSpectrum {
    pub index: usize,
    /// Shift applied to both lobes, nm.
    pub position_offset: f64,
    /// Widening applied to both lobes, nm.
    pub width_offset: f64,
    pub emission: Spectrum,
}

/// Emission for fixed offsets: a blue peak normalised to 1 plus a phosphor
/// tail normalised to `phosphor_ratio`.
pub fn led_emission(
    params: &LedParams,
    grid: &WavelengthGrid,
    position_offset: f64,
    width_offset: f64,
) -> SimResult<Spectrum> {
    let blue = Spectrum::from_density(grid, |x| {
        normal_pdf(
            x,
            params.blue_center_nm + position_offset,
            params.blue_width_nm + width_offset,
        )
    })?
    .normalized_to_peak(1.0, "LED blue emission")?;

    let phosphor = Spectrum::from_density(grid, |x| {
        normal_pdf(
            x,
            params.phosphor_center_nm + position_offset,
            params.phosphor_width_nm + width_offset,
        )
    })?
    .normalized_to_peak(1.0, "LED phosphorescence")?;

    Ok(blue.add(&phosphor.scaled(params.phosphor_ratio)))
}

/// Draw `n` LEDs with randomly perturbed position and width.
pub fn generate_leds<R: Rng>(
    params: &LedParams,
    grid: &WavelengthGrid,
    n: usize,
    rng: &mut R,
) -> SimResult<Vec<LedSpectrum>> {
    (0..n)
        .map(|index| {
            let position_offset = params.position_jitter_nm * (rng.random::<f64>() - 0.5);
            let width_offset = params.width_jitter_nm * (rng.random::<f64>() - 0.5);
            let emission = led_emission(params, grid, position_offset, width_offset)?;
            Ok(LedSpectrum {
                index,
                position_offset,
                width_offset,
                emission,
            })
        })
        .collect()
}
