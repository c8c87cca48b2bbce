/// Numerical model: spectra, geometry and the Monte Carlo driver.
///
/// Pipeline:
/// ```text
///   led ──┐
///  object ┼─► spectrum products ─► flux (× sensor, × angular weights)
///  camera ┘                              │
///                                        ▼
///                              run: chromaticity points ─► analysis
/// ```

pub mod analysis;
pub mod camera;
pub mod config;
pub mod density;
pub mod error;
pub mod flux;
pub mod geometry;
pub mod grid;
pub mod led;
pub mod object;
pub mod run;
pub mod sensor;
pub mod spectrum;

pub use config::SimulationParams;
pub use error::SimError;
pub use run::{run_simulation, ChromaticityPoint, SimulationRun};
