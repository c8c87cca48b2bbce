use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::camera::camera_reflectance;
use super::config::SimulationParams;
use super::error::{SimError, SimResult};
use super::flux::{sensor_flux, ChannelFlux};
use super::geometry::AngularWeights;
use super::grid::{AngularGrid, WavelengthGrid};
use super::led::{generate_leds, LedSpectrum};
use super::object::{generate_objects, ObjectReflectance};
use super::sensor::SensorCurves;
use super::spectrum::Spectrum;

// ---------------------------------------------------------------------------
// ChromaticityPoint – one sensor reading
// ---------------------------------------------------------------------------

/// One simulated sensor reading, kept flat so it maps to a CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaticityPoint {
    pub machine: usize,
    pub led: usize,
    pub draw: usize,
    pub object: usize,
    pub object_height: f64,
    pub red_flux: f64,
    pub green_flux: f64,
    pub blue_flux: f64,
    /// Red share of the total flux.
    pub r: f64,
    /// Green share of the total flux.
    pub g: f64,
}

impl ChromaticityPoint {
    pub fn flux(&self) -> ChannelFlux {
        ChannelFlux {
            red: self.red_flux,
            green: self.green_flux,
            blue: self.blue_flux,
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationRun – everything one run produced
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// Seed actually used, so the run can be repeated.
    pub seed: u64,
    pub params: SimulationParams,
    pub grid: WavelengthGrid,
    pub angles: AngularGrid,
    pub leds: Vec<LedSpectrum>,
    pub objects: Vec<ObjectReflectance>,
    pub camera: Spectrum,
    pub sensor: SensorCurves,
    /// Mean object height drawn for each machine.
    pub machine_heights: Vec<f64>,
    pub points: Vec<ChromaticityPoint>,
    /// Readings dropped because their total flux was zero.
    pub skipped: usize,
}

impl SimulationRun {
    /// Light reflected by `object` under `led`, as it reaches the sensor.
    pub fn reflected_by_object(&self, led: usize, object: usize) -> Spectrum {
        self.leds[led]
            .emission
            .product(&self.objects[object].reflectance)
    }

    /// Light reflected by the housing under `led`.
    pub fn reflected_by_camera(&self, led: usize) -> Spectrum {
        self.leds[led].emission.product(&self.camera)
    }
}

fn normal(mean: f64, std_dev: f64) -> SimResult<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| SimError::Distribution(e.to_string()))
}

/// Run the full Monte Carlo simulation.
pub fn run_simulation(params: &SimulationParams) -> SimResult<SimulationRun> {
    params.validate()?;

    let seed = params.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = StdRng::seed_from_u64(seed);
    log::info!(
        "Simulating {} machines x {} LEDs x {} draws x {} objects (seed {seed})",
        params.n_machines,
        params.n_leds,
        params.height_draws,
        params.n_samples
    );

    let grid = WavelengthGrid::default();
    let angles = AngularGrid::default();

    let leds = generate_leds(&params.led, &grid, params.n_leds, &mut rng)?;
    let objects = generate_objects(&params.object, &grid, params.n_samples, &mut rng)?;
    let camera = camera_reflectance(&params.camera, &grid)?;
    let sensor = SensorCurves::build(&params.sensor, &grid)?;

    let obj = &params.object;
    let machine_dist = normal(obj.height_mean, obj.machine_height_spread)?;

    let mut machine_heights = Vec::with_capacity(params.n_machines);
    let mut points = Vec::with_capacity(params.total_points().unwrap_or(0));
    let mut skipped = 0;

    for machine in 0..params.n_machines {
        let machine_height = machine_dist.sample(&mut rng);
        machine_heights.push(machine_height);
        let draw_dist = normal(machine_height, obj.draw_height_spread)?;

        for led in &leds {
            for draw in 0..params.height_draws {
                let object_height = draw_dist.sample(&mut rng);
                let weights = AngularWeights::for_object(&angles, obj.size, object_height);

                for object in &objects {
                    let flux = sensor_flux(
                        &sensor,
                        &led.emission,
                        &object.reflectance,
                        &camera,
                        weights,
                    );
                    let (r, g) = match flux.chromaticity() {
                        Ok(rg) => rg,
                        Err(e) => {
                            log::warn!(
                                "Skipping machine {machine} led {} draw {draw} object {}: {e}",
                                led.index,
                                object.index
                            );
                            skipped += 1;
                            continue;
                        }
                    };
                    points.push(ChromaticityPoint {
                        machine,
                        led: led.index,
                        draw,
                        object: object.index,
                        object_height,
                        red_flux: flux.red,
                        green_flux: flux.green,
                        blue_flux: flux.blue,
                        r,
                        g,
                    });
                }
            }
        }
    }

    log::info!("Simulation produced {} points ({skipped} skipped)", points.len());

    Ok(SimulationRun {
        seed,
        params: params.clone(),
        grid,
        angles,
        leds,
        objects,
        camera,
        sensor,
        machine_heights,
        points,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params(seed: u64) -> SimulationParams {
        SimulationParams {
            n_leds: 2,
            n_samples: 4,
            n_machines: 2,
            height_draws: 3,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn point_count_covers_every_combination() {
        let run = run_simulation(&small_params(1)).unwrap();
        assert_eq!(run.skipped, 0);
        assert_eq!(run.points.len(), 2 * 2 * 3 * 4);
        assert_eq!(run.machine_heights.len(), 2);
        assert_eq!(run.leds.len(), 2);
        assert_eq!(run.objects.len(), 4);
    }

    #[test]
    fn same_seed_same_run() {
        let a = run_simulation(&small_params(42)).unwrap();
        let b = run_simulation(&small_params(42)).unwrap();
        assert_eq!(a.points, b.points);
        assert_eq!(a.seed, 42);

        let c = run_simulation(&small_params(43)).unwrap();
        assert_ne!(a.points, c.points);
    }

    #[test]
    fn unseeded_run_records_its_seed() {
        let mut params = small_params(0);
        params.seed = None;
        let run = run_simulation(&params).unwrap();
        params.seed = Some(run.seed);
        let again = run_simulation(&params).unwrap();
        assert_eq!(run.points, again.points);
    }

    #[test]
    fn chromaticity_lies_in_the_simplex() {
        let run = run_simulation(&small_params(5)).unwrap();
        for p in &run.points {
            assert!(p.r >= 0.0 && p.g >= 0.0);
            assert!(p.r + p.g <= 1.0 + 1e-12);
            let (r, g) = p.flux().chromaticity().unwrap();
            assert_eq!((r, g), (p.r, p.g));
        }
    }

    #[test]
    fn reflected_light_never_exceeds_emission() {
        let run = run_simulation(&small_params(9)).unwrap();
        let led = &run.leds[0].emission;
        let reflected = run.reflected_by_object(0, 0);
        for (e, r) in led.values().iter().zip(reflected.values()) {
            assert!(*r <= *e + 1e-12);
        }
        assert!(run.reflected_by_camera(1).max() <= 0.2 * run.leds[1].emission.max() + 1e-12);
    }

    #[test]
    fn dark_readings_are_skipped_and_counted() {
        // LED light only near 1000 nm, narrow objects near 500 nm, and objects
        // below the sensor hide the housing: every reading sees zero flux.
        let mut params = small_params(3);
        params.led.blue_center_nm = 1000.0;
        params.led.blue_width_nm = 5.0;
        params.led.phosphor_center_nm = 1000.0;
        params.led.phosphor_width_nm = 5.0;
        params.led.phosphor_ratio = 0.0;
        params.led.position_jitter_nm = 0.0;
        params.led.width_jitter_nm = 0.0;
        params.object.center_spread_nm = 0.0;
        params.object.min_width_nm = 1.0;
        params.object.max_width_nm = 1.0;
        params.object.height_mean = -1.0;

        let run = run_simulation(&params).unwrap();
        assert!(run.points.is_empty());
        assert_eq!(run.skipped, 2 * 2 * 3 * 4);
    }

    #[test]
    fn non_finite_height_fails_before_sampling() {
        let mut params = small_params(1);
        params.object.height_mean = f64::NAN;
        assert!(matches!(run_simulation(&params), Err(SimError::InvalidParams(_))));
    }

    #[test]
    fn invalid_params_fail_before_sampling() {
        let params = SimulationParams {
            n_leds: 0,
            ..small_params(1)
        };
        assert!(matches!(run_simulation(&params), Err(SimError::InvalidParams(_))));
    }
}
