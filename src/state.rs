use std::path::Path;

use eframe::egui::Color32;

use led_chroma_sim::color::rainbow;
use led_chroma_sim::data::filter::{filtered_indices, PointFilter};
use led_chroma_sim::data::loader::load_file;
use led_chroma_sim::data::model::RunRecord;
use led_chroma_sim::data::writer::save_file;
use led_chroma_sim::sim::analysis::{cluster_summaries, separability, ClusterSummary};
use led_chroma_sim::sim::{run_simulation, SimulationParams, SimulationRun};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which plot the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Spectra,
    Sensor,
    Chromaticity,
    Clusters,
}

impl View {
    pub const ALL: [View; 4] = [View::Spectra, View::Sensor, View::Chromaticity, View::Clusters];

    pub fn label(self) -> &'static str {
        match self {
            View::Spectra => "Spectra",
            View::Sensor => "Sensor",
            View::Chromaticity => "Chromaticity",
            View::Clusters => "Clusters",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Parameters edited in the side panel; used by the next run.
    pub params: SimulationParams,

    /// Last simulation, with every curve. None for imported point sets.
    pub run: Option<SimulationRun>,

    /// Points on display, simulated or imported.
    pub record: RunRecord,

    /// Machine / LED selection.
    pub filter: PointFilter,

    /// Indices of points passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// One colour per object.
    pub object_colors: Vec<Color32>,

    /// Per-object clusters of the visible points.
    pub clusters: Vec<ClusterSummary>,
    pub separability: Option<f64>,

    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            params: SimulationParams::default(),
            run: None,
            record: RunRecord::default(),
            filter: PointFilter::default(),
            visible_indices: Vec::new(),
            object_colors: Vec::new(),
            clusters: Vec::new(),
            separability: None,
            view: View::Chromaticity,
            status_message: None,
        }
    }
}

impl AppState {
    /// State with a first run already on screen.
    pub fn with_initial_run() -> Self {
        let mut state = Self::default();
        state.simulate();
        state
    }

    /// Run the simulation with the current parameters.
    pub fn simulate(&mut self) {
        match run_simulation(&self.params) {
            Ok(run) => {
                log::info!("Run finished: {} points, seed {}", run.points.len(), run.seed);
                self.set_run(run);
            }
            Err(e) => {
                log::error!("Simulation failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Draw a fresh seed and run again.
    pub fn simulate_with_new_seed(&mut self) {
        self.params.seed = Some(rand::random());
        self.simulate();
    }

    /// Ingest a finished run; its seed is pinned so edits re-run the same draw.
    pub fn set_run(&mut self, run: SimulationRun) {
        self.params.seed = Some(run.seed);
        let record = RunRecord::from_run(&run);
        self.run = Some(run);
        self.set_points(record);
    }

    fn set_points(&mut self, record: RunRecord) {
        self.filter = PointFilter::all(&record);
        self.object_colors = rainbow(record.object_count())
            .into_iter()
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .collect();
        self.record = record;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and cluster statistics after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.record.points, &self.filter);
        self.clusters = cluster_summaries(
            self.visible_indices
                .iter()
                .map(|&i| &self.record.points[i]),
        );
        self.separability = separability(&self.clusters);
    }

    pub fn object_color(&self, object: usize) -> Color32 {
        self.object_colors
            .get(object)
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    pub fn toggle_machine(&mut self, machine: usize) {
        self.filter.toggle_machine(machine);
        self.refilter();
    }

    pub fn toggle_led(&mut self, led: usize) {
        self.filter.toggle_led(led);
        self.refilter();
    }

    pub fn select_all_machines(&mut self) {
        self.filter.machines = self.record.machines();
        self.refilter();
    }

    pub fn select_no_machines(&mut self) {
        self.filter.machines.clear();
        self.refilter();
    }

    pub fn select_all_leds(&mut self) {
        self.filter.leds = self.record.leds();
        self.refilter();
    }

    pub fn select_no_leds(&mut self) {
        self.filter.leds.clear();
        self.refilter();
    }

    /// Open a parameter file or a saved run. A JSON file with parameters but
    /// no points is simulated right away.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(record) => {
                log::info!("Loaded {} points from {}", record.len(), path.display());
                if let Some(params) = record.params.clone() {
                    self.params = params;
                }
                if record.is_empty() && record.params.is_some() {
                    self.simulate();
                } else {
                    self.run = None;
                    self.set_points(record);
                }
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the points on display (format chosen by extension).
    pub fn export(&mut self, path: &Path) {
        if let Err(e) = save_file(path, &self.record) {
            log::error!("Failed to export: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        } else {
            self.status_message = Some(format!("Exported to {}", path.display()));
        }
    }
}
