use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LedChromaApp {
    pub state: AppState,
}

impl Default for LedChromaApp {
    fn default() -> Self {
        Self {
            state: AppState::with_initial_run(),
        }
    }
}

impl eframe::App for LedChromaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: parameters and filters ----
        egui::SidePanel::left("param_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Spectra => plot::spectra_view(ui, &self.state),
            View::Sensor => plot::sensor_view(ui, &self.state),
            View::Chromaticity => plot::chromaticity_plot(ui, &self.state),
            View::Clusters => table::cluster_table(ui, &self.state),
        });
    }
}
