use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Cluster table (central panel)
// ---------------------------------------------------------------------------

/// Per-object centroid and spread of the visible points.
pub fn cluster_table(ui: &mut Ui, state: &AppState) {
    if state.clusters.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No visible points");
        });
        return;
    }

    let summary = match state.separability {
        Some(s) if s.is_finite() => {
            format!("Separability (min centroid distance / max spread): {s:.2}")
        }
        Some(_) => "Separability: clusters have no spread".to_string(),
        None => "Separability needs at least two objects".to_string(),
    };
    ui.label(RichText::new(summary).strong());
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .columns(Column::remainder(), 4)
        .header(20.0, |mut header| {
            for title in ["Object", "Points", "r", "g", "Spread"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.clusters.len(), |mut row| {
                let c = &state.clusters[row.index()];
                row.col(|ui: &mut Ui| {
                    let name = RichText::new(format!("object {}", c.object));
                    ui.label(name.color(state.object_color(c.object)));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(c.count.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", c.centroid[0]));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", c.centroid[1]));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.5}", c.spread));
                });
            });
        });
}
