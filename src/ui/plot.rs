use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, PlotUi, Points};

use led_chroma_sim::color::{machine_marker, Marker};
use led_chroma_sim::sim::sensor::angular_response;
use led_chroma_sim::sim::SimulationRun;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn no_run_message(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Imported points carry no spectra – press Run to simulate");
    });
}

/// Wavelength on x, intensity on y, framed to fixed ranges.
fn spectral_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    x_range: [f64; 2],
    height: f32,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Wavelength λ (nm)")
        .y_axis_label(y_label)
        .include_x(x_range[0])
        .include_x(x_range[1])
        .include_y(0.0)
        .include_y(1.5)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, add_contents);
}

fn panel_height(ui: &Ui, n: usize) -> f32 {
    (ui.available_height() / n as f32 - 28.0).max(80.0)
}

// ---------------------------------------------------------------------------
// Spectra view: LED, objects, camera, light at the sensor
// ---------------------------------------------------------------------------

pub fn spectra_view(ui: &mut Ui, state: &AppState) {
    let Some(run) = &state.run else {
        no_run_message(ui);
        return;
    };
    let h = panel_height(ui, 4);
    let visible_range = [350.0, 750.0];

    ui.strong("White LED spectrum");
    spectral_plot(ui, "led_plot", "Relative intensity", visible_range, h, |plot_ui| {
        for led in &run.leds {
            plot_ui.line(
                Line::new(PlotPoints::new(led.emission.points(&run.grid)))
                    .width(1.2)
                    .name(format!("LED {}", led.index)),
            );
        }
    });

    ui.strong("Sample reflectivity");
    spectral_plot(ui, "object_plot", "Reflectance", visible_range, h, |plot_ui| {
        for obj in &run.objects {
            plot_ui.line(
                Line::new(PlotPoints::new(obj.reflectance.points(&run.grid)))
                    .width(1.2)
                    .color(state.object_color(obj.index))
                    .name(format!("object {}", obj.index)),
            );
        }
    });

    ui.strong("Black camera reflectivity");
    spectral_plot(ui, "camera_plot", "Reflectance", visible_range, h, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::new(run.camera.points(&run.grid)))
                .width(1.2)
                .color(Color32::DARK_GRAY)
                .name("camera"),
        );
    });

    ui.strong("Reflected intensity arriving at the sensor");
    spectral_plot(ui, "reflected_plot", "Intensity", visible_range, h, |plot_ui| {
        reflected_lines(plot_ui, run, state);
    });
}

fn reflected_lines(plot_ui: &mut PlotUi, run: &SimulationRun, state: &AppState) {
    for led in &run.leds {
        if !state.filter.leds.contains(&led.index) {
            continue;
        }
        for obj in &run.objects {
            let reflected = run.reflected_by_object(led.index, obj.index);
            plot_ui.line(
                Line::new(PlotPoints::new(reflected.points(&run.grid)))
                    .width(1.2)
                    .color(state.object_color(obj.index)),
            );
        }
        let housing = run.reflected_by_camera(led.index);
        plot_ui.line(
            Line::new(PlotPoints::new(housing.points(&run.grid)))
                .width(1.2)
                .color(Color32::DARK_GRAY)
                .name(format!("camera, LED {}", led.index)),
        );
    }
}

// ---------------------------------------------------------------------------
// Sensor view: channel sensitivities and angular response
// ---------------------------------------------------------------------------

pub fn sensor_view(ui: &mut Ui, state: &AppState) {
    let Some(run) = &state.run else {
        no_run_message(ui);
        return;
    };
    let h = panel_height(ui, 2);

    ui.strong("Sensor sensitivity for RGB");
    spectral_plot(ui, "sensor_plot", "Sensitivity", [350.0, 1000.0], h, |plot_ui| {
        let channels = [
            (&run.sensor.blue, Color32::from_rgb(40, 80, 230), "blue"),
            (&run.sensor.green, Color32::from_rgb(30, 170, 60), "green"),
            (&run.sensor.red, Color32::from_rgb(220, 40, 40), "red"),
        ];
        for (curve, color, name) in channels {
            plot_ui.line(
                Line::new(PlotPoints::new(curve.points(&run.grid)))
                    .width(1.2)
                    .color(color)
                    .name(name),
            );
        }
    });

    ui.strong("Angular response of the sensor");
    Plot::new("angular_plot")
        .height(h)
        .x_axis_label("Incoming angle (rad)")
        .y_axis_label("Intensity")
        .include_x(run.angles.angles()[0])
        .include_x(run.angles.angles()[run.angles.angles().len() - 1])
        .include_y(0.0)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            let points: PlotPoints = run
                .angles
                .angles()
                .iter()
                .map(|&a| [a, angular_response(a)])
                .collect();
            plot_ui.line(Line::new(points).name("cos θ").width(1.5));
        });
}

// ---------------------------------------------------------------------------
// Chromaticity scatter
// ---------------------------------------------------------------------------

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Circle => MarkerShape::Circle,
        Marker::Plus => MarkerShape::Plus,
        Marker::Cross => MarkerShape::Cross,
    }
}

/// Scatter of red vs green share, one colour per object, one marker per machine.
pub fn chromaticity_plot(ui: &mut Ui, state: &AppState) {
    if state.record.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No points – press Run or open a saved run  (File → Open…)");
        });
        return;
    }

    // One series per (machine, object) keeps the draw calls small.
    let mut series: BTreeMap<(usize, usize), Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let p = &state.record.points[idx];
        series.entry((p.machine, p.object)).or_default().push([p.r, p.g]);
    }

    Plot::new("chromaticity_plot")
        .legend(Legend::default())
        .x_axis_label("r = R / (R+G+B)")
        .y_axis_label("g = G / (R+G+B)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for ((machine, object), pts) in series {
                plot_ui.points(
                    Points::new(PlotPoints::new(pts))
                        .shape(marker_shape(machine_marker(machine)))
                        .radius(3.0)
                        .filled(false)
                        .color(state.object_color(object))
                        .name(format!("object {object}")),
                );
            }
        });
}
