use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use led_chroma_sim::sim::sensor::{Channel, Lobe};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – parameters and filters
// ---------------------------------------------------------------------------

/// Render the left panel: simulation parameters, then machine / LED filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Parameters");
            ui.separator();
            parameter_editors(ui, state);

            ui.add_space(8.0);
            if ui.button("Run").clicked() {
                state.simulate();
            }

            ui.add_space(8.0);
            ui.heading("Filters");
            ui.separator();
            filter_widgets(ui, state);

            ui.add_space(8.0);
            object_legend(ui, state);
        });
}

fn labeled<T: egui::emath::Numeric>(ui: &mut Ui, label: &str, value: &mut T, speed: f64) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(DragValue::new(value).speed(speed));
    });
}

fn lobe_editor(ui: &mut Ui, label: &str, lobe: &mut Lobe) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(DragValue::new(&mut lobe.center_nm).speed(1.0).suffix(" nm"));
        ui.add(DragValue::new(&mut lobe.width_nm).speed(0.5).range(0.1..=500.0).suffix(" σ"));
        ui.add(DragValue::new(&mut lobe.peak).speed(0.01).range(0.01..=2.0));
    });
}

fn parameter_editors(ui: &mut Ui, state: &mut AppState) {
    let p = &mut state.params;

    egui::CollapsingHeader::new(RichText::new("Monte Carlo").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("LEDs");
                ui.add(DragValue::new(&mut p.n_leds).range(1..=20));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Objects");
                ui.add(DragValue::new(&mut p.n_samples).range(1..=200));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Machines");
                ui.add(DragValue::new(&mut p.n_machines).range(1..=12));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Height draws");
                ui.add(DragValue::new(&mut p.height_draws).range(1..=100));
            });
            ui.horizontal(|ui: &mut Ui| {
                let seed = p.seed.map_or_else(|| "random".to_string(), |s| s.to_string());
                ui.label(format!("Seed: {seed}"));
            });
        });

    egui::CollapsingHeader::new(RichText::new("LED").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let led = &mut p.led;
            labeled(ui, "Blue centre (nm)", &mut led.blue_center_nm, 1.0);
            labeled(ui, "Blue width (nm)", &mut led.blue_width_nm, 0.5);
            labeled(ui, "Phosphor centre (nm)", &mut led.phosphor_center_nm, 1.0);
            labeled(ui, "Phosphor width (nm)", &mut led.phosphor_width_nm, 0.5);
            labeled(ui, "Phosphor ratio", &mut led.phosphor_ratio, 0.01);
            labeled(ui, "Position jitter (nm)", &mut led.position_jitter_nm, 0.1);
            labeled(ui, "Width jitter (nm)", &mut led.width_jitter_nm, 0.1);
        });

    egui::CollapsingHeader::new(RichText::new("Objects").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let obj = &mut p.object;
            labeled(ui, "Centre (nm)", &mut obj.center_nm, 1.0);
            labeled(ui, "Centre spread (nm)", &mut obj.center_spread_nm, 1.0);
            labeled(ui, "Min width (nm)", &mut obj.min_width_nm, 0.5);
            labeled(ui, "Max width (nm)", &mut obj.max_width_nm, 0.5);
            labeled(ui, "Size", &mut obj.size, 0.05);
            labeled(ui, "Height mean", &mut obj.height_mean, 0.01);
            labeled(ui, "Machine spread", &mut obj.machine_height_spread, 0.001);
            labeled(ui, "Draw spread", &mut obj.draw_height_spread, 0.001);
        });

    egui::CollapsingHeader::new(RichText::new("Camera").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let cam = &mut p.camera;
            labeled(ui, "Origin (nm)", &mut cam.loc_nm, 1.0);
            labeled(ui, "Scale (nm)", &mut cam.scale_nm, 1.0);
            labeled(ui, "Absorbance", &mut cam.absorbance, 0.1);
        });

    egui::CollapsingHeader::new(RichText::new("Sensor").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for channel in Channel::ALL {
                let ch = p.sensor.channel_mut(channel);
                ui.strong(channel.label());
                lobe_editor(ui, "main", &mut ch.primary);
                lobe_editor(ui, "side", &mut ch.secondary);
            }
        });
}

fn filter_widgets(ui: &mut Ui, state: &mut AppState) {
    let machines = state.record.machines();
    let leds = state.record.leds();

    let header = format!("Machines  ({}/{})", state.filter.machines.len(), machines.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("machine_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_machines();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_machines();
                }
            });
            for machine in &machines {
                let mut checked = state.filter.machines.contains(machine);
                let marker = led_chroma_sim::color::machine_marker(*machine).symbol();
                if ui
                    .checkbox(&mut checked, format!("machine {machine}  ({marker})"))
                    .changed()
                {
                    state.toggle_machine(*machine);
                }
            }
        });

    let header = format!("LEDs  ({}/{})", state.filter.leds.len(), leds.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("led_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_leds();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_leds();
                }
            });
            for led in &leds {
                let mut checked = state.filter.leds.contains(led);
                if ui.checkbox(&mut checked, format!("LED {led}")).changed() {
                    state.toggle_led(*led);
                }
            }
        });
}

fn object_legend(ui: &mut Ui, state: &AppState) {
    let Some(run) = &state.run else {
        return;
    };
    egui::CollapsingHeader::new(RichText::new("Objects").strong())
        .id_salt("object_legend")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for obj in &run.objects {
                let text = format!(
                    "object {}  {:.0} nm  σ {:.1}",
                    obj.index, obj.center_nm, obj.width_nm
                );
                ui.label(RichText::new(text).color(state.object_color(obj.index)));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save parameters…").clicked() {
                save_params_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Run").clicked() {
            state.simulate();
        }
        if ui.button("New seed").clicked() {
            state.simulate_with_new_seed();
        }

        ui.separator();

        for view in View::ALL {
            ui.selectable_value(&mut state.view, view, view.label());
        }

        ui.separator();

        ui.label(format!(
            "{} points, {} visible",
            state.record.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open parameters or a saved run")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chromaticity points")
        .set_file_name("chromaticity.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON run record", &["json"])
        .add_filter("Parquet", &["parquet"])
        .add_filter("PNG image", &["png"])
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}

pub fn save_params_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save simulation parameters")
        .set_file_name("params.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.params.to_json_file(&path) {
            Ok(()) => {
                log::info!("Saved parameters to {}", path.display());
                state.status_message = Some(format!("Saved parameters to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save parameters: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
