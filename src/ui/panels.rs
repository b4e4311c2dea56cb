use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::dashboard::{Frame, ReadyFrame};
use crate::data::loader::Upload;
use crate::params::{Tab, ViewParams};
use crate::state::AppState;

pub const CAPTION: &str =
    "Tip: Use the legend to hide/show traces and the range slider on histograms to zoom.";

// ---------------------------------------------------------------------------
// Left side panel – uploader and dataset summary
// ---------------------------------------------------------------------------

/// Render the sidebar: upload controls, then a summary of the loaded data.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Load data");
    ui.separator();

    ui.label("Upload CSV (daily data)");
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            open_file_dialog(state);
        }
        if state.upload.is_some() && ui.small_button("Clear").clicked() {
            state.clear_upload();
        }
    });
    ui.weak("…or drop a .csv file onto the window.");

    let Some(upload) = &state.upload else {
        return;
    };
    ui.add_space(6.0);
    ui.label(RichText::new(upload.name.as_str()).strong());
    ui.weak(format!("{} bytes", upload.bytes.len()));

    let Ok(Frame::Ready(frame)) = &state.frame else {
        return;
    };
    ui.separator();
    dataset_summary(ui, frame);
}

fn dataset_summary(ui: &mut Ui, frame: &ReadyFrame) {
    ui.label(format!(
        "{} rows · {} columns · {} numeric",
        frame.n_rows,
        frame.columns.len(),
        frame.numeric_columns.len()
    ));

    egui::CollapsingHeader::new(RichText::new("Columns").strong())
        .id_salt("columns")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("column_grid")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for col in &frame.columns {
                        ui.label(col.name.as_str());
                        ui.weak(col.kind.to_string());
                        ui.weak(format!("{} / {}", col.non_null, frame.n_rows));
                        ui.end_row();
                    }
                });
        });

    egui::CollapsingHeader::new(RichText::new("Preview").strong())
        .id_salt("preview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            preview_table(ui, frame);
        });
}

fn preview_table(ui: &mut Ui, frame: &ReadyFrame) {
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(320.0)
            .columns(Column::auto().at_least(48.0), frame.columns.len())
            .header(20.0, |mut header| {
                for col in &frame.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, frame.preview.len(), |mut row| {
                    let cells = &frame.preview[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
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
            if ui
                .add_enabled(state.upload.is_some(), egui::Button::new("Close"))
                .clicked()
            {
                state.clear_upload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Interactive EDA: Heatmap • Scatter • Histogram");

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Tabs and footer
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, params: &mut ViewParams) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut params.tab, tab, tab.label());
        }
    });
}

pub fn footer(ui: &mut Ui) {
    ui.weak(CAPTION);
}

// ---------------------------------------------------------------------------
// File intake
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

/// Accept the first file dropped onto the window this frame.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.into_iter().next() else {
        return;
    };

    if let Some(bytes) = file.bytes {
        state.set_upload(Upload::from_bytes(file.name, bytes.to_vec()));
    } else if let Some(path) = file.path {
        state.load_path(&path);
    }
}

/// Overlay shown while a file hovers over the window.
pub fn drop_hint(ctx: &egui::Context) {
    if ctx.input(|i| i.raw.hovered_files.is_empty()) {
        return;
    }
    egui::Area::new(egui::Id::new("drop_hint"))
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui: &mut Ui| {
            ui.heading("Drop a CSV file to load it");
        });
}
