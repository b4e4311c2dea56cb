use eframe::egui::{self, Ui};

use crate::params::{ResolvedParams, SliderBounds, ViewParams};

// ---------------------------------------------------------------------------
// Per-tab widgets
// ---------------------------------------------------------------------------
//
// Widgets show the resolved values of the last rerun and write the user's
// choice back into `ViewParams`; the next refresh picks the change up.

/// Multiselect of numeric columns for the correlation heatmap.
pub fn heatmap_controls(
    ui: &mut Ui,
    params: &mut ViewParams,
    resolved: &ResolvedParams,
    numeric: &[String],
) {
    ui.label("Pick numeric columns");
    let mut selected = resolved.heatmap_columns.clone();
    let mut changed = false;

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for col in numeric {
            let mut checked = selected.contains(col);
            if ui.checkbox(&mut checked, col.as_str()).changed() {
                if checked {
                    selected.push(col.clone());
                } else {
                    selected.retain(|c| c != col);
                }
                changed = true;
            }
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            selected = numeric.to_vec();
            changed = true;
        }
        if ui.small_button("None").clicked() {
            selected.clear();
            changed = true;
        }
    });

    if changed {
        params.heatmap.selected = Some(selected);
    }
}

/// X / Y selectors and the sample size slider.
pub fn scatter_controls(
    ui: &mut Ui,
    params: &mut ViewParams,
    resolved: &ResolvedParams,
    numeric: &[String],
) {
    ui.columns(3, |cols| {
        let mut x = resolved.scatter_x.clone();
        if column_selector(&mut cols[0], "scatter_x", "X", &mut x, numeric) {
            params.scatter.x = Some(x);
        }

        let mut y = resolved.scatter_y.clone();
        if column_selector(&mut cols[1], "scatter_y", "Y", &mut y, numeric) {
            params.scatter.y = Some(y);
        }

        let bounds = resolved.sample_bounds;
        let mut n = resolved.sample_size;
        if stepped_slider(&mut cols[2], "Sample (rows)", &mut n, bounds) {
            params.scatter.sample_size = Some(n);
        }
    });
}

/// Column selector and bin count slider.
pub fn histogram_controls(
    ui: &mut Ui,
    params: &mut ViewParams,
    resolved: &ResolvedParams,
    numeric: &[String],
) {
    ui.columns(2, |cols| {
        let mut col = resolved.histogram_column.clone();
        if column_selector(&mut cols[0], "histogram_column", "Column", &mut col, numeric) {
            params.histogram.column = Some(col);
        }

        let mut bins = resolved.bins;
        if stepped_slider(&mut cols[1], "Bins", &mut bins, resolved.bins_bounds) {
            params.histogram.bins = Some(bins);
        }
    });
}

/// Labelled combo box over `options`. Returns whether the choice changed.
fn column_selector(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut String,
    options: &[String],
) -> bool {
    let before = current.clone();
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                ui.selectable_value(current, opt.clone(), opt.as_str());
            }
        });
    *current != before
}

/// Slider constrained to `bounds`. Returns whether the value changed.
fn stepped_slider(ui: &mut Ui, label: &str, value: &mut usize, bounds: SliderBounds) -> bool {
    let before = *value;
    ui.label(label);
    ui.add_enabled(
        bounds.min < bounds.max,
        egui::Slider::new(value, bounds.min..=bounds.max).step_by(bounds.step as f64),
    );
    *value = bounds.clamp(*value);
    *value != before
}

/// Two-handle range selector under the histogram; `None` means full range.
/// Returns the new zoom.
pub fn range_slider(
    ui: &mut Ui,
    full: (f64, f64),
    zoom: Option<(f64, f64)>,
) -> Option<(f64, f64)> {
    let (lo, hi) = full;
    let (mut from, mut to) = zoom.unwrap_or(full);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Range");
        let width = (ui.available_width() - 80.0).max(120.0) / 2.0;
        ui.spacing_mut().slider_width = width;
        ui.add(egui::Slider::new(&mut from, lo..=hi).show_value(false));
        ui.add(egui::Slider::new(&mut to, lo..=hi).show_value(false));
        if ui.small_button("Reset").clicked() {
            from = lo;
            to = hi;
        }
    });

    if from > to {
        std::mem::swap(&mut from, &mut to);
    }
    if from <= lo && to >= hi {
        None
    } else {
        Some((from, to))
    }
}
