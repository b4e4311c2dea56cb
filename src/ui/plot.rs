use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::DivergingScale;
use crate::data::stats::{CorrelationMatrix, Histogram, ScatterSample};

const SCATTER_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const SCATTER_OPACITY: f32 = 0.75;
/// Marker diameter in points; egui_plot takes a radius.
const SCATTER_MARKER_SIZE: f32 = 6.0;

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Render the correlation matrix as coloured unit cells. Column `i` sits at
/// x = i, row `j` at y = -j so the first column is top-left.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let scale = DivergingScale::default();
    let n = matrix.columns.len();

    ui.weak(format!("{} rows without missing values", matrix.rows_used));
    color_bar(ui, &scale);

    let x_names = matrix.columns.clone();
    let y_names = matrix.columns.clone();

    Plot::new("correlation_heatmap")
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .x_axis_formatter(move |mark, _range| axis_name(&x_names, mark.value))
        .y_axis_formatter(move |mark, _range| axis_name(&y_names, -mark.value))
        .include_x(-0.5)
        .include_x(n as f64 - 0.5)
        .include_y(0.5)
        .include_y(-(n as f64) + 0.5)
        .show(ui, |plot_ui| {
            for (j, row) in matrix.values.iter().enumerate() {
                for (i, value) in row.iter().enumerate() {
                    let (x, y) = (i as f64, -(j as f64));
                    let fill = value.map_or(crate::color::UNDEFINED, |v| scale.color_for(v));
                    let cell = Polygon::new(PlotPoints::new(vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ]))
                    .fill_color(fill)
                    .stroke(Stroke::new(1.0, Color32::WHITE));
                    plot_ui.polygon(cell);

                    let (label, text_color) = match value {
                        Some(v) => (format!("{v:.2}"), scale.text_color_for(*v)),
                        None => ("NaN".to_string(), Color32::BLACK),
                    };
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(label).color(text_color),
                    ));
                }
            }
        });
}

/// Name of the column at integer position `value`, blank between cells.
fn axis_name(names: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Horizontal legend strip from -1 to 1.
fn color_bar(ui: &mut Ui, scale: &DivergingScale) {
    ui.horizontal(|ui: &mut Ui| {
        ui.weak(format!("{:.0}", scale.zmin));
        let steps = 40;
        let (rect, _) = ui.allocate_exact_size(
            eframe::egui::vec2(200.0, 12.0),
            eframe::egui::Sense::hover(),
        );
        let w = rect.width() / steps as f32;
        for k in 0..steps {
            let t = k as f64 / (steps - 1) as f64;
            let value = scale.zmin + t * (scale.zmax - scale.zmin);
            let cell = eframe::egui::Rect::from_min_size(
                rect.min + eframe::egui::vec2(w * k as f32, 0.0),
                eframe::egui::vec2(w + 0.5, rect.height()),
            );
            ui.painter().rect_filled(cell, 0.0, scale.color_for(value));
        }
        ui.weak(format!("{:.0}", scale.zmax));
    });
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

pub fn scatter_plot(ui: &mut Ui, sample: &ScatterSample) {
    ui.strong(format!("{} vs {}", sample.y_column, sample.x_column));
    ui.weak(format!(
        "{} of {} complete rows shown",
        sample.points.len(),
        sample.complete_rows
    ));

    let x_name = sample.x_column.clone();
    let y_name = sample.y_column.clone();

    let points: PlotPoints = sample.points.iter().map(|p| [p.x, p.y]).collect();
    let markers = Points::new(points)
        .name(format!("{} vs {}", sample.y_column, sample.x_column))
        .radius(SCATTER_MARKER_SIZE / 2.0)
        .color(SCATTER_COLOR.gamma_multiply(SCATTER_OPACITY));

    Plot::new("scatter_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(sample.x_column.as_str())
        .y_axis_label(sample.y_column.as_str())
        .label_formatter(move |_name, value| {
            format!("{x_name}: {:.4}\n{y_name}: {:.4}", value.x, value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(markers);
        });
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Render the histogram; `zoom` fixes the visible x range when set.
pub fn histogram_plot(ui: &mut Ui, hist: &Histogram, zoom: Option<(f64, f64)>, height: f32) {
    ui.strong(format!("Histogram of {}", hist.column));

    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .zip(hist.edges.windows(2))
        .map(|(&count, edge)| {
            Bar::new(edge[0] / 2.0 + edge[1] / 2.0, count as f64)
                .width(width)
                .name(format!("[{:.3}, {:.3}]: {count}", edge[0], edge[1]))
        })
        .collect();
    let max_count = hist.counts.iter().copied().max().unwrap_or(0) as f64;

    let column = hist.column.clone();
    Plot::new("histogram_plot")
        .legend(egui_plot::Legend::default())
        .height(height)
        .x_axis_label(column.as_str())
        .y_axis_label("count")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(column.as_str())
                    .color(SCATTER_COLOR),
            );
            let (lo, hi) = match (zoom, hist.range()) {
                (Some(z), _) => z,
                (None, Some(full)) => full,
                (None, None) => return,
            };
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [lo, 0.0],
                [hi, (max_count * 1.05).max(1.0)],
            ));
        });
}
