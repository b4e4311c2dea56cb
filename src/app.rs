use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::DashboardConfig;
use crate::dashboard::{Frame, HeatmapView, ReadyFrame, TabView, UPLOAD_PROMPT};
use crate::params::ViewParams;
use crate::state::AppState;
use crate::ui::{controls, panels, plot};

const WARNING_COLOR: Color32 = Color32::from_rgb(200, 140, 0);

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyEdaApp {
    pub state: AppState,
}

impl RustyEdaApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustyEdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::handle_dropped_files(ctx, &mut self.state);
        self.state.refresh();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: caption ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Left side panel: uploader ----
        egui::SidePanel::left("upload_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state);
        });

        panels::drop_hint(ctx);

        // Widgets changed this frame: show the new result without waiting
        // for the next input event.
        if self.state.needs_refresh() {
            ctx.request_repaint();
        }
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        dashboard,
        params,
        histogram_zoom,
        frame,
        ..
    } = state;

    let frame = match frame {
        Ok(Frame::AwaitingUpload) => {
            info_box(ui, UPLOAD_PROMPT);
            return;
        }
        Ok(Frame::Halted(message)) => {
            ui.label(RichText::new(message.as_str()).color(Color32::RED).strong());
            return;
        }
        Err(message) => {
            ui.heading(RichText::new("Could not load this file").color(Color32::RED));
            ui.label(message.as_str());
            return;
        }
        Ok(Frame::Ready(frame)) => frame,
    };

    if frame.report.unparseable_dates > 0 {
        ui.colored_label(
            WARNING_COLOR,
            format!(
                "{} value(s) in '{}' could not be parsed as dates and were treated as missing.",
                frame.report.unparseable_dates,
                dashboard.config().date_column
            ),
        );
    }

    panels::tab_bar(ui, params);
    ui.separator();
    tab_content(ui, params, histogram_zoom, frame);
}

/// Widgets and chart of the active tab. The view in `frame` belongs to the
/// tab that was active at the last rerun.
fn tab_content(
    ui: &mut Ui,
    params: &mut ViewParams,
    histogram_zoom: &mut Option<(f64, f64)>,
    frame: &ReadyFrame,
) {
    let numeric = &frame.numeric_columns;
    match &frame.view {
        TabView::Heatmap(view) => {
            ui.heading("Correlation heatmap");
            controls::heatmap_controls(ui, params, &frame.params, numeric);
            match view {
                HeatmapView::Matrix(matrix) => plot::correlation_heatmap(ui, matrix),
                HeatmapView::Warning(message) => {
                    ui.colored_label(WARNING_COLOR, *message);
                }
            }
        }
        TabView::Scatter(sample) => {
            ui.heading("Scatter");
            controls::scatter_controls(ui, params, &frame.params, numeric);
            plot::scatter_plot(ui, sample);
        }
        TabView::Histogram(hist) => {
            ui.heading("Histogram");
            controls::histogram_controls(ui, params, &frame.params, numeric);
            if params
                .histogram
                .column
                .as_deref()
                .is_some_and(|c| c != frame.params.histogram_column)
            {
                *histogram_zoom = None;
            }

            let plot_height = (ui.available_height() - 40.0).max(120.0);
            plot::histogram_plot(ui, hist, *histogram_zoom, plot_height);
            if let Some(full) = hist.range() {
                *histogram_zoom = controls::range_slider(ui, full, *histogram_zoom);
            }
        }
    }
}

fn info_box(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}
