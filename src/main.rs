mod app;
mod cache;
mod color;
mod config;
mod dashboard;
mod data;
mod error;
mod params;
mod state;
mod ui;

use app::RustyEdaApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty EDA – Heatmap • Scatter • Histogram",
        options,
        Box::new(|_cc| Ok(Box::new(RustyEdaApp::new(config)))),
    )
}
