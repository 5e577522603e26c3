mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::AeiExplorerApp;
use config::ExplorerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ExplorerConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "AEI Explorer – Anthropic Economic Index",
        options,
        Box::new(move |_cc| Ok(Box::new(AeiExplorerApp::new(config)))),
    )
}
