#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use logger::AppLogger;

mod app;
mod logger;
mod renderer;
mod ui_components;
mod views;

fn main() -> eframe::Result<()> {
    let logger = AppLogger::new(500, log::LevelFilter::Debug);
    if let Err(e) = logger.clone().init() {
        eprintln!("Failed to install logger: {}", e);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 850.0])
            .with_title("PDF Signer")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Signer",
        options,
        Box::new(|cc| Ok(Box::new(app::SignerApp::new(cc, logger)))),
    )
}
