#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod handlers;
mod logger;
mod views;
mod worker;

fn main() -> eframe::Result<()> {
    let app_logger = logger::AppLogger::new(256);
    let _ = app_logger.clone().init();

    let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
    let tokio_handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 840.0])
            .with_title("PDF Stamper"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Stamper",
        options,
        Box::new(move |cc| Ok(Box::new(app::StampApp::new(cc, tokio_handle, app_logger)))),
    )
}
