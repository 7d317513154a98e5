//! Portfolio Generator - form-to-PDF portfolio builder
//!
//! Fill in your details, watch the live preview, keep profiles locally and
//! export them as PDF documents.

mod app;
mod core;
mod export;
mod ui;

use app::PortfolioApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Portfolio Generator...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Portfolio Generator"),
        ..Default::default()
    };

    eframe::run_native(
        "Portfolio Generator",
        native_options,
        Box::new(|cc| Ok(Box::new(PortfolioApp::new(cc)?))),
    )
}
