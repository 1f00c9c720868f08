mod app;
mod color;
mod config;
mod data;
mod geo;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use app::SalesDashboardApp;
use config::{CONFIG_ENV_VAR, DashboardConfig};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::resolve(
        std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        std::env::args().skip(1),
    )?;
    log::info!("source: {}", config.source.path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SalesDashboardApp::new(config)))),
    )
    .map_err(|e| anyhow!("failed to run the dashboard window: {e}"))
}
