//! Salary Dashboard - job market CSV analysis
//!
//! Desktop viewer: upload a job-postings CSV and browse the salary charts.

mod gui;

use anyhow::{anyhow, Result};
use eframe::egui;
use gui::DashboardApp;
use salary_dashboard::config::DashboardConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` overrides the configured filter.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let loaded = DashboardConfig::load();
    let log_filter = loaded
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| DashboardConfig::default().log_filter);
    init_logging(&log_filter);

    let config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "using default configuration");
        DashboardConfig::default()
    });
    info!("Salary Dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([900.0, 600.0])
            .with_title("Salary Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Salary Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("Failed to start dashboard window: {e}"))
}
