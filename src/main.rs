mod app;
mod chart;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use app::GdpDashboardApp;
use eframe::egui;

/// Table loaded at startup, relative to the working directory.
const DATA_PATH: &str = "gdp_pcap.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Refuse to open the window on a table that failed to load.
    let table = data::loader::load_file(Path::new(DATA_PATH))
        .with_context(|| format!("loading {DATA_PATH}"))
        .inspect_err(|e| log::error!("{e:#}"))?;
    let table = Arc::new(table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        chart::CHART_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(GdpDashboardApp::new(table)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
