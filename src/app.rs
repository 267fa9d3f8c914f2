use std::sync::Arc;

use eframe::egui;

use crate::data::model::Table;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GdpDashboardApp {
    pub state: AppState,
}

impl GdpDashboardApp {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            state: AppState::new(table),
        }
    }
}

impl eframe::App for GdpDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection controls ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::gdp_plot(ui, &self.state);
        });
    }
}
