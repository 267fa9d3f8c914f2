use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::load_file;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – country and year controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    year_controls(ui, state);
    ui.add_space(8.0);
    country_controls(ui, state);
}

/// Two index sliders forming the year range, plus tick labels every 50 years.
fn year_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Years");
    ui.separator();

    let Some(last) = state.table.last_year_index() else {
        ui.label("No year columns.");
        return;
    };
    let years: Vec<String> = state.table.years().iter().map(|y| y.to_string()).collect();
    let (mut lo, mut hi) = (state.selection.lo, state.selection.hi);

    for (label, index) in [("From", &mut lo), ("To", &mut hi)] {
        let years = years.clone();
        ui.add(
            egui::Slider::new(index, 0..=last)
                .text(label)
                .custom_formatter(move |v, _| years.get(v as usize).cloned().unwrap_or_default()),
        );
    }
    state.set_year_range(lo, hi);

    if hi < lo {
        ui.label(RichText::new("\"From\" is after \"To\"").color(Color32::YELLOW));
    }

    year_mark_row(ui, state, last);
}

/// Tick labels painted under the slider rail at their year index.
fn year_mark_row(ui: &mut Ui, state: &AppState, last: usize) {
    let width = ui.spacing().slider_width;
    // The slider handle never reaches the rail ends; mirror its inset.
    let inset = ui.spacing().interact_size.y / 2.5;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), egui::Sense::hover());
    let painter = ui.painter_at(rect.expand2(egui::vec2(inset, 0.0)));
    let color = ui.visuals().weak_text_color();

    for (index, label) in state.table.year_marks() {
        let x = mark_x(index, last, rect.left() + inset, width - 2.0 * inset);
        painter.text(
            egui::pos2(x, rect.top()),
            egui::Align2::CENTER_TOP,
            label,
            egui::FontId::proportional(11.0),
            color,
        );
    }
}

/// Horizontal position of year `index` on a rail starting at `left`.
fn mark_x(index: usize, last: usize, left: f32, rail: f32) -> f32 {
    if last == 0 {
        return left + rail / 2.0;
    }
    left + rail * index as f32 / last as f32
}

/// Searchable multi-select over the table's countries.
fn country_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Countries");
    ui.separator();

    if state.table.is_empty() {
        ui.label("No countries loaded.");
        return;
    }

    ui.add(egui::TextEdit::singleline(&mut state.country_search).hint_text("Search…"));

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    // Selected countries as removable chips.
    let selected: Vec<String> = state.selection.countries.iter().cloned().collect();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for country in &selected {
            let text = RichText::new(format!("{country} ✕")).color(state.color_map.color_for(country));
            if ui.small_button(text).clicked() {
                state.toggle_country(country);
            }
        }
    });
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let visible: Vec<String> = state
        .visible_countries()
        .into_iter()
        .map(str::to_string)
        .collect();

    // Hovering a country shows its value in the last year of the window.
    let hover_year = state
        .selection
        .hi
        .min(state.table.last_year_index().unwrap_or(0));
    let hover_label = state
        .table
        .years()
        .get(hover_year)
        .map(|y| y.to_string())
        .unwrap_or_default();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for country in &visible {
                let mut checked = state.selection.countries.contains(country);
                let text = RichText::new(country).color(state.color_map.color_for(country));
                let mut response = ui.checkbox(&mut checked, text);
                if let Some(value) = state.table.value(country, hover_year) {
                    response = response.on_hover_text(format!("{hover_label}: {value:.0}"));
                }
                if response.changed() {
                    state.toggle_country(country);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.chart.is_empty(), egui::Button::new("Export chart data…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} countries loaded, {} selected, {} points",
            state.table.len(),
            state.selection.countries.len(),
            state.chart.points.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open GDP table")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(table) => state.set_table(Arc::new(table)),
            Err(e) => {
                // The current table stays on screen.
                let prefix = if e.is_parse_error() { "Bad value" } else { "Error" };
                let e = anyhow::Error::new(e).context(format!("loading {}", path.display()));
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("{prefix}: {e:#}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart data")
        .set_file_name("gdp_chart.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_chart(state, &path) {
            Ok(()) => {
                log::info!(
                    "Exported {} points to {}",
                    state.chart.points.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export chart data: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_chart(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    state.chart.write_csv(file).context("writing chart data")?;
    Ok(())
}
