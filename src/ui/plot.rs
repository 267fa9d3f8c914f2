use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::chart::ChartKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GDP line chart (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart in the central panel: one line per country.
pub fn gdp_plot(ui: &mut Ui, state: &AppState) {
    let chart = &state.chart;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(chart.title);
        if chart.is_empty() {
            ui.label(RichText::new("No data for the current selection").weak());
        }
    });

    let (x_field, y_field, group_field) = (chart.x, chart.y, chart.color);

    Plot::new("gdp_plot")
        .legend(Legend::default())
        .x_axis_label(x_field)
        .y_axis_label(y_field)
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .label_formatter(move |name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!(
                    "{group_field}: {name}\n{x_field}: {:.0}\n{y_field}: {:.0}",
                    value.x, value.y
                )
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (country, points) in chart.series() {
                // Year labels are validated as integers when the table loads.
                let points: PlotPoints = points
                    .iter()
                    .filter_map(|p| Some([p.year.parse::<f64>().ok()?, p.value]))
                    .collect();

                match chart.kind {
                    ChartKind::Line => {
                        let line = Line::new(points)
                            .name(country)
                            .color(state.color_map.color_for(country))
                            .width(1.5);
                        plot_ui.line(line);
                    }
                }
            }
        });
}
