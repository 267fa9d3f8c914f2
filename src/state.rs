use std::sync::Arc;

use crate::chart::{on_selection_changed, ChartSpec};
use crate::color::ColorMap;
use crate::data::filter::Selection;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table, shared read-only.
    pub table: Arc<Table>,

    /// Current country / year-range selection.
    pub selection: Selection,

    /// Chart for the current selection (rebuilt on every change).
    pub chart: ChartSpec,

    /// One colour per country of `table`.
    pub color_map: ColorMap,

    /// Text typed into the country search box.
    pub country_search: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Arc<Table>) -> Self {
        let selection = Selection::initial(&table);
        let chart = on_selection_changed(&table, &selection);
        let color_map = ColorMap::new(table.countries());
        Self {
            table,
            selection,
            chart,
            color_map,
            country_search: String::new(),
            status_message: None,
        }
    }

    /// Swap in a newly loaded table and reset the selection to its defaults.
    pub fn set_table(&mut self, table: Arc<Table>) {
        *self = Self::new(table);
    }

    /// Rebuild the chart after a selection change.
    pub fn refresh_chart(&mut self) {
        self.chart = on_selection_changed(&self.table, &self.selection);
    }

    /// Add or remove a single country.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selection.countries.remove(country) {
            self.selection.countries.insert(country.to_string());
        }
        self.refresh_chart();
    }

    /// Select every country.
    pub fn select_all(&mut self) {
        self.selection.countries = self
            .table
            .countries()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.refresh_chart();
    }

    /// Deselect all countries.
    pub fn select_none(&mut self) {
        self.selection.countries.clear();
        self.refresh_chart();
    }

    /// Move the year window; `lo > hi` is allowed and shows an empty chart.
    pub fn set_year_range(&mut self, lo: usize, hi: usize) {
        if (lo, hi) == (self.selection.lo, self.selection.hi) {
            return;
        }
        self.selection.lo = lo;
        self.selection.hi = hi;
        self.refresh_chart();
    }

    /// Countries matching the search box, in table order.
    pub fn visible_countries(&self) -> Vec<&str> {
        let needle = self.country_search.trim().to_lowercase();
        self.table
            .countries()
            .into_iter()
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .collect()
    }
}
