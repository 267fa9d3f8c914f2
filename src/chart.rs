use std::io::Write;

use crate::data::filter::{filter_for_view, ChartPoint, Selection};
use crate::data::model::Table;

/// Title shown above the plot.
pub const CHART_TITLE: &str = "GDP Per Capita Over Time";

// ---------------------------------------------------------------------------
// ChartSpec – what the plot panel draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
}

/// Fixed visual encoding plus the points produced for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    /// Field on the x axis.
    pub x: &'static str,
    /// Field on the y axis.
    pub y: &'static str,
    /// Field that splits points into series.
    pub color: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    pub fn line(points: Vec<ChartPoint>) -> Self {
        Self {
            kind: ChartKind::Line,
            title: CHART_TITLE,
            x: "year",
            y: "gdp",
            color: "country",
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points grouped by country, first-appearance order, years in order.
    pub fn series(&self) -> Vec<(&str, Vec<&ChartPoint>)> {
        let mut series: Vec<(&str, Vec<&ChartPoint>)> = Vec::new();
        for p in &self.points {
            match series.iter_mut().find(|(c, _)| *c == p.country) {
                Some((_, pts)) => pts.push(p),
                None => series.push((p.country.as_str(), vec![p])),
            }
        }
        series
    }

    /// Write the points as long-form CSV (`country,year,gdp`).
    pub fn write_csv<W: Write>(&self, out: W) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        for p in &self.points {
            writer.serialize(p)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Selection-change handler: one new chart per event.
pub fn on_selection_changed(table: &Table, selection: &Selection) -> ChartSpec {
    let unknown = selection.unknown_countries(table);
    if !unknown.is_empty() {
        log::warn!("Ignoring countries not in the table: {unknown:?}");
    }

    let points = filter_for_view(table, selection);
    log::debug!(
        "Selection changed: {} countries, years {:?} -> {} points",
        selection.countries.len(),
        selection.year_range(),
        points.len()
    );
    ChartSpec::line(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    #[test]
    fn spec_carries_fixed_encoding() {
        let spec = on_selection_changed(&sample_table(), &Selection::new(["A", "B"], 0, 1));
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.title, "GDP Per Capita Over Time");
        assert_eq!((spec.x, spec.y, spec.color), ("year", "gdp", "country"));
        assert_eq!(spec.points.len(), 4);
    }

    #[test]
    fn empty_selection_gives_empty_chart() {
        let spec = on_selection_changed(&sample_table(), &Selection::new(["A"], 1, 0));
        assert!(spec.is_empty());
        assert!(spec.series().is_empty());
    }

    #[test]
    fn series_split_by_country() {
        let spec = on_selection_changed(&sample_table(), &Selection::new(["A", "B"], 0, 1));
        let series = spec.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "A");
        assert_eq!(
            series[1].1.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![500.0, 1500.0]
        );
    }

    #[test]
    fn csv_export_is_long_form() {
        let spec = on_selection_changed(&sample_table(), &Selection::new(["B"], 0, 1));
        let mut out = Vec::new();
        spec.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "country,year,gdp\nB,1950,500.0\nB,2000,1500.0\n"
        );
    }
}
