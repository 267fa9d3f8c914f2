use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Serialize;

use super::model::Table;

// ---------------------------------------------------------------------------
// Selection: which countries and which year columns to show
// ---------------------------------------------------------------------------

/// UI-owned selection state.
///
/// `lo..=hi` indexes into [`Table::years`]. A range with `hi < lo` is legal and
/// selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub lo: usize,
    pub hi: usize,
}

impl Selection {
    pub fn new<I, S>(countries: I, lo: usize, hi: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            lo,
            hi,
        }
    }

    /// First country alone, every year.
    pub fn initial(table: &Table) -> Self {
        Self::new(
            table.countries().first().copied(),
            0,
            table.last_year_index().unwrap_or(0),
        )
    }

    pub fn year_range(&self) -> RangeInclusive<usize> {
        self.lo..=self.hi
    }

    /// Selected names that the table does not contain.
    pub fn unknown_countries<'a>(&'a self, table: &Table) -> Vec<&'a str> {
        let known: BTreeSet<&str> = table.countries().into_iter().collect();
        self.countries
            .iter()
            .map(String::as_str)
            .filter(|c| !known.contains(*c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ChartPoint: one long-form sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub country: String,
    pub year: String,
    #[serde(rename = "gdp")]
    pub value: f64,
}

/// Reshape the selected part of `table` into long form.
///
/// Rows keep table order, years keep column order. Unknown countries are
/// skipped; a degenerate or out-of-range year window yields an empty result.
pub fn filter_for_view(table: &Table, selection: &Selection) -> Vec<ChartPoint> {
    let Some(last) = table.last_year_index() else {
        return Vec::new();
    };
    if selection.hi < selection.lo || selection.lo > last {
        return Vec::new();
    }
    let hi = selection.hi.min(last);
    let years = &table.years();

    table
        .rows()
        .iter()
        .filter(|row| selection.countries.contains(&row.country))
        .flat_map(|row| {
            (selection.lo..=hi).map(move |i| ChartPoint {
                country: row.country.clone(),
                year: years[i].to_string(),
                value: row.values[i],
            })
        })
        .collect()
}
