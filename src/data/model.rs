use std::collections::HashSet;

use super::error::{DataError, Result};
use super::normalize::normalize;

/// Header of the first column in every source table.
pub const COUNTRY_COLUMN: &str = "country";

/// Year step at which the range control shows a tick label.
pub const YEAR_MARK_STEP: i32 = 50;

// ---------------------------------------------------------------------------
// CountryRow – one row of the source table
// ---------------------------------------------------------------------------

/// One country with its GDP values, aligned with [`Table::years`].
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country: String,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Year – a validated year column label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Year {
    /// Label exactly as it appeared in the header.
    pub label: String,
    pub value: i32,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Wide GDP table: one row per country, one column per year.
///
/// Built once through [`Table::from_raw`] and never mutated afterwards; share
/// it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    years: Vec<Year>,
    rows: Vec<CountryRow>,
}

impl Table {
    /// Validate headers and normalize every raw cell.
    ///
    /// `year_labels` are the headers after `country`; each raw row is the
    /// country followed by its cells. Fails on the first structural problem or
    /// unparseable cell; no partial table is returned.
    pub fn from_raw<I, R, S>(year_labels: Vec<String>, raw_rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let years = parse_year_headers(year_labels)?;

        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for (row_no, raw) in raw_rows.into_iter().enumerate() {
            // 1-based, counting the header line, to match what an editor shows.
            let line = row_no + 2;
            let mut cells = raw.into_iter();
            let country = cells
                .next()
                .map(|c| c.as_ref().trim().to_string())
                .unwrap_or_default();
            if country.is_empty() {
                return Err(DataError::load(format!("row {line}: empty country name")));
            }
            if !seen.insert(country.clone()) {
                return Err(DataError::load(format!(
                    "row {line}: duplicate country '{country}'"
                )));
            }

            let mut values = Vec::with_capacity(years.len());
            for (col, cell) in cells.enumerate() {
                let Some(year) = years.get(col) else {
                    return Err(width_error(line, years.len(), col + 1));
                };
                let value = normalize(cell.as_ref()).map_err(|source| DataError::Parse {
                    row: line,
                    country: country.clone(),
                    year: year.label.clone(),
                    source,
                })?;
                values.push(value);
            }
            if values.len() != years.len() {
                return Err(width_error(line, years.len(), values.len()));
            }

            rows.push(CountryRow { country, values });
        }

        Ok(Table { years, rows })
    }

    /// Country names in source row order.
    pub fn countries(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.country.as_str()).collect()
    }

    /// Year labels in source column order.
    pub fn years(&self) -> Vec<&str> {
        self.years.iter().map(|y| y.label.as_str()).collect()
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    /// GDP of `country` in the year column at `year_index`.
    pub fn value(&self, country: &str, year_index: usize) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.country == country)
            .and_then(|r| r.values.get(year_index))
            .copied()
    }

    /// Index of the last year column, `None` for a table without years.
    pub fn last_year_index(&self) -> Option<usize> {
        self.years.len().checked_sub(1)
    }

    /// Year indices whose year is a multiple of [`YEAR_MARK_STEP`], with labels.
    pub fn year_marks(&self) -> Vec<(usize, &str)> {
        self.years
            .iter()
            .enumerate()
            .filter(|(_, y)| y.value % YEAR_MARK_STEP == 0)
            .map(|(i, y)| (i, y.label.as_str()))
            .collect()
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no countries.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn width_error(line: usize, expected: usize, found: usize) -> DataError {
    DataError::load(format!(
        "row {line}: expected {expected} year values, found {found}"
    ))
}

/// Year headers must be integers in non-decreasing order.
fn parse_year_headers(labels: Vec<String>) -> Result<Vec<Year>> {
    if labels.is_empty() {
        return Err(DataError::load("no year columns after 'country'"));
    }

    let mut years: Vec<Year> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim().to_string();
        let value = label
            .parse::<i32>()
            .map_err(|_| DataError::load(format!("column header '{label}' is not a year")))?;
        if let Some(prev) = years.last() {
            if value < prev.value {
                return Err(DataError::load(format!(
                    "year columns out of order: {} comes after {}",
                    label, prev.label
                )));
            }
        }
        years.push(Year { label, value });
    }
    Ok(years)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The two-country table used throughout the data-layer tests.
    pub(crate) fn sample_table() -> Table {
        Table::from_raw(
            vec!["1950".into(), "2000".into()],
            vec![vec!["A", "1k", "2k"], vec!["B", "500", "1.5k"]],
        )
        .unwrap()
    }

    #[test]
    fn values_are_normalized_on_construction() {
        let table = sample_table();
        assert_eq!(table.value("A", 0), Some(1000.0));
        assert_eq!(table.value("A", 1), Some(2000.0));
        assert_eq!(table.value("B", 0), Some(500.0));
        assert_eq!(table.value("B", 1), Some(1500.0));
        assert_eq!(table.value("C", 0), None);
        assert_eq!(table.value("A", 2), None);
    }

    #[test]
    fn countries_and_years_keep_source_order() {
        let table = Table::from_raw(
            vec!["1800".into(), "1850".into(), "1900".into()],
            vec![
                vec!["Zimbabwe", "1", "2", "3"],
                vec!["Albania", "4", "5", "6"],
            ],
        )
        .unwrap();
        assert_eq!(table.countries(), vec!["Zimbabwe", "Albania"]);
        assert_eq!(table.years(), vec!["1800", "1850", "1900"]);
        assert_eq!(table.last_year_index(), Some(2));
    }

    #[test]
    fn year_marks_only_at_multiples_of_fifty() {
        let table = Table::from_raw(
            vec!["1949".into(), "1950".into(), "1975".into(), "2000".into()],
            vec![vec!["A", "1", "2", "3", "4"]],
        )
        .unwrap();
        assert_eq!(table.year_marks(), vec![(1, "1950"), (3, "2000")]);
    }

    #[test]
    fn bad_cell_reports_its_location() {
        let err = Table::from_raw(
            vec!["1950".into(), "2000".into()],
            vec![vec!["A", "1k", "2k"], vec!["B", "500", "n/a"]],
        )
        .unwrap_err();
        assert!(err.is_parse_error());
        match err {
            DataError::Parse {
                row,
                country,
                year,
                source,
            } => {
                assert_eq!(row, 3);
                assert_eq!(country, "B");
                assert_eq!(year, "2000");
                assert_eq!(source.raw, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let short = Table::from_raw(
            vec!["1950".into(), "2000".into()],
            vec![vec!["A", "1k"]],
        );
        assert!(matches!(short, Err(DataError::Load(_))));

        let long = Table::from_raw(
            vec!["1950".into()],
            vec![vec!["A", "1k", "2k"]],
        );
        assert!(matches!(long, Err(DataError::Load(_))));
    }

    #[test]
    fn structural_problems_are_load_errors() {
        let cases: Vec<Result<Table>> = vec![
            Table::from_raw(Vec::new(), vec![vec!["A"]]),
            Table::from_raw(vec!["year".into()], vec![vec!["A", "1"]]),
            Table::from_raw(vec!["2000".into(), "1950".into()], vec![vec!["A", "1", "2"]]),
            Table::from_raw(vec!["1950".into()], vec![vec!["", "1"]]),
            Table::from_raw(vec!["1950".into()], vec![vec!["A", "1"], vec!["A", "2"]]),
        ];
        for case in cases {
            let err = case.unwrap_err();
            assert!(!err.is_parse_error(), "{err}");
        }
    }

    #[quickcheck_macros::quickcheck]
    fn countries_are_distinct_and_years_sorted(names: Vec<String>, mut years: Vec<u16>) -> bool {
        years.sort_unstable();
        years.truncate(8);
        if years.is_empty() {
            years.push(1950);
        }
        let mut unique = Vec::new();
        for name in names {
            let name = name.trim().to_string();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }

        let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        let rows: Vec<Vec<String>> = unique
            .iter()
            .map(|c| {
                std::iter::once(c.clone())
                    .chain(years.iter().map(|_| "1k".to_string()))
                    .collect()
            })
            .collect();
        let table = Table::from_raw(labels, rows).unwrap();

        let countries = table.countries();
        let distinct: HashSet<&str> = countries.iter().copied().collect();
        let parsed: Vec<i32> = table.years().iter().map(|y| y.parse().unwrap()).collect();

        distinct.len() == countries.len()
            && countries == unique.iter().map(String::as_str).collect::<Vec<_>>()
            && parsed.len() == years.len()
            && parsed.windows(2).all(|w| w[0] <= w[1])
    }
}
