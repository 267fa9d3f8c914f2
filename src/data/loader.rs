use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::{DataError, Result};
use super::model::{Table, COUNTRY_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a GDP table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header `country,1800,1801,…`, one row per country
/// * `.json`         – `[{ "country": "A", "1800": "1.2k", ... }, ...]`
/// * `.parquet`      – `country` string column plus one column per year
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(File::open(path)?, b',')?,
        "tsv" => load_csv(File::open(path)?, b'\t')?,
        "json" => load_json(File::open(path)?)?,
        "parquet" | "pq" => load_parquet(File::open(path)?)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} countries over {} years from {}",
        table.len(),
        table.years().len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Delimited layout: header row `country,<year>,<year>,…`, then one row per
/// country whose cells are raw values such as `"812"` or `"1.2k"`.
pub fn load_csv<R: Read>(source: R, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        // Row width is checked against the header by `Table::from_raw`, which
        // reports the offending row.
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let year_labels = split_header(headers.iter())?;

    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Table::from_raw(year_labels, records.iter().map(|r| r.iter()))
}

/// Check the leading `country` header and return the year labels after it.
fn split_header<'a>(mut headers: impl Iterator<Item = &'a str>) -> Result<Vec<String>> {
    match headers.next().map(str::trim) {
        Some(COUNTRY_COLUMN) => Ok(headers.map(str::to_string).collect()),
        Some("") | None => Err(DataError::load("missing header row")),
        Some(other) => Err(DataError::load(format!(
            "first column must be '{COUNTRY_COLUMN}', found '{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "country": "Afghanistan", "1800": "599", "1801": "1.2k" },
///   ...
/// ]
/// ```
///
/// Cells may be strings or numbers. Year columns are taken from the key order
/// of the first record as `serde_json::Map` iterates it (sorted unless the
/// `preserve_order` feature is on). Either way, `Table::from_raw` rejects
/// years that end up out of order, so the table is never silently unsorted.
pub fn load_json<R: Read>(source: R) -> Result<Table> {
    let records: Vec<Map<String, JsonValue>> = serde_json::from_reader(source)?;

    let year_labels: Vec<String> = match records.first() {
        Some(first) => first
            .keys()
            .filter(|k| k.as_str() != COUNTRY_COLUMN)
            .cloned()
            .collect(),
        None => return Err(DataError::load("JSON table has no records")),
    };

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let country = match record.get(COUNTRY_COLUMN) {
            Some(JsonValue::String(s)) => s.clone(),
            _ => {
                return Err(DataError::load(format!(
                    "record {i}: missing or non-string '{COUNTRY_COLUMN}'"
                )))
            }
        };
        if record.len() != year_labels.len() + 1 {
            return Err(DataError::load(format!(
                "record {i} ({country}): expected {} year values, found {}",
                year_labels.len(),
                record.len().saturating_sub(1)
            )));
        }

        let mut row = Vec::with_capacity(year_labels.len() + 1);
        row.push(country.clone());
        for year in &year_labels {
            let cell = match record.get(year) {
                Some(JsonValue::String(s)) => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                Some(_) => {
                    return Err(DataError::load(format!(
                        "record {i} ({country}), year {year}: expected a string or number"
                    )))
                }
                None => {
                    return Err(DataError::load(format!(
                        "record {i} ({country}): missing year {year}"
                    )))
                }
            };
            row.push(cell);
        }
        rows.push(row);
    }

    Table::from_raw(year_labels, rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the wide GDP table.
///
/// Expected schema:
/// - `country`: Utf8 or LargeUtf8
/// - one column per year, named by the year: Utf8 raw cells (`"1.2k"`) or
///   Float64 / Float32 / Int64 / Int32 values
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`) once the index is dropped.
pub fn load_parquet(file: File) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let year_labels = split_header(schema.fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let line = rows.len();
            let cells = batch
                .columns()
                .iter()
                .map(|col| cell_to_raw(col, row, line))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Table::from_raw(year_labels, rows)
}

// -- Parquet / Arrow helpers --

/// Render one Arrow cell as the raw text the normalizer expects.
fn cell_to_raw(col: &ArrayRef, row: usize, record: usize) -> Result<String> {
    if col.is_null(row) {
        return Err(DataError::load(format!("record {record}: null cell")));
    }
    let raw = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        other => {
            return Err(DataError::load(format!(
                "record {record}: unsupported column type {other:?}"
            )))
        }
    };
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::tests::sample_table;

    const SAMPLE_CSV: &str = "country,1950,2000\nA,1k,2k\nB,500,1.5k\n";

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gdp-dashboard-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_matches_reference_table() {
        let table = load_csv(SAMPLE_CSV.as_bytes(), b',').unwrap();
        assert_eq!(table, sample_table());
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let tsv = SAMPLE_CSV.replace(',', "\t");
        assert_eq!(load_csv(tsv.as_bytes(), b'\t').unwrap(), sample_table());
    }

    #[test]
    fn csv_header_must_start_with_country() {
        let err = load_csv("nation,1950\nA,1\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, DataError::Load(_)), "{err}");

        let err = load_csv("".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, DataError::Load(_)), "{err}");
    }

    #[test]
    fn csv_ragged_row_is_a_load_error() {
        let err = load_csv("country,1950,2000\nA,1k\n".as_bytes(), b',').unwrap_err();
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("row 2"), "{err}");
    }

    #[test]
    fn csv_bad_cell_is_a_parse_error() {
        let err = load_csv("country,1950,2000\nA,1k,oops\n".as_bytes(), b',').unwrap_err();
        assert!(err.is_parse_error());
        let msg = err.to_string();
        assert!(msg.contains("row 2") && msg.contains("2000"), "{msg}");
    }

    #[test]
    fn json_records_match_csv() {
        let json = r#"[
            {"country": "A", "1950": "1k", "2000": "2k"},
            {"country": "B", "1950": 500, "2000": "1.5k"}
        ]"#;
        assert_eq!(load_json(json.as_bytes()).unwrap(), sample_table());
    }

    #[test]
    fn json_years_come_back_ascending() {
        let json = r#"[
            {"country": "A", "2000": "2k", "1950": "1k"},
            {"country": "B", "2000": "1.5k", "1950": "500"}
        ]"#;
        match load_json(json.as_bytes()) {
            Ok(table) => assert_eq!(table, sample_table()),
            // File key order kept: the year check must refuse it, not reorder it.
            Err(err) => assert!(matches!(err, DataError::Load(_)), "{err}"),
        }
    }

    #[test]
    fn json_missing_year_is_rejected() {
        let json = r#"[
            {"country": "A", "1950": "1k", "2000": "2k"},
            {"country": "B", "1950": "500"}
        ]"#;
        let err = load_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Load(_)), "{err}");
        assert!(load_json("[]".as_bytes()).is_err());
    }

    #[test]
    fn parquet_matches_csv() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("1950", DataType::Utf8, false),
            Field::new("2000", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec!["1k", "500"])),
                Arc::new(Float64Array::from(vec![2000.0, 1500.0])),
            ],
        )
        .unwrap();

        let path = temp_path("table.parquet");
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table, sample_table());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let path = temp_path("table.CSV");
        std::fs::write(&path, SAMPLE_CSV).unwrap();
        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table, sample_table());

        let err = load_file(Path::new("gdp.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedExtension(ref e) if e == "xlsx"));

        let err = load_file(&temp_path("missing.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
