use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i32 = 1800;
const LAST_YEAR: i32 = 2100;

/// Country, GDP per capita in the first year, yearly growth rate.
const COUNTRIES: &[(&str, f64, f64)] = &[
    ("Afghanistan", 480.0, 0.0060),
    ("Argentina", 1_300.0, 0.0090),
    ("Brazil", 900.0, 0.0095),
    ("Chad", 520.0, 0.0040),
    ("China", 700.0, 0.0120),
    ("France", 2_000.0, 0.0110),
    ("India", 650.0, 0.0085),
    ("Japan", 950.0, 0.0135),
    ("Nigeria", 600.0, 0.0055),
    ("Norway", 1_700.0, 0.0150),
    ("Peru", 850.0, 0.0080),
    ("United States", 2_100.0, 0.0140),
];

/// Minimal deterministic PRNG (xorshift64*)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.max(1),
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        let x = self.state.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (x >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Format like the Gapminder export: `"812"` below ten thousand, `"34.5k"` above.
fn raw_cell(value: f64) -> String {
    if value >= 10_000.0 {
        format!("{:.1}k", value / 1000.0)
    } else {
        format!("{value:.0}")
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Vec<String>> {
    COUNTRIES
        .iter()
        .map(|&(country, base, growth)| {
            let mut row = vec![country.to_string()];
            let mut value = base;
            for _ in FIRST_YEAR..=LAST_YEAR {
                row.push(raw_cell(value));
                let shock = (rng.next_f64() - 0.5) * 0.04;
                value = (value * (1.0 + growth + shock)).max(100.0);
            }
            row
        })
        .collect()
}

fn write_csv(path: &str, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Every column is Utf8 so the raw `k` cells survive unchanged.
fn write_parquet(path: &str, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        header
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..header.len())
        .map(|col| {
            let cells: Vec<&str> = rows.iter().map(|r| r[col].as_str()).collect();
            Arc::new(StringArray::from(cells)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let header: Vec<String> = std::iter::once("country".to_string())
        .chain((FIRST_YEAR..=LAST_YEAR).map(|y| y.to_string()))
        .collect();
    let rows = generate_rows(&mut rng);

    write_csv("gdp_pcap.csv", &header, &rows)?;
    write_parquet("gdp_pcap.parquet", &header, &rows)?;

    println!(
        "Wrote {} countries × {} years to gdp_pcap.csv and gdp_pcap.parquet",
        rows.len(),
        header.len() - 1
    );
    Ok(())
}
