//! Data layer: normalization, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐   ┌───────────┐
//!   │  loader  │──▶│ normalize │  "1.2k" → 1200.0
//!   └──────────┘   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Table   │  countries × years, immutable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  Selection → long-form ChartPoints
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
