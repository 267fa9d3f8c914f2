use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types for the data layer
// ---------------------------------------------------------------------------

/// A single raw cell could not be turned into a GDP value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{raw}' is not a valid non-negative number")]
pub struct ParseError {
    pub raw: String,
}

/// Everything that can go wrong while building a [`Table`](super::model::Table).
///
/// [`DataError::Parse`] is the only cell-level failure; every other variant
/// means the source itself is unreadable or structurally malformed.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed table: {0}")]
    Load(String),

    #[error("cannot parse row {row} ({country}), year {year}")]
    Parse {
        row: usize,
        country: String,
        year: String,
        #[source]
        source: ParseError,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("reading file")]
    Io(#[from] std::io::Error),

    #[error("reading CSV")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DataError {
    pub(crate) fn load(msg: impl Into<String>) -> Self {
        DataError::Load(msg.into())
    }

    /// `true` when a cell failed to normalize, `false` for structural problems.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, DataError::Parse { .. })
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
