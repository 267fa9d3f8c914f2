use super::error::ParseError;

/// Suffix marking a value expressed in thousands (`"34.5k"`).
const THOUSANDS_SUFFIX: char = 'k';

/// Convert a raw cell into a GDP value.
///
/// Accepts a plain decimal (`"1234.5"`) or a decimal carrying the `k`
/// thousands suffix (`"1.2k"` → `1200.0`). Negative and non-finite results are
/// rejected so every value in a table can be plotted as-is.
pub fn normalize(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    // Only a single trailing `k` scales; any other `k` fails the digit check.
    let (digits, factor) = match trimmed.strip_suffix(THOUSANDS_SUFFIX) {
        Some(d) => (d, 1000.0),
        None => (trimmed, 1.0),
    };

    let err = || ParseError {
        raw: raw.to_string(),
    };

    // `f64::from_str` accepts "inf"/"NaN"; only plain decimals make sense here.
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(err());
    }
    let value = digits.parse::<f64>().map_err(|_| err())? * factor;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(err())
    }
}
