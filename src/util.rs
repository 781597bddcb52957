// Utility helpers for numeric coercion and display formatting.
//
// Vehicle records keep every field as the raw CSV string. Anything numeric is
// coerced here, at aggregation time, so a malformed cell becomes zero instead
// of an error.
use num_format::{Locale, ToFormattedString};

/// Electric Range style cell as a number.
///
/// The export writes ranges as plain integers, but hand-edited copies show up
/// with padding or a `1,200` separator. Those parse; `n/a`, `unknown` and
/// other text do not.
pub fn parse_f64_safe(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    cell.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Model Year cell as an integer. Padding is ignored.
pub fn parse_i32_safe(cell: &str) -> Option<i32> {
    match cell.trim() {
        "" => None,
        year => year.parse().ok(),
    }
}

/// Numeric value of a raw field, or `0.0` when it is absent or malformed.
pub fn coerce_f64(s: &str) -> f64 {
    parse_f64_safe(s).unwrap_or(0.0)
}

/// Integer value of a raw field, or `0` when it is absent or malformed.
pub fn coerce_i32(s: &str) -> i32 {
    parse_i32_safe(s).unwrap_or(0)
}

/// Averages and shares for the overview cards and chart tables, e.g.
/// `68.2` for an average range or `1,234.5` for a large one.
pub fn format_number(n: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, n.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let whole: u64 = whole.parse().unwrap_or(0);
    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    out.push_str(&whole.to_formatted_string(&Locale::en));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Vehicle and bucket counts with `,` grouping.
pub fn format_int<T: ToFormattedString>(n: T) -> String {
    n.to_formatted_string(&Locale::en)
}
