//! Time parsing utilities for scheduler output.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Elapsed time {0:?} is not of the form HH:MM:SS")]
    ElapsedShape(String),
    #[error("Elapsed time {value:?} has a non-integer field {field:?}")]
    ElapsedField { value: String, field: String },
}

/// Convert an `HH:MM:SS` elapsed string into fractional hours.
///
/// Hours are unbounded (`100:00:00` is valid). Anything other than exactly
/// three colon-separated integer fields is rejected.
pub fn elapsed_to_hours(s: &str) -> Result<f64, ParseError> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(ParseError::ElapsedShape(s.to_string()));
    }

    let mut values = [0u64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| ParseError::ElapsedField {
            value: s.to_string(),
            field: part.to_string(),
        })?;
    }

    let [hh, mm, ss] = values;
    Ok(hh as f64 + mm as f64 / 60.0 + ss as f64 / 3600.0)
}

/// Format seconds as `HH:MM:SS` with unbounded hours.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

/// Round to a fixed number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
