//! Shared parsing utilities for scheduler accounting output.
//!
//! Used by prodjobs-slurm for `sacct` lines and by prodjobs-state for
//! the elapsed-time and rounding rules applied to the aggregated table.

pub mod command;
pub mod time;

pub use command::{CommandError, run_command};
pub use time::{ParseError, elapsed_to_hours, format_elapsed, round_to};

/// Split a pipe-delimited line and validate field count.
pub fn split_delimited(line: &str, min_fields: usize) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < min_fields {
        return Err(format!(
            "Expected {} fields, got {}: {}",
            min_fields,
            fields.len(),
            line
        ));
    }
    Ok(fields)
}
