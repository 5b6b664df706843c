//! Table persistence and terminal rendering for prodjobs.
//!
//! Reads and writes the aggregated job table and the summary as CSV or
//! JSON, and formats both as fixed-width text.

pub mod display;
pub mod store;

pub use display::{format_queue_info, format_summary};
pub use store::{TableError, TableFile, TableFormat};
