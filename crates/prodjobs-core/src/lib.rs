//! Production layout and processing-table discovery for prodjobs.
//!
//! This crate knows where a production keeps its per-night processing
//! tables and healpix job logs, and how to read them.

pub mod proctable;
pub mod production;
pub mod zpix;

pub use proctable::{ProcTableError, ProcessingTable, TaskRow, load_proctable, load_proctables};
pub use production::{ProductionConfig, ProductionError};
pub use zpix::{ZpixError, find_zpix_job_ids, parse_zpix_job_id};
