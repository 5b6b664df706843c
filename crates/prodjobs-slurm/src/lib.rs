//! SLURM integration for prodjobs.
//!
//! Read-only accounting queries via sacct.

pub mod provider;
pub mod sacct;
pub mod types;

pub use provider::{QueueError, QueueInfoProvider};
pub use sacct::SacctProvider;
pub use types::{JobId, JobRecord, QUEUE_INFO_COLUMNS};
