//! SLURM accounting record types.

use serde::{Deserialize, Serialize};

/// Scheduler job identifier.
pub type JobId = u64;

/// Columns requested from the accounting service, in output order.
pub const QUEUE_INFO_COLUMNS: [&str; 12] = [
    "jobid",
    "jobname",
    "partition",
    "constraints",
    "nnodes",
    "submit",
    "eligible",
    "start",
    "end",
    "elapsed",
    "state",
    "exitcode",
];

/// One accounting record per scheduler job.
///
/// Timestamps, elapsed time and state are kept as the scheduler reported
/// them; derived values are computed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub jobid: JobId,
    pub jobname: String,
    pub partition: String,

    /// Free-text resource tags (e.g. "cpu", "gpu&hbm80g")
    pub constraints: String,

    pub nnodes: u32,
    pub submit: String,
    pub eligible: String,
    pub start: String,
    pub end: String,

    /// Wall time as HH:MM:SS, hours unbounded
    pub elapsed: String,

    /// Scheduler outcome, possibly with a suffix ("CANCELLED by 12345")
    pub state: String,

    /// exit_code:signal
    pub exitcode: String,
}
