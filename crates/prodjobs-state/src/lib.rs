//! Job accounting aggregation for prodjobs.
//!
//! Groups scheduler job ids by pipeline job category, merges their
//! accounting records into one table, and reduces it to a summary.

pub mod aggregate;
pub mod collect;
pub mod summary;
pub mod types;

pub use aggregate::{AggregateError, build_queue_info, is_gpu_constraint, normalize_state};
pub use collect::{CollectError, JobIdsByCategory, collect_job_ids_by_category, group_job_ids};
pub use summary::{
    SUMMARY_JOBDESCS, SummaryError, SummaryOptions, TRACKED_STATES, summarize, summarize_with,
};
pub use types::{QueueInfoRow, QueueInfoTable, ResourceClass, SummaryRow};
