//! The accounting-query seam.

use crate::types::{JobId, JobRecord};
use prodjobs_parsers::CommandError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to execute sacct: {0}")]
    Execution(#[from] CommandError),
    #[error("Failed to parse sacct output: {0}")]
    Parse(String),
    #[error("Required column {0:?} not requested")]
    MissingColumn(String),
}

/// Source of per-job accounting records.
///
/// Given job ids and the column names to fetch, returns one record per id
/// in whatever order the backend produces.
pub trait QueueInfoProvider {
    fn queue_info(
        &self,
        job_ids: &[JobId],
        columns: &[&str],
    ) -> Result<Vec<JobRecord>, QueueError>;
}

impl<P: QueueInfoProvider + ?Sized> QueueInfoProvider for &P {
    fn queue_info(
        &self,
        job_ids: &[JobId],
        columns: &[&str],
    ) -> Result<Vec<JobRecord>, QueueError> {
        (**self).queue_info(job_ids, columns)
    }
}
