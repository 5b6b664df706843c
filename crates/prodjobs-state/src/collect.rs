//! Group scheduler job ids by pipeline job category.

use prodjobs_core::{ProcessingTable, ProductionConfig, ZpixError, find_zpix_job_ids};
use prodjobs_slurm::JobId;
use std::collections::BTreeMap;
use thiserror::Error;

/// Job category recovered from healpix logs rather than processing tables.
pub const ZPIX_JOBDESC: &str = "zpix";

/// Job ids per job category, ids kept in discovery order.
pub type JobIdsByCategory = BTreeMap<String, Vec<JobId>>;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Zpix(#[from] ZpixError),
}

/// Concatenate each category's job ids across all tables.
///
/// Within a table ids follow row order; tables are appended in the order given.
pub fn group_job_ids(tables: &[ProcessingTable]) -> JobIdsByCategory {
    let mut by_category = JobIdsByCategory::new();
    for table in tables {
        for jobdesc in table.jobdescs() {
            by_category
                .entry(jobdesc.to_string())
                .or_default()
                .extend(table.job_ids_for(jobdesc));
        }
    }
    by_category
}

/// Group job ids from processing tables, then add zpix ids from the log scan.
///
/// The zpix entry always comes from the logs, replacing any zpix rows the
/// tables might carry.
pub fn collect_job_ids_by_category(
    tables: &[ProcessingTable],
    production: &ProductionConfig,
) -> Result<JobIdsByCategory, CollectError> {
    let mut by_category = group_job_ids(tables);
    by_category.insert(ZPIX_JOBDESC.to_string(), find_zpix_job_ids(production)?);

    for (jobdesc, ids) in &by_category {
        tracing::debug!("{}: {} job ids", jobdesc, ids.len());
    }
    Ok(by_category)
}
