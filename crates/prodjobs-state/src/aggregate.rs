//! Merge per-category accounting records into one table.

use crate::collect::JobIdsByCategory;
use crate::types::{QueueInfoRow, QueueInfoTable};
use prodjobs_core::ProductionConfig;
use prodjobs_parsers::{ParseError, elapsed_to_hours, round_to};
use prodjobs_slurm::{JobId, JobRecord, QUEUE_INFO_COLUMNS, QueueError, QueueInfoProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Accounting query for {jobdesc} jobs failed: {source}")]
    Provider {
        jobdesc: String,
        #[source]
        source: QueueError,
    },
    #[error("Job {jobid} ({jobdesc}): {source}")]
    Elapsed {
        jobid: JobId,
        jobdesc: String,
        #[source]
        source: ParseError,
    },
}

/// Collapse "CANCELLED by <uid>" into "CANCELLED".
pub fn normalize_state(state: &str) -> String {
    if state.starts_with("CANCELLED by") {
        "CANCELLED".to_string()
    } else {
        state.to_string()
    }
}

/// Whether a constraint string requests GPU nodes.
pub fn is_gpu_constraint(constraints: &str) -> bool {
    constraints.contains("gpu")
}

fn derive_row(record: JobRecord, jobdesc: &str) -> Result<QueueInfoRow, AggregateError> {
    let hours = elapsed_to_hours(&record.elapsed).map_err(|source| AggregateError::Elapsed {
        jobid: record.jobid,
        jobdesc: jobdesc.to_string(),
        source,
    })?;

    Ok(QueueInfoRow {
        state: normalize_state(&record.state),
        gpu: u8::from(is_gpu_constraint(&record.constraints)),
        node_hours: round_to(hours * f64::from(record.nnodes), 4),
        jobdesc: jobdesc.to_string(),
        jobid: record.jobid,
        jobname: record.jobname,
        partition: record.partition,
        constraints: record.constraints,
        nnodes: record.nnodes,
        submit: record.submit,
        eligible: record.eligible,
        start: record.start,
        end: record.end,
        elapsed: record.elapsed,
        exitcode: record.exitcode,
    })
}

/// Query accounting records for every category and build the unified table.
///
/// Records are tagged with their category and kept as-is across categories,
/// so a job id listed under two categories yields two rows. Any provider
/// failure or malformed elapsed time aborts the whole build.
pub fn build_queue_info<P>(
    categorized: &JobIdsByCategory,
    provider: &P,
    production: &ProductionConfig,
) -> Result<QueueInfoTable, AggregateError>
where
    P: QueueInfoProvider + ?Sized,
{
    let mut tagged: Vec<(&str, JobRecord)> = Vec::new();
    for (jobdesc, ids) in categorized {
        let records = provider
            .queue_info(ids, &QUEUE_INFO_COLUMNS)
            .map_err(|source| AggregateError::Provider {
                jobdesc: jobdesc.clone(),
                source,
            })?;
        tracing::info!(
            "{}: {} accounting records for {} job ids",
            jobdesc,
            records.len(),
            ids.len()
        );
        tagged.extend(records.into_iter().map(|r| (jobdesc.as_str(), r)));
    }

    let rows = tagged
        .into_iter()
        .map(|(jobdesc, record)| derive_row(record, jobdesc))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QueueInfoTable::new(production.specprod.clone(), rows))
}
