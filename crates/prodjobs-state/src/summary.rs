//! Reduce the accounting table to one row per job category.

use crate::types::{QueueInfoRow, QueueInfoTable, ResourceClass, SummaryRow};
use prodjobs_parsers::round_to;
use thiserror::Error;

/// Job categories reported in the summary, in output order.
pub const SUMMARY_JOBDESCS: [&str; 10] = [
    "linkcal",
    "nightlybias",
    "ccdcalib",
    "arc",
    "psfnight",
    "flat",
    "nightlyflat",
    "tilenight",
    "cumulative",
    "zpix",
];

/// Outcome states counted per category, in output order.
pub const TRACKED_STATES: [&str; 5] =
    ["COMPLETED", "TIMEOUT", "FAILED", "CANCELLED", "NODE_FAIL"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SummaryError {
    #[error("No {0} jobs in the accounting table")]
    EmptyCategory(String),
    #[error("{jobdesc} jobs mix CPU and GPU nodes")]
    MixedResourceClass { jobdesc: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    /// Fail when a category mixes CPU and GPU jobs instead of reporting
    /// the first job's class.
    pub strict_resource_class: bool,
}

/// Summarize with default options.
pub fn summarize(qinfo: &QueueInfoTable) -> Result<Vec<SummaryRow>, SummaryError> {
    summarize_with(qinfo, SummaryOptions::default())
}

/// One summary row per category in [`SUMMARY_JOBDESCS`].
///
/// Percentages are relative to the node-hours of every row in the table,
/// including categories that are not reported.
pub fn summarize_with(
    qinfo: &QueueInfoTable,
    options: SummaryOptions,
) -> Result<Vec<SummaryRow>, SummaryError> {
    let total_hours = qinfo.total_node_hours();

    SUMMARY_JOBDESCS
        .iter()
        .map(|jobdesc| {
            let rows: Vec<&QueueInfoRow> = qinfo.rows_for(jobdesc).collect();
            summarize_category(jobdesc, &rows, total_hours, options)
        })
        .collect()
}

fn summarize_category(
    jobdesc: &str,
    rows: &[&QueueInfoRow],
    total_hours: f64,
    options: SummaryOptions,
) -> Result<SummaryRow, SummaryError> {
    let first = rows
        .first()
        .ok_or_else(|| SummaryError::EmptyCategory(jobdesc.to_string()))?;

    if options.strict_resource_class && rows.iter().any(|r| r.is_gpu() != first.is_gpu()) {
        return Err(SummaryError::MixedResourceClass {
            jobdesc: jobdesc.to_string(),
        });
    }

    let node_hours = round_to(rows.iter().map(|r| r.node_hours).sum(), 1);
    let percent = if total_hours > 0.0 {
        round_to(100.0 * node_hours / total_hours, 1)
    } else {
        0.0
    };

    let [completed, timeout, failed, cancelled, node_fail] =
        TRACKED_STATES.map(|state| rows.iter().filter(|r| r.state == state).count());

    Ok(SummaryRow {
        jobdesc: jobdesc.to_string(),
        cpugpu: ResourceClass::from_gpu_flag(first.is_gpu()),
        node_hours,
        percent,
        completed,
        timeout,
        failed,
        cancelled,
        node_fail,
    })
}
