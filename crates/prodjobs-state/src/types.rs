//! Aggregated accounting and summary table types.

use prodjobs_slurm::JobId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One accounting record tagged with its job category and derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct QueueInfoRow {
    pub jobid: JobId,
    pub jobname: String,
    pub partition: String,
    pub constraints: String,
    pub nnodes: u32,
    pub submit: String,
    pub eligible: String,
    pub start: String,
    pub end: String,
    pub elapsed: String,
    pub state: String,
    pub exitcode: String,
    pub jobdesc: String,

    /// Elapsed hours times nodes, rounded to 4 decimals
    pub node_hours: f64,

    /// 1 if the job requested GPU nodes
    pub gpu: u8,
}

impl QueueInfoRow {
    pub fn is_gpu(&self) -> bool {
        self.gpu != 0
    }
}

/// Accounting records for every job of a production.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct QueueInfoTable {
    /// Production the records were gathered for
    pub specprod: String,

    pub rows: Vec<QueueInfoRow>,
}

impl QueueInfoTable {
    pub fn new(specprod: impl Into<String>, rows: Vec<QueueInfoRow>) -> Self {
        Self {
            specprod: specprod.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one job category.
    pub fn rows_for<'a>(&'a self, jobdesc: &'a str) -> impl Iterator<Item = &'a QueueInfoRow> + 'a {
        self.rows.iter().filter(move |r| r.jobdesc == jobdesc)
    }

    /// Sum of node-hours over every row.
    pub fn total_node_hours(&self) -> f64 {
        self.rows.iter().map(|r| r.node_hours).sum()
    }
}

/// CPU or GPU nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    Cpu,
    Gpu,
}

impl ResourceClass {
    pub fn from_gpu_flag(gpu: bool) -> Self {
        if gpu { Self::Gpu } else { Self::Cpu }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage and outcomes of one job category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SummaryRow {
    pub jobdesc: String,
    pub cpugpu: ResourceClass,

    /// Rounded to 1 decimal
    pub node_hours: f64,

    /// Share of all node-hours in the table, rounded to 1 decimal
    pub percent: f64,

    pub completed: usize,
    pub timeout: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub node_fail: usize,
}

impl SummaryRow {
    /// Count for one of the tracked outcome states.
    pub fn state_count(&self, state: &str) -> Option<usize> {
        match state {
            "COMPLETED" => Some(self.completed),
            "TIMEOUT" => Some(self.timeout),
            "FAILED" => Some(self.failed),
            "CANCELLED" => Some(self.cancelled),
            "NODE_FAIL" => Some(self.node_fail),
            _ => None,
        }
    }
}
