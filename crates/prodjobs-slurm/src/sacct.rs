//! Query SLURM job accounting via sacct.

use crate::provider::{QueueError, QueueInfoProvider};
use crate::types::{JobId, JobRecord};
use prodjobs_parsers::{format_elapsed, run_command, split_delimited};
use std::process::Command;

/// Job ids per sacct invocation; keeps the `-j` argument a manageable length.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Accounting provider backed by the `sacct` command.
#[derive(Debug, Clone)]
pub struct SacctProvider {
    program: String,
    batch_size: usize,
}

impl Default for SacctProvider {
    fn default() -> Self {
        Self {
            program: "sacct".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SacctProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (a wrapper script or a test double).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn query_batch(
        &self,
        job_ids: &[JobId],
        columns: &[&str],
    ) -> Result<Vec<JobRecord>, QueueError> {
        let ids = job_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut cmd = Command::new(&self.program);
        cmd.args(["-X", "--parsable2", "--noheader", "--format"]);
        cmd.arg(columns.join(","));
        cmd.args(["-j", &ids]);

        let stdout = run_command(&mut cmd, &self.program)?;

        let mut records = Vec::with_capacity(job_ids.len());
        for line in stdout.lines() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_sacct_line(line, columns)?);
        }
        Ok(records)
    }
}

impl QueueInfoProvider for SacctProvider {
    fn queue_info(
        &self,
        job_ids: &[JobId],
        columns: &[&str],
    ) -> Result<Vec<JobRecord>, QueueError> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::with_capacity(job_ids.len());
        for batch in job_ids.chunks(self.batch_size) {
            tracing::debug!("Querying sacct for {} jobs", batch.len());
            records.extend(self.query_batch(batch, columns)?);
        }

        if records.len() != job_ids.len() {
            tracing::debug!(
                "sacct returned {} records for {} job ids",
                records.len(),
                job_ids.len()
            );
        }
        Ok(records)
    }
}

/// Convert sacct's `D-HH:MM:SS` elapsed form to `HH:MM:SS` with unbounded hours.
///
/// Values without a day prefix, or that do not parse, are returned unchanged.
pub fn normalize_elapsed(s: &str) -> String {
    let Some((days, rest)) = s.split_once('-') else {
        return s.to_string();
    };

    let Ok(days) = days.parse::<u64>() else {
        return s.to_string();
    };
    let parts: Vec<u64> = rest.split(':').filter_map(|p| p.parse().ok()).collect();
    match parts.as_slice() {
        [hh, mm, ss] if rest.split(':').count() == 3 => {
            format_elapsed(days * 86400 + hh * 3600 + mm * 60 + ss)
        }
        _ => s.to_string(),
    }
}

/// Parse a single line of sacct output into a record.
///
/// Fields are matched to `columns` by position.
fn parse_sacct_line(line: &str, columns: &[&str]) -> Result<JobRecord, QueueError> {
    let fields = split_delimited(line, columns.len()).map_err(QueueError::Parse)?;

    let field = |name: &str| {
        columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|i| fields[i].trim())
            .ok_or_else(|| QueueError::MissingColumn(name.to_string()))
    };

    let jobid = field("jobid")?;
    let jobid = jobid
        .parse()
        .map_err(|_| QueueError::Parse(format!("Invalid job id {:?}: {}", jobid, line)))?;

    let nnodes = field("nnodes")?;
    let nnodes = nnodes
        .parse()
        .map_err(|_| QueueError::Parse(format!("Invalid node count {:?}: {}", nnodes, line)))?;

    Ok(JobRecord {
        jobid,
        jobname: field("jobname")?.to_string(),
        partition: field("partition")?.to_string(),
        constraints: field("constraints")?.to_string(),
        nnodes,
        submit: field("submit")?.to_string(),
        eligible: field("eligible")?.to_string(),
        start: field("start")?.to_string(),
        end: field("end")?.to_string(),
        elapsed: normalize_elapsed(field("elapsed")?),
        state: field("state")?.to_string(),
        exitcode: field("exitcode")?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QUEUE_INFO_COLUMNS;

    const LINE: &str = concat!(
        "4012345|tilenight-20231120-1234|gpu_regular|gpu|1|",
        "2023-11-20T18:00:00|2023-11-20T18:00:00|2023-11-20T18:05:00|2023-11-20T18:35:00|",
        "00:30:00|CANCELLED by 12345|0:15"
    );

    #[test]
    fn test_parse_sacct_line() {
        let record = parse_sacct_line(LINE, &QUEUE_INFO_COLUMNS).unwrap();
        assert_eq!(record.jobid, 4012345);
        assert_eq!(record.jobname, "tilenight-20231120-1234");
        assert_eq!(record.constraints, "gpu");
        assert_eq!(record.nnodes, 1);
        assert_eq!(record.elapsed, "00:30:00");
        // state suffixes are left for the aggregator to normalize
        assert_eq!(record.state, "CANCELLED by 12345");
        assert_eq!(record.exitcode, "0:15");
    }

    #[test]
    fn test_parse_sacct_line_short() {
        let err = parse_sacct_line("4012345|arc", &QUEUE_INFO_COLUMNS).unwrap_err();
        assert!(matches!(err, QueueError::Parse(_)));
    }

    #[test]
    fn test_parse_sacct_line_bad_jobid() {
        let line = LINE.replacen("4012345", "4012345_7", 1);
        let err = parse_sacct_line(&line, &QUEUE_INFO_COLUMNS).unwrap_err();
        assert!(matches!(err, QueueError::Parse(_)));
    }

    #[test]
    fn test_parse_sacct_line_missing_column() {
        let columns = &QUEUE_INFO_COLUMNS[..11];
        let err = parse_sacct_line(LINE, columns).unwrap_err();
        assert!(matches!(err, QueueError::MissingColumn(c) if c == "exitcode"));
    }

    #[test]
    fn test_normalize_elapsed() {
        assert_eq!(normalize_elapsed("01:30:00"), "01:30:00");
        assert_eq!(normalize_elapsed("1-02:03:04"), "26:03:04");
        assert_eq!(normalize_elapsed("2-00:00:00"), "48:00:00");
        assert_eq!(normalize_elapsed("x-00:00:00"), "x-00:00:00");
        assert_eq!(normalize_elapsed("1-00:00"), "1-00:00");
    }

    #[test]
    fn test_empty_ids_skip_sacct() {
        let provider = SacctProvider::new().with_program("nonexistent_sacct_12345");
        let records = provider.queue_info(&[], &QUEUE_INFO_COLUMNS).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_sacct_is_an_error() {
        let provider = SacctProvider::new().with_program("nonexistent_sacct_12345");
        let err = provider.queue_info(&[1, 2], &QUEUE_INFO_COLUMNS).unwrap_err();
        assert!(matches!(err, QueueError::Execution(_)));
    }

    #[test]
    fn test_batches_through_stub_command() {
        // echo output is not a record line
        let provider = SacctProvider::new().with_program("echo").with_batch_size(1);
        let err = provider.queue_info(&[1, 2], &QUEUE_INFO_COLUMNS).unwrap_err();
        assert!(matches!(err, QueueError::Parse(_)));
    }
}
