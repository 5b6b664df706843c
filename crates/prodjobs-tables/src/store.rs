//! CSV and JSON storage for the job and summary tables.

use camino::{Utf8Path, Utf8PathBuf};
use prodjobs_state::{QueueInfoRow, QueueInfoTable, SummaryRow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use thiserror::Error;

/// Column order of the aggregated accounting table.
pub const QUEUE_INFO_HEADER: [&str; 15] = [
    "JOBID",
    "JOBNAME",
    "PARTITION",
    "CONSTRAINTS",
    "NNODES",
    "SUBMIT",
    "ELIGIBLE",
    "START",
    "END",
    "ELAPSED",
    "STATE",
    "EXITCODE",
    "JOBDESC",
    "NODE_HOURS",
    "GPU",
];

/// Column order of the summary table.
pub const SUMMARY_HEADER: [&str; 9] = [
    "JOBDESC",
    "CPUGPU",
    "NODE_HOURS",
    "PERCENT",
    "COMPLETED",
    "TIMEOUT",
    "FAILED",
    "CANCELLED",
    "NODE_FAIL",
];

const SPECPROD_KEY: &str = "# SPECPROD:";

#[derive(Error, Debug)]
pub enum TableError {
    #[error("{0} already exists; pass --overwrite to replace it")]
    Exists(Utf8PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// On-disk table format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// A table file on disk.
pub struct TableFile {
    path: Utf8PathBuf,
    format: TableFormat,
}

impl TableFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let format = TableFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    /// Save the aggregated accounting table.
    ///
    /// CSV files carry the production name in a leading comment line.
    pub fn write_queue_info(
        &self,
        table: &QueueInfoTable,
        overwrite: bool,
    ) -> Result<(), TableError> {
        let content = match self.format {
            TableFormat::Json => serde_json::to_string_pretty(table)?,
            TableFormat::Csv => {
                let body = to_csv(&QUEUE_INFO_HEADER, &table.rows)?;
                format!("{} {}\n{}", SPECPROD_KEY, table.specprod, body)
            }
        };
        self.write(&content, overwrite)?;
        tracing::info!("Wrote {} jobs to {}", table.len(), self.path);
        Ok(())
    }

    /// Load an aggregated accounting table written by [`Self::write_queue_info`].
    pub fn read_queue_info(&self) -> Result<QueueInfoTable, TableError> {
        let content = fs::read_to_string(&self.path)?;
        match self.format {
            TableFormat::Json => Ok(serde_json::from_str(&content)?),
            TableFormat::Csv => {
                let specprod = content
                    .lines()
                    .take_while(|l| l.starts_with('#'))
                    .find_map(|l| l.strip_prefix(SPECPROD_KEY))
                    .map(|v| v.trim().to_string());
                let specprod = specprod.unwrap_or_else(|| {
                    tracing::warn!("No SPECPROD recorded in {}", self.path);
                    String::new()
                });
                let rows: Vec<QueueInfoRow> = from_csv(&content)?;
                Ok(QueueInfoTable::new(specprod, rows))
            }
        }
    }

    /// Save the summary table.
    pub fn write_summary(&self, rows: &[SummaryRow], overwrite: bool) -> Result<(), TableError> {
        let content = match self.format {
            TableFormat::Json => serde_json::to_string_pretty(rows)?,
            TableFormat::Csv => to_csv(&SUMMARY_HEADER, rows)?,
        };
        self.write(&content, overwrite)?;
        tracing::info!("Wrote summary to {}", self.path);
        Ok(())
    }

    /// Load a summary table written by [`Self::write_summary`].
    pub fn read_summary(&self) -> Result<Vec<SummaryRow>, TableError> {
        let content = fs::read_to_string(&self.path)?;
        match self.format {
            TableFormat::Json => Ok(serde_json::from_str(&content)?),
            TableFormat::Csv => from_csv(&content),
        }
    }

    /// Write the file, refusing to replace an existing one unless asked.
    ///
    /// Creates parent directories if needed.
    fn write(&self, content: &str, overwrite: bool) -> Result<(), TableError> {
        if self.path.exists() && !overwrite {
            return Err(TableError::Exists(self.path.clone()));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

fn to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String, TableError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn from_csv<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());
    Ok(reader.deserialize().collect::<Result<Vec<T>, _>>()?)
}
