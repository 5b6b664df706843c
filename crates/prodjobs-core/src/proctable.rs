//! Per-night processing tables.

use crate::production::ProductionConfig;
use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::Lazy;
use prodjobs_slurm::JobId;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use thiserror::Error;

/// `processing_table_{specprod}-{night}.csv`, night restricted to `202?????`.
static PROCTABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^processing_table_(?P<specprod>.+)-(?P<night>202\d{5})\.csv$")
        .expect("processing table pattern is valid")
});

#[derive(Error, Debug)]
pub enum ProcTableError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read processing table {path}: {source}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One pipeline task from a processing table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRow {
    /// Job category, e.g. "arc" or "tilenight"
    #[serde(rename = "JOBDESC")]
    pub jobdesc: String,

    /// Every scheduler job id submitted for this task, resubmissions included
    #[serde(rename = "ALL_QIDS", default, deserialize_with = "deserialize_qids")]
    pub all_qids: Vec<JobId>,
}

/// All tasks recorded for one night.
#[derive(Debug, Clone)]
pub struct ProcessingTable {
    pub night: u32,
    pub path: Utf8PathBuf,
    pub rows: Vec<TaskRow>,
}

impl ProcessingTable {
    /// Distinct job categories present, sorted.
    pub fn jobdescs(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.jobdesc.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Job ids of every row in `jobdesc`, in row order.
    pub fn job_ids_for(&self, jobdesc: &str) -> Vec<JobId> {
        self.rows
            .iter()
            .filter(|r| r.jobdesc == jobdesc)
            .flat_map(|r| r.all_qids.iter().copied())
            .collect()
    }
}

/// Parse a `|`-delimited id list such as `|4012345|4012399|`.
pub fn parse_qid_list(raw: &str) -> Result<Vec<JobId>, String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| format!("Invalid job id {:?} in {:?}", s, raw))
        })
        .collect()
}

fn deserialize_qids<'de, D>(deserializer: D) -> Result<Vec<JobId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    parse_qid_list(&raw).map_err(serde::de::Error::custom)
}

/// Load a single processing table.
pub fn load_proctable(path: &Utf8Path, night: u32) -> Result<ProcessingTable, ProcTableError> {
    let csv_err = |source| ProcTableError::Csv {
        path: path.to_owned(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let rows = reader
        .deserialize::<TaskRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    Ok(ProcessingTable {
        night,
        path: path.to_owned(),
        rows,
    })
}

/// Find every processing table of a production, ordered by night.
fn find_proctables(
    production: &ProductionConfig,
) -> Result<Vec<(u32, Utf8PathBuf)>, ProcTableError> {
    let dir = production.proctable_dir();
    if !dir.is_dir() {
        return Ok(vec![]);
    }

    let io_err = |source| ProcTableError::Io {
        path: dir.clone(),
        source,
    };

    let mut found = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let Ok(path) = Utf8PathBuf::try_from(entry.path()) else {
            tracing::warn!("Skipping non UTF-8 path in {}", dir);
            continue;
        };

        let Some(caps) = path.file_name().and_then(|n| PROCTABLE_NAME.captures(n)) else {
            continue;
        };
        if caps["specprod"] != production.specprod {
            continue;
        }
        if let Ok(night) = caps["night"].parse::<u32>() {
            found.push((night, path));
        }
    }

    found.sort();
    Ok(found)
}

/// Load all processing tables for a production.
///
/// Returns an empty list when the production has no tables yet.
pub fn load_proctables(
    production: &ProductionConfig,
) -> Result<Vec<ProcessingTable>, ProcTableError> {
    let found = find_proctables(production)?;
    tracing::debug!(
        "Found {} processing tables under {}",
        found.len(),
        production.proctable_dir()
    );

    found
        .into_iter()
        .map(|(night, path)| {
            tracing::debug!("Loading {}", path);
            load_proctable(&path, night)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "EXPID,OBSTYPE,TILEID,NIGHT,INTID,JOBDESC,LATEST_QID,ALL_QIDS,STATUS\n";

    fn production(temp: &TempDir) -> ProductionConfig {
        ProductionConfig::new(Utf8Path::from_path(temp.path()).unwrap(), "kibo")
    }

    fn write_table(prod: &ProductionConfig, name: &str, body: &str) {
        let dir = prod.proctable_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), format!("{HEADER}{body}")).unwrap();
    }

    #[test]
    fn test_parse_qid_list() {
        assert_eq!(parse_qid_list("|4012345|4012399|").unwrap(), vec![4012345, 4012399]);
        assert_eq!(parse_qid_list("4012345").unwrap(), vec![4012345]);
        assert!(parse_qid_list("|").unwrap().is_empty());
        assert!(parse_qid_list("").unwrap().is_empty());
        assert!(parse_qid_list("|12|abc|").is_err());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let tables = load_proctables(&production(&temp)).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_load_proctables_in_night_order() {
        let temp = TempDir::new().unwrap();
        let prod = production(&temp);
        write_table(
            &prod,
            "processing_table_kibo-20231121.csv",
            "|201|,arc,0,20231121,1,arc,402,|402|,COMPLETED\n",
        );
        write_table(
            &prod,
            "processing_table_kibo-20231120.csv",
            "|101|,arc,0,20231120,1,arc,302,|301|302|,COMPLETED\n\
             |102|,flat,0,20231120,2,flat,303,|303|,COMPLETED\n",
        );
        // wrong production, wrong night shape, not a table
        write_table(&prod, "processing_table_daily-20231122.csv", "");
        write_table(&prod, "processing_table_kibo-19991231.csv", "");
        write_table(&prod, "notes.csv", "");

        let tables = load_proctables(&prod).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].night, 20231120);
        assert_eq!(tables[1].night, 20231121);

        assert_eq!(tables[0].jobdescs(), vec!["arc", "flat"]);
        assert_eq!(tables[0].job_ids_for("arc"), vec![301, 302]);
        assert_eq!(tables[0].job_ids_for("flat"), vec![303]);
        assert!(tables[0].job_ids_for("zpix").is_empty());
        assert_eq!(tables[1].job_ids_for("arc"), vec![402]);
    }

    #[test]
    fn test_empty_qid_cell() {
        let temp = TempDir::new().unwrap();
        let prod = production(&temp);
        write_table(
            &prod,
            "processing_table_kibo-20231120.csv",
            "|101|,arc,0,20231120,1,arc,-99,,UNSUBMITTED\n",
        );
        let tables = load_proctables(&prod).unwrap();
        assert!(tables[0].rows[0].all_qids.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let prod = production(&temp);
        write_table(
            &prod,
            "processing_table_kibo-20231120.csv",
            "|101|,arc,0,20231120,1,arc,301,|301|,COMPLETED\n",
        );
        let odd = OsStr::from_bytes(b"processing_table_kibo-\xff.csv");
        std::fs::write(prod.proctable_dir().as_std_path().join(odd), "").unwrap();

        let tables = load_proctables(&prod).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].job_ids_for("arc"), vec![301]);
    }

    #[test]
    fn test_bad_table_is_fatal() {
        let temp = TempDir::new().unwrap();
        let prod = production(&temp);
        write_table(
            &prod,
            "processing_table_kibo-20231120.csv",
            "|101|,arc,0,20231120,1,arc,301,|x|,COMPLETED\n",
        );
        let err = load_proctables(&prod).unwrap_err();
        assert!(matches!(err, ProcTableError::Csv { .. }));
    }
}
