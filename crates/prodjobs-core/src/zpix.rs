//! Healpix (zpix) job ids recovered from log filenames.
//!
//! zpix submissions are not recorded in the processing tables, but every
//! job leaves `run/scripts/healpix/{survey}/{program}/{group}/zpix-...-{jobid}.log`.

use crate::production::ProductionConfig;
use camino::{Utf8Path, Utf8PathBuf};
use prodjobs_slurm::JobId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZpixError {
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory levels between the healpix script directory and the logs.
const LOG_DEPTH: usize = 3;

/// Parse the job id from a zpix log filename.
///
/// The id is the last `-` separated token of the file stem.
pub fn parse_zpix_job_id(path: &Utf8Path) -> Option<JobId> {
    path.file_stem()?.rsplit('-').next()?.parse().ok()
}

fn is_hidden(path: &Utf8Path) -> bool {
    path.file_name().map(|n| n.starts_with('.')).unwrap_or(false)
}

/// Visible entries of `dir`, sorted, filtered by `keep`.
fn list_dir(
    dir: &Utf8Path,
    keep: impl Fn(&Utf8Path) -> bool,
) -> Result<Vec<Utf8PathBuf>, ZpixError> {
    let io_err = |source| ZpixError::Io {
        path: dir.to_owned(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let Ok(path) = Utf8PathBuf::try_from(entry.path()) else {
            tracing::warn!("Skipping non UTF-8 path in {}", dir);
            continue;
        };
        if !is_hidden(&path) && keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_zpix_log(path: &Utf8Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .map(|n| n.starts_with("zpix-") && n.ends_with(".log"))
            .unwrap_or(false)
}

/// Find zpix log files three directory levels below the healpix script dir.
fn find_zpix_logs(production: &ProductionConfig) -> Result<Vec<Utf8PathBuf>, ZpixError> {
    let base = production.healpix_script_dir();
    if !base.is_dir() {
        return Ok(vec![]);
    }

    let mut dirs = vec![base];
    for _ in 0..LOG_DEPTH {
        let mut next = Vec::new();
        for dir in &dirs {
            next.extend(list_dir(dir, |p| p.is_dir())?);
        }
        dirs = next;
    }

    let mut logs = Vec::new();
    for dir in &dirs {
        logs.extend(list_dir(dir, is_zpix_log)?);
    }
    logs.sort();
    Ok(logs)
}

/// Collect zpix job ids from log filenames.
///
/// Filenames without an integer id are logged and skipped.
pub fn find_zpix_job_ids(production: &ProductionConfig) -> Result<Vec<JobId>, ZpixError> {
    let logs = find_zpix_logs(production)?;

    let mut ids = Vec::with_capacity(logs.len());
    for path in logs {
        match parse_zpix_job_id(&path) {
            Some(id) => ids.push(id),
            None => tracing::error!("Unable to parse integer job id from {}; skipping", path),
        }
    }

    tracing::debug!("Found {} zpix job ids", ids.len());
    Ok(ids)
}
