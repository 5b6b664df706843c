//! Gather accounting records for a production.

use miette::{IntoDiagnostic, Result, WrapErr};
use prodjobs_core::{ProductionConfig, load_proctables};
use prodjobs_slurm::QueueInfoProvider;
use prodjobs_state::{QueueInfoTable, build_queue_info, collect_job_ids_by_category};

/// Load processing tables, group job ids by category, and query their
/// accounting records.
pub fn load_qinfo<P>(production: &ProductionConfig, provider: &P) -> Result<QueueInfoTable>
where
    P: QueueInfoProvider + ?Sized,
{
    let tables = load_proctables(production).into_diagnostic()?;
    tracing::info!(
        "Loaded {} processing tables for {}",
        tables.len(),
        production.specprod
    );

    let job_ids = collect_job_ids_by_category(&tables, production).into_diagnostic()?;
    let qinfo = build_queue_info(&job_ids, provider, production)
        .into_diagnostic()
        .wrap_err("Failed to gather accounting records")?;

    tracing::info!(
        "{} jobs, {:.1} node-hours",
        qinfo.len(),
        qinfo.total_node_hours()
    );
    Ok(qinfo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use prodjobs_slurm::{JobId, JobRecord, QueueError};
    use prodjobs_state::summarize;
    use tempfile::TempDir;

    /// Every job ran one hour; GPU jobs are the ones with ids >= 500.
    struct HourlyProvider;

    impl QueueInfoProvider for HourlyProvider {
        fn queue_info(&self, job_ids: &[JobId], _: &[&str]) -> Result<Vec<JobRecord>, QueueError> {
            Ok(job_ids
                .iter()
                .map(|&jobid| JobRecord {
                    jobid,
                    jobname: format!("job-{jobid}"),
                    partition: "regular".to_string(),
                    constraints: if jobid >= 500 { "gpu" } else { "cpu" }.to_string(),
                    nnodes: 1,
                    submit: "2023-11-20T18:00:00".to_string(),
                    eligible: "2023-11-20T18:00:00".to_string(),
                    start: "2023-11-20T18:00:00".to_string(),
                    end: "2023-11-20T19:00:00".to_string(),
                    elapsed: "01:00:00".to_string(),
                    state: if jobid % 2 == 0 {
                        "COMPLETED".to_string()
                    } else {
                        "CANCELLED by 42".to_string()
                    },
                    exitcode: "0:0".to_string(),
                })
                .collect())
        }
    }

    fn write(path: &Utf8Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_qinfo_end_to_end() {
        let temp = TempDir::new().unwrap();
        let prod = ProductionConfig::new(Utf8Path::from_path(temp.path()).unwrap(), "kibo");

        let categories = [
            "linkcal",
            "nightlybias",
            "ccdcalib",
            "arc",
            "psfnight",
            "flat",
            "nightlyflat",
            "tilenight",
            "cumulative",
        ];
        let mut body = String::from("JOBDESC,ALL_QIDS\n");
        for (i, jobdesc) in categories.iter().enumerate() {
            let base = if *jobdesc == "tilenight" { 500 } else { 100 };
            body.push_str(&format!("{},|{}|{}|\n", jobdesc, base + 2 * i, base + 2 * i + 1));
        }
        write(
            &prod.proctable_dir().join("processing_table_kibo-20231120.csv"),
            &body,
        );
        write(
            &prod
                .healpix_script_dir()
                .join("main/dark/100/zpix-main-dark-100-900.log"),
            "",
        );

        let qinfo = load_qinfo(&prod, &HourlyProvider).unwrap();
        assert_eq!(qinfo.specprod, "kibo");
        assert_eq!(qinfo.len(), 19);
        assert_eq!(qinfo.total_node_hours(), 19.0);

        let summary = summarize(&qinfo).unwrap();
        let tilenight = summary.iter().find(|r| r.jobdesc == "tilenight").unwrap();
        assert_eq!(tilenight.cpugpu.as_str(), "gpu");
        assert_eq!(tilenight.node_hours, 2.0);
        assert_eq!((tilenight.completed, tilenight.cancelled), (1, 1));

        let zpix = summary.last().unwrap();
        assert_eq!(zpix.jobdesc, "zpix");
        assert_eq!(zpix.node_hours, 1.0);
        assert_eq!(zpix.percent, 5.3);
    }

    #[test]
    fn test_load_qinfo_without_tables() {
        let temp = TempDir::new().unwrap();
        let prod = ProductionConfig::new(Utf8Path::from_path(temp.path()).unwrap(), "kibo");
        let qinfo = load_qinfo(&prod, &HourlyProvider).unwrap();
        assert!(qinfo.is_empty());
        assert!(summarize(&qinfo).is_err());
    }
}
