//! CLI argument parsing for prodjobs.

use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "prodjobs")]
#[command(about = "Summarize SLURM node-hours and job outcomes for a production")]
pub struct Args {
    /// Input table of jobs (from a prior run with --output)
    #[arg(short, long)]
    pub input: Option<Utf8PathBuf>,

    /// Output table of jobs (.csv or .json)
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Save summary table to this file (.csv or .json)
    #[arg(long)]
    pub summary: Option<Utf8PathBuf>,

    /// Production name; overrides $SPECPROD
    #[arg(short, long)]
    pub specprod: Option<String>,

    /// Directory holding productions; overrides $DESI_SPECTRO_REDUX
    #[arg(long)]
    pub redux_dir: Option<Utf8PathBuf>,

    /// Overwrite pre-existing --output and --summary files
    #[arg(long)]
    pub overwrite: bool,

    /// Fail if a job category mixes CPU and GPU jobs
    #[arg(long)]
    pub strict_cpugpu: bool,

    /// Debug logging, and print the full job table after the summary
    #[arg(long)]
    pub debug: bool,
}
