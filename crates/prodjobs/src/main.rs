//! prodjobs - node-hours and job outcomes for a spectroscopic production.

mod pipeline;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use prodjobs_cli::Args;
use prodjobs_core::ProductionConfig;
use prodjobs_slurm::SacctProvider;
use prodjobs_state::{SummaryOptions, summarize_with};
use prodjobs_tables::{TableFile, format_queue_info, format_summary};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let qinfo = match &args.input {
        Some(path) => TableFile::new(path.clone())
            .read_queue_info()
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path))?,
        None => {
            let production =
                ProductionConfig::from_env(args.specprod.as_deref(), args.redux_dir.as_deref())
                    .into_diagnostic()?;
            pipeline::load_qinfo(&production, &SacctProvider::new())?
        }
    };

    if let Some(path) = &args.output {
        TableFile::new(path.clone())
            .write_queue_info(&qinfo, args.overwrite)
            .into_diagnostic()?;
    }

    let options = SummaryOptions {
        strict_resource_class: args.strict_cpugpu,
    };
    let summary = summarize_with(&qinfo, options).into_diagnostic()?;

    if let Some(path) = &args.summary {
        TableFile::new(path.clone())
            .write_summary(&summary, args.overwrite)
            .into_diagnostic()?;
    }

    println!("{}", format_summary(&summary));

    if args.debug {
        println!();
        println!("{}", format_queue_info(&qinfo));
    }

    Ok(())
}
