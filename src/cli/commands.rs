use crate::cli::args::Cli;
use crate::error::Result;
use crate::processors::ParallelProcessor;
use crate::utils::progress::ProgressReporter;
use crate::writers::{collation_for, ReportBuilder};
use std::io::{self, BufWriter};
use tracing::{debug, info};

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    debug!("Effective configuration: {:?}", config);

    // Resolve the locale before scanning so a bad name fails fast.
    let collation = collation_for(&config.locale)?;
    info!("Sorting stations with collation '{}'", collation.name());

    let progress = ProgressReporter::new(0, "Opening input...", !cli.verbose);
    let processor = ParallelProcessor::from_config(&config);
    let result = processor.process_file(&cli.file, Some(&progress))?;
    drop(progress);

    info!(
        "Aggregated {} records for {} stations from {} partitions",
        result.total_records(),
        result.table.len(),
        result.partitions.len()
    );

    let report = ReportBuilder::new(collation.as_ref()).build(&result.table);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    report.write_to(&mut out)?;

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `--verbose`.
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("brc_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
