use brc_processor::cli::{run, setup_logging, Cli};
use brc_processor::utils::constants::EXIT_SUCCESS;
use brc_processor::ProcessingError;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let ProcessingError::PartitionsFailed { failures, .. } = &e {
                for failure in failures {
                    eprintln!("  {}", failure);
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}
