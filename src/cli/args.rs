use crate::config::ProcessingConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "brc-processor")]
#[command(about = "Per-station min/mean/max over a large STATION;VALUE measurement file")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Input file with two columns: STATION;VALUE")]
    pub file: PathBuf,

    #[arg(
        short = 'T',
        long,
        value_name = "THREADS",
        help = "Use specified number of threads [default: available parallelism]"
    )]
    pub threads: Option<usize>,

    #[arg(
        short,
        long,
        value_name = "BYTES",
        help = "Length of each memory-mapped window [default: 64 MiB]"
    )]
    pub window_size: Option<usize>,

    #[arg(
        short,
        long,
        help = "Locale used to sort station names, e.g. 'de-DE' or 'C' for byte order [default: en]"
    )]
    pub locale: Option<String>,

    #[arg(short, long, help = "Configuration file (TOML, JSON, YAML, ...)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose diagnostics on stderr")]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line overrides on top of file and environment settings.
    pub fn resolve_config(&self) -> Result<ProcessingConfig> {
        let mut config = ProcessingConfig::load(self.config.as_deref())?;

        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if let Some(window_size) = self.window_size {
            config = config.with_window_size(window_size);
        }
        if let Some(ref locale) = self.locale {
            config = config.with_locale(locale.clone());
        }

        config.validated()
    }
}
