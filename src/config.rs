use crate::error::Result;
use crate::utils::constants::{DEFAULT_LOCALE, DEFAULT_WINDOW_SIZE, ENV_PREFIX, MAX_THREADS};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Tunables for one aggregation run.
///
/// Layered lowest to highest: built-in defaults, optional config file,
/// `BRC_*` environment variables, then command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ProcessingConfig {
    #[validate(range(min = 1, max = 4096))]
    pub threads: usize,

    #[validate(range(min = 8192))]
    pub window_size: usize,

    #[validate(length(min = 1))]
    pub locale: String,
}

impl ProcessingConfig {
    /// Load defaults, an optional file and the environment, then validate.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("threads", num_cpus::get().min(MAX_THREADS) as i64)?
            .set_default("window_size", DEFAULT_WINDOW_SIZE as i64)?
            .set_default("locale", DEFAULT_LOCALE)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: ProcessingConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Re-check after command-line overrides have been applied.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get().min(MAX_THREADS),
            window_size: DEFAULT_WINDOW_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}
