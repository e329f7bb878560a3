//! Runtime configuration
use serde_yaml::{self, Value};
use std::fs::File;

use crate::error::{ErrorCode, RuntimeError};

#[derive(Debug)]
/// Runtime configuration data
pub struct Config {
    /// Is logging enabled?
    logging: bool,
    /// Optional RNG seed for reproducible transcripts
    rng_seed: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging: false,
            rng_seed: None,
        }
    }
}

impl TryFrom<File> for Config {
    type Error = RuntimeError;

    fn try_from(value: File) -> Result<Self, Self::Error> {
        match serde_yaml::from_reader::<File, Value>(value) {
            Ok(data) => Ok(Config::from_value(&data)),
            Err(e) => Err(RuntimeError::fatal(
                ErrorCode::ConfigError,
                format!("{}", e),
            )),
        }
    }
}

impl Config {
    /// Constructor
    ///
    /// # Arguments
    /// * `logging` - Logging enabled flag
    /// * `rng_seed` - Optional RNG seed
    pub fn new(logging: bool, rng_seed: Option<u16>) -> Self {
        Config { logging, rng_seed }
    }

    fn from_value(data: &Value) -> Config {
        let logging = match data["logging"].as_str() {
            Some(t) => t == "enabled",
            None => false,
        };
        let rng_seed = data["rng_seed"].as_u64().map(|v| v as u16);
        Config::new(logging, rng_seed)
    }

    /// Get the logging flag
    ///
    /// # Returns
    /// Logging flag
    pub fn logging(&self) -> bool {
        self.logging
    }

    /// Get the RNG seed, if any
    ///
    /// # Returns
    /// [Option] with the configured RNG seed or [None]
    pub fn rng_seed(&self) -> Option<u16> {
        self.rng_seed
    }
}
