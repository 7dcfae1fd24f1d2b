// Session configuration
//
// Loaded with priority: explicit overrides > ENV (PGR_EXEC_*) > config file > defaults

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::DatabaseError;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./pgr_exec.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Database used when a plan does not qualify its tables
    #[serde(default)]
    pub default_db: Option<String>,
    /// Historical snapshot the session starts pinned to (0 = latest)
    #[serde(default)]
    pub snapshot_ts: u64,
    /// `tracing_subscriber::EnvFilter` directive for the binary
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_db: None,
            snapshot_ts: 0,
            log_filter: default_log_filter(),
        }
    }
}

impl SessionConfig {
    /// Loads `./pgr_exec.toml` if present, then applies `PGR_EXEC_*`
    /// environment variables.
    pub fn load() -> Result<Self, DatabaseError> {
        Self::build(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    /// Loads an explicit config file. The file must exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        Self::build(path.as_ref(), true)
    }

    fn build(path: &Path, required: bool) -> Result<Self, DatabaseError> {
        let config = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(Environment::with_prefix("PGR_EXEC").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
