use std::path::PathBuf;

use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};

/// Where the tier files go and what they are called.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub log_directory: PathBuf,
    pub base_log_name: String,
}

impl LogConfig {
    pub fn new(log_directory: impl Into<PathBuf>, base_log_name: impl Into<String>) -> Self {
        Self {
            log_directory: log_directory.into(),
            base_log_name: base_log_name.into(),
        }
    }

    /// Read `.config/tierlog/config.*` and `TIERLOG_*` variables on top of
    /// the defaults.
    pub fn load() -> crate::Result<Self> {
        let settings = ConfigLoader::builder()
            .add_source(File::with_name(".config/tierlog/config").required(false))
            .add_source(Environment::with_prefix("TIERLOG"))
            .build()?;

        Ok(settings.try_deserialize::<LogConfig>()?)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_directory = dirs::data_local_dir()
            .map(|dir| dir.join("tierlog").join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"));
        Self {
            log_directory,
            base_log_name: "app".to_string(),
        }
    }
}
