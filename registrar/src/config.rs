//! Registrar configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SNAPSHOT_PATH: &str = "registrar.json";
const DEFAULT_LOG_FORMAT: &str = "pretty";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-oriented multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Raised when the configured log format is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log format `{0}`; expected `pretty` or `json`")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(UnknownLogFormat(raw.to_owned())),
        }
    }
}

/// Configuration values for the `registrar` binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRAR")]
pub struct RegistrarSettings {
    /// Snapshot file holding students, courses and grades.
    pub snapshot_path: Option<PathBuf>,
    /// Log output format, `pretty` or `json`.
    #[ortho_config(default = String::from(DEFAULT_LOG_FORMAT))]
    pub log_format: String,
}

impl RegistrarSettings {
    /// Return the configured snapshot path, falling back to the default.
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH))
    }

    /// Parse the configured log format.
    pub fn log_format(&self) -> Result<LogFormat, UnknownLogFormat> {
        LogFormat::from_str(&self.log_format)
    }
}
