// src/errors.rs

//! Crate-wide error type.
//!
//! Startup errors (CLI, config, metrics port) abort the daemon with a
//! distinct exit code. Task-level errors (spawn failures) are reported
//! through the log sink and never leave the scheduling loop.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for an unreadable configuration file.
pub const EXIT_CONFIG_UNREADABLE: i32 = 2;
/// Exit code for a configuration file that cannot be parsed or validated.
pub const EXIT_CONFIG_INVALID: i32 = 3;
/// Exit code for every other fatal error.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum AnticronError {
    #[error("Can not open configuration file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while parsing configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("task '{task}': invalid time_at {value:?} (expected HH:MM)")]
    InvalidTime { task: String, value: String },

    #[error("failed to start task '{task}': {source}")]
    Spawn {
        task: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metrics server error: {0}")]
    MetricsServer(#[source] std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnticronError {
    /// Process exit code the binary uses when this error is fatal.
    pub fn exit_code(&self) -> i32 {
        match self {
            AnticronError::ConfigRead { .. } => EXIT_CONFIG_UNREADABLE,
            AnticronError::ConfigParse(_)
            | AnticronError::ConfigError(_)
            | AnticronError::InvalidTime { .. } => EXIT_CONFIG_INVALID,
            _ => EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnticronError>;
