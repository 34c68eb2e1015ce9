//! Diagnostics output settings and tracing setup

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::defaults::{DEFAULT_LOG_LEVEL, DEFAULT_LOG_PATH};
use crate::{Error, Result};

/// Logging section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Path of the logfile
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Enable/Disable logging to file
    #[serde(default)]
    pub enable_logfile: bool,
    /// Enable JSON format logging in file
    #[serde(default)]
    pub json_format: bool,
    /// Log level
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub enable_emoji: bool,
    /// Enable/Disable color in logging
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

fn default_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            enable_logfile: false,
            json_format: false,
            level: default_level(),
            enable_emoji: true,
            color: true,
        }
    }
}

impl LoggingConfig {
    pub fn set_log_level(&mut self, level: impl Into<String>) {
        self.level = level.into();
    }

    /// The `tracing` filter directive matching `level`.
    ///
    /// luet level names are mapped onto tracing levels: `warning` becomes
    /// `warn`, `fatal` and `panic` become `error`. An empty level means `info`.
    pub fn filter_directive(&self) -> String {
        match self.level.trim().to_lowercase().as_str() {
            "" => DEFAULT_LOG_LEVEL.to_string(),
            "warning" => "warn".to_string(),
            "fatal" | "panic" => "error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Install a global `tracing` subscriber configured from `config`.
///
/// Writes to stderr, or appends to `config.path` when the logfile is
/// enabled. Fails instead of panicking if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.filter_directive()).map_err(|e| Error::Logging {
        message: e.to_string(),
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.enable_logfile {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)
            .map_err(|e| luet_fs::Error::io(&config.path, e))?;
        let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
        if config.json_format {
            builder.json().try_init()
        } else {
            builder.try_init()
        }
    } else {
        let builder = builder
            .with_ansi(config.color)
            .with_writer(std::io::stderr);
        if config.json_format {
            builder.json().try_init()
        } else {
            builder.try_init()
        }
    };

    installed.map_err(|e| Error::Logging {
        message: e.to_string(),
    })
}
