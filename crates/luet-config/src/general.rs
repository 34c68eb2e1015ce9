//! Cross-cutting runtime tunables

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_SPINNER_CHARSET, DEFAULT_SPINNER_MS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Preserve file ownership when unpacking packages
    #[serde(default = "default_true")]
    pub same_owner: bool,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub show_build_output: bool,
    #[serde(default = "default_spinner_ms")]
    pub spinner_ms: u64,
    #[serde(default = "default_spinner_charset")]
    pub spinner_charset: u32,
    #[serde(default, rename = "fatal_warnings")]
    pub fatal_warns: bool,
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    num_cpus::get()
}

fn default_spinner_ms() -> u64 {
    DEFAULT_SPINNER_MS
}

fn default_spinner_charset() -> u32 {
    DEFAULT_SPINNER_CHARSET
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            same_owner: true,
            concurrency: default_concurrency(),
            debug: false,
            show_build_output: false,
            spinner_ms: DEFAULT_SPINNER_MS,
            spinner_charset: DEFAULT_SPINNER_CHARSET,
            fatal_warns: false,
        }
    }
}

impl GeneralConfig {
    /// Interval between spinner frames.
    pub fn spinner_interval(&self) -> Duration {
        Duration::from_millis(self.spinner_ms)
    }
}
