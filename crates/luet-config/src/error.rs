//! Error types for luet-config

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error from luet-fs, including path resolution and
    /// directory creation failures
    #[error(transparent)]
    Fs(#[from] luet_fs::Error),

    #[error("Repository {name} not found")]
    RepositoryNotFound { name: String },

    #[error("Finalizer key {key} not found")]
    FinalizerKeyNotFound { key: String },

    #[error("while converting relative path to absolute path: {source}")]
    TmpDirResolution {
        #[source]
        source: luet_fs::Error,
    },

    #[error("Cannot inspect temporary directory {path}: {source}")]
    TmpDirStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to allocate temporary {kind} under {base}: {source}")]
    TempAllocation {
        kind: &'static str,
        base: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value {value:?} for {var}: expected {expected}")]
    InvalidEnv {
        var: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to serialize configuration: {0}")]
    Encode(String),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

impl Error {
    /// True for lookups of a repository or finalizer key that is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RepositoryNotFound { .. } | Self::FinalizerKeyNotFound { .. }
        )
    }
}
