//! Storage layout and runtime paths
//!
//! Every path that depends on `system.*` settings is derived here: the
//! repository databases under `<rootfs>/<database_path>`, the package cache
//! and the temporary workspace rooted at `tmpdir_base`.

use std::fmt;
use std::path::{Path, PathBuf};

use luet_fs::{absolutize, io, join_under};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::defaults::{
    DEFAULT_DATABASE_ENGINE, DEFAULT_DATABASE_PATH, DEFAULT_PKGS_CACHE_PATH, DEFAULT_ROOTFS,
    DEFAULT_TMPDIR_NAME,
};
use crate::{Error, Result};

/// Engine name selecting the on-disk package database.
pub const BOLTDB_ENGINE: &str = "boltdb";

/// File name of the system package database inside the database directory.
pub const SYSTEM_DATABASE_FILE: &str = "luet.db";

/// Prefix of ephemeral package cache directories.
pub const EPHEMERAL_CACHE_PREFIX: &str = "cachepkgs";

/// Storage/filesystem section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_engine")]
    pub database_engine: String,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_rootfs")]
    pub rootfs: PathBuf,
    /// Empty means no configured cache; see [`SystemConfig::system_pkgs_cache_dir`]
    #[serde(default)]
    pub pkgs_cache_path: PathBuf,
    #[serde(default = "default_tmpdir_base")]
    pub tmpdir_base: PathBuf,
}

fn default_engine() -> String {
    DEFAULT_DATABASE_ENGINE.to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_rootfs() -> PathBuf {
    PathBuf::from(DEFAULT_ROOTFS)
}

fn default_tmpdir_base() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_TMPDIR_NAME)
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            database_engine: default_engine(),
            database_path: default_database_path(),
            rootfs: default_rootfs(),
            pkgs_cache_path: PathBuf::from(DEFAULT_PKGS_CACHE_PATH),
            tmpdir_base: default_tmpdir_base(),
        }
    }
}

/// Package database backend selected by `system.database_engine`.
///
/// Opening the database is up to the storage engine; this only names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// Embedded key/value store persisted at `path`
    Bolt { path: PathBuf },
    /// Volatile in-memory store
    InMemory,
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bolt { path } => write!(f, "boltdb ({})", path.display()),
            Self::InMemory => write!(f, "memory"),
        }
    }
}

impl SystemConfig {
    /// Replace the rootfs with the absolute form of `path`.
    ///
    /// Relative paths are resolved against the current working directory.
    /// The stored rootfs is left untouched if resolution fails.
    pub fn set_rootfs(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.rootfs = absolutize(path)?;
        Ok(())
    }

    /// Absolute form of the stored rootfs.
    pub fn rootfs_absolute(&self) -> Result<PathBuf> {
        Ok(absolutize(&self.rootfs)?)
    }

    /// `<rootfs>/<database_path>/repos/<name>`, created if missing.
    pub fn repo_database_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = join_under(
            join_under(&self.rootfs, &self.database_path),
            Path::new("repos").join(name),
        );
        io::ensure_dir(&dir)?;
        Ok(dir)
    }

    /// `<rootfs>/<database_path>`, created if missing.
    pub fn system_repo_database_dir(&self) -> Result<PathBuf> {
        let dir = join_under(&self.rootfs, &self.database_path);
        io::ensure_dir(&dir)?;
        Ok(dir)
    }

    /// Directory holding downloaded package artifacts.
    ///
    /// A configured absolute path is returned as is and a relative one is
    /// placed under [`Self::system_repo_database_dir`]. Without a configured
    /// path every call allocates a new directory under the OS temp root, so
    /// callers that need a stable location must configure one.
    pub fn system_pkgs_cache_dir(&self) -> Result<PathBuf> {
        if self.pkgs_cache_path.as_os_str().is_empty() {
            let base = std::env::temp_dir();
            let dir = tempfile::Builder::new()
                .prefix(EPHEMERAL_CACHE_PREFIX)
                .keep(true)
                .tempdir_in(&base)
                .map_err(|source| Error::TempAllocation {
                    kind: "directory",
                    base,
                    source,
                })?;
            tracing::debug!(path = %dir.path().display(), "Allocated ephemeral package cache");
            return Ok(dir.path().to_path_buf());
        }

        if self.pkgs_cache_path.is_absolute() {
            return Ok(self.pkgs_cache_path.clone());
        }
        Ok(join_under(
            self.system_repo_database_dir()?,
            &self.pkgs_cache_path,
        ))
    }

    /// Describe the package database selected by `database_engine`.
    pub fn system_database(&self) -> Result<DatabaseBackend> {
        match self.database_engine.as_str() {
            BOLTDB_ENGINE => Ok(DatabaseBackend::Bolt {
                path: self.system_repo_database_dir()?.join(SYSTEM_DATABASE_FILE),
            }),
            _ => Ok(DatabaseBackend::InMemory),
        }
    }

    /// Make `tmpdir_base` absolute and create it if missing.
    pub fn init_tmp_dir(&mut self) -> Result<()> {
        if !self.tmpdir_base.is_absolute() {
            self.tmpdir_base =
                absolutize(&self.tmpdir_base).map_err(|source| Error::TmpDirResolution { source })?;
        }

        match std::fs::metadata(&self.tmpdir_base) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.tmpdir_base.display(), "Creating temporary directory base");
                io::ensure_dir(&self.tmpdir_base)?;
                Ok(())
            }
            Err(source) => Err(Error::TmpDirStat {
                path: self.tmpdir_base.clone(),
                source,
            }),
        }
    }

    /// Remove the whole temporary directory tree.
    ///
    /// Succeeds when the tree was never created.
    pub fn cleanup_tmp_dir(&self) -> Result<()> {
        tracing::debug!(path = %self.tmpdir_base.display(), "Removing temporary directory base");
        io::remove_tree(&self.tmpdir_base)?;
        Ok(())
    }

    /// Allocate a uniquely named directory under `tmpdir_base`.
    ///
    /// `pattern` follows the usual temp-name convention: a `*` marks where
    /// the random part goes, otherwise it is appended. The directory is not
    /// removed automatically; [`Self::cleanup_tmp_dir`] removes it.
    pub fn temp_dir(&mut self, pattern: &str) -> Result<PathBuf> {
        self.init_tmp_dir()?;
        let (prefix, suffix) = split_pattern(pattern);
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .keep(true)
            .tempdir_in(&self.tmpdir_base)
            .map_err(|source| Error::TempAllocation {
                kind: "directory",
                base: self.tmpdir_base.clone(),
                source,
            })?;
        Ok(dir.path().to_path_buf())
    }

    /// Allocate a uniquely named file under `tmpdir_base`.
    ///
    /// The returned handle does not delete the file on drop.
    pub fn temp_file(&mut self, pattern: &str) -> Result<NamedTempFile> {
        self.init_tmp_dir()?;
        let (prefix, suffix) = split_pattern(pattern);
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .keep(true)
            .tempfile_in(&self.tmpdir_base)
            .map_err(|source| Error::TempAllocation {
                kind: "file",
                base: self.tmpdir_base.clone(),
                source,
            })
    }
}

fn split_pattern(pattern: &str) -> (&str, &str) {
    pattern.rsplit_once('*').unwrap_or((pattern, ""))
}
