//! Loaders for the `*.conf.d` directories
//!
//! Repository and config-protect declarations are single YAML documents
//! dropped into the directories listed by `repos_confdir` and
//! `config_protect_confdir`:
//!
//! ```text
//! /etc/luet/
//!   repos.conf.d/
//!     main.yml
//!     extra.yml
//!   config.protect.d/
//!     etc.yml
//! ```
//!
//! When `config_from_host` is false the directories are looked up under the
//! rootfs instead of the host root.

use std::fs;
use std::path::{Path, PathBuf};

use luet_fs::{DocumentFormat, DocumentStore, join_under};

use crate::protect::ConfigProtectConfFile;
use crate::repository::Repository;
use crate::store::LuetConfig;
use crate::Result;

/// Append every repository declared in the repos conf dirs.
///
/// Returns the number of repositories added. Files that fail to parse or
/// declare no name are skipped with a warning.
pub fn load_repositories(config: &mut LuetConfig) -> Result<usize> {
    let store = DocumentStore::new();
    let mut loaded = 0;

    for file in conf_files(config, config.repos_confdir())? {
        let repository: Repository = match store.load(&file) {
            Ok(repository) => repository,
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "Skipping unparseable repository file");
                continue;
            }
        };
        if repository.name.is_empty() {
            tracing::warn!(path = %file.display(), "Skipping repository without a name");
            continue;
        }

        tracing::debug!(name = %repository.name, path = %file.display(), "Loaded repository");
        config.add_repository(repository);
        loaded += 1;
    }

    Ok(loaded)
}

/// Record every config-protect declaration from the config-protect conf dirs.
///
/// Returns the number of declarations added.
pub fn load_config_protect(config: &mut LuetConfig) -> Result<usize> {
    let store = DocumentStore::new();
    let mut loaded = 0;

    for file in conf_files(config, config.config_protect_confdir())? {
        let mut protect: ConfigProtectConfFile = match store.load(&file) {
            Ok(protect) => protect,
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "Skipping unparseable config protect file");
                continue;
            }
        };
        if protect.name.is_empty() {
            tracing::warn!(path = %file.display(), "Skipping config protect file without a name");
            continue;
        }

        protect.filename = file;
        config.add_config_protect_conf_file(protect);
        loaded += 1;
    }

    Ok(loaded)
}

/// YAML files of `dirs`, directory by directory, sorted by name within each.
fn conf_files(config: &LuetConfig, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for dir in dirs {
        let dir = if config.config_from_host() {
            dir.clone()
        } else {
            join_under(&config.system().rootfs, dir)
        };
        if !dir.is_dir() {
            tracing::debug!(path = %dir.display(), "Conf dir not present, skipping");
            continue;
        }

        let entries = fs::read_dir(&dir).map_err(|e| luet_fs::Error::io(&dir, e))?;
        let mut found: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_yaml(path))
            .collect();
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

fn is_yaml(path: &Path) -> bool {
    matches!(DocumentFormat::from_path(path), Ok(DocumentFormat::Yaml))
}
