//! The root configuration object
//!
//! A [`LuetConfig`] is built once at startup and handed by reference to every
//! subsystem that needs settings or runtime paths. It owns its backing
//! [`ConfigDocument`], the typed sections resolved from it and the mutable
//! registries (repositories, finalizer environment, config-protect files)
//! that callers update while work proceeds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use luet_fs::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::defaults::gen_default;
use crate::document::ConfigDocument;
use crate::finalizer::FinalizerEnv;
use crate::general::GeneralConfig;
use crate::logging::LoggingConfig;
use crate::protect::ConfigProtectConfFile;
use crate::repository::Repository;
use crate::solver::SolverOptions;
use crate::system::SystemConfig;
use crate::{Error, Result};

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuetConfig {
    #[serde(skip)]
    document: ConfigDocument,

    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    general: GeneralConfig,
    #[serde(default)]
    system: SystemConfig,
    #[serde(default)]
    solver: SolverOptions,

    #[serde(default)]
    repos_confdir: Vec<PathBuf>,
    #[serde(default)]
    config_protect_confdir: Vec<PathBuf>,
    #[serde(default)]
    config_protect_skip: bool,
    #[serde(default)]
    config_from_host: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    repositories: Vec<Repository>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    finalizer_envs: Vec<FinalizerEnv>,

    #[serde(skip)]
    config_protect_conf_files: Vec<ConfigProtectConfFile>,
}

impl LuetConfig {
    /// Build the configuration on top of `document`.
    ///
    /// A fresh document is created when none is given. Built-in defaults are
    /// seeded into its defaults layer before the typed sections are resolved,
    /// so anything already present in higher layers keeps precedence.
    pub fn new(document: Option<ConfigDocument>) -> Result<Self> {
        let mut document = document.unwrap_or_default();
        gen_default(&mut document);
        Self::from_document(document)
    }

    /// Resolve the typed sections from `document` as is, without seeding
    /// defaults.
    pub fn from_document(document: ConfigDocument) -> Result<Self> {
        let mut config: LuetConfig = document.unmarshal()?;
        config.document = document;
        Ok(config)
    }

    /// Re-resolve the typed sections after layers were added to the document.
    ///
    /// Repositories and finalizer variables are replaced by what the document
    /// declares. Config-protect file records are kept.
    pub fn reload(&mut self) -> Result<()> {
        let mut fresh: LuetConfig = self.document.unmarshal()?;
        fresh.document = std::mem::take(&mut self.document);
        fresh.config_protect_conf_files = std::mem::take(&mut self.config_protect_conf_files);
        *self = fresh;
        Ok(())
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn logging_mut(&mut self) -> &mut LoggingConfig {
        &mut self.logging
    }

    pub fn general(&self) -> &GeneralConfig {
        &self.general
    }

    pub fn general_mut(&mut self) -> &mut GeneralConfig {
        &mut self.general
    }

    pub fn system(&self) -> &SystemConfig {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut SystemConfig {
        &mut self.system
    }

    pub fn solver_options(&self) -> &SolverOptions {
        &self.solver
    }

    pub fn solver_options_mut(&mut self) -> &mut SolverOptions {
        &mut self.solver
    }

    pub fn repos_confdir(&self) -> &[PathBuf] {
        &self.repos_confdir
    }

    pub fn config_protect_confdir(&self) -> &[PathBuf] {
        &self.config_protect_confdir
    }

    pub fn config_protect_skip(&self) -> bool {
        self.config_protect_skip
    }

    pub fn config_from_host(&self) -> bool {
        self.config_from_host
    }

    // Repositories

    /// Append a repository. Duplicate names are accepted; lookups only ever
    /// see the first one.
    pub fn add_repository(&mut self, repository: Repository) {
        self.repositories.push(repository);
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// First repository named `name`.
    pub fn repository(&self, name: &str) -> Result<&Repository> {
        self.repositories
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RepositoryNotFound {
                name: name.to_string(),
            })
    }

    pub fn repository_mut(&mut self, name: &str) -> Result<&mut Repository> {
        self.repositories
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RepositoryNotFound {
                name: name.to_string(),
            })
    }

    // Finalizer environment

    /// Set a finalizer variable, updating it in place if the key exists.
    pub fn set_finalizer_env(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.finalizer_envs.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => kv.value = value,
            None => self.finalizer_envs.push(FinalizerEnv::new(key, value)),
        }
    }

    pub fn finalizer_env(&self, key: &str) -> Result<&str> {
        self.finalizer_envs
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
            .ok_or_else(|| Error::FinalizerKeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn finalizer_envs_map(&self) -> HashMap<String, String> {
        self.finalizer_envs
            .iter()
            .map(|kv| (kv.key.clone(), kv.value.clone()))
            .collect()
    }

    /// `KEY=VALUE` strings in insertion order.
    pub fn finalizer_envs(&self) -> Vec<String> {
        self.finalizer_envs
            .iter()
            .map(FinalizerEnv::to_env_string)
            .collect()
    }

    // Config protect

    /// Record a loaded config-protect declaration. No deduplication.
    pub fn add_config_protect_conf_file(&mut self, file: ConfigProtectConfFile) {
        self.config_protect_conf_files.push(file);
    }

    pub fn config_protect_conf_files(&self) -> &[ConfigProtectConfFile] {
        &self.config_protect_conf_files
    }

    // Serialization

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Encode(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Persist the resolved configuration; the format follows the extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        DocumentStore::new().save(path, self)?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}
