//! Repository records

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One configured package source.
///
/// Fetching and indexing happen elsewhere; the configuration only keeps the
/// declaration. Names are expected to be unique, and lookups return the
/// first record with a matching name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default, rename = "type")]
    pub repo_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mode: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i32,
    #[serde(default)]
    pub enable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub cached: bool,
    #[serde(default, rename = "auth", skip_serializing_if = "HashMap::is_empty")]
    pub authentication: HashMap<String, String>,
    #[serde(default, rename = "treepath", skip_serializing_if = "is_empty_path")]
    pub tree_path: PathBuf,
    #[serde(default, rename = "metapath", skip_serializing_if = "is_empty_path")]
    pub meta_path: PathBuf,
    #[serde(default, skip_serializing_if = "is_false")]
    pub verify: bool,
    #[serde(default, rename = "reference", skip_serializing_if = "String::is_empty")]
    pub reference_id: String,
    /// Incremented on every published revision of the repository
    #[serde(default, skip_serializing_if = "is_zero")]
    pub revision: i32,
    /// Epoch time in seconds of the last published revision
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_update: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, repo_type: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            name: name.into(),
            repo_type: repo_type.into(),
            urls,
            enable: true,
            ..Self::default()
        }
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_empty_path(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repository_yaml() {
        let repo: Repository = serde_yaml::from_str(
            r#"
name: "mocaccino-repository-index"
description: "MocaccinoOS Repository index"
type: "http"
enable: true
cached: true
priority: 1
urls:
  - "https://get.mocaccino.org/mocaccino-repository-index"
auth:
  token: secret
"#,
        )
        .unwrap();

        assert_eq!(repo.name, "mocaccino-repository-index");
        assert_eq!(repo.repo_type, "http");
        assert!(repo.enable);
        assert!(repo.cached);
        assert_eq!(repo.priority, 1);
        assert_eq!(repo.urls.len(), 1);
        assert_eq!(repo.authentication["token"], "secret");
    }

    #[test]
    fn new_repository_is_enabled() {
        let repo = Repository::new("main", "disk", vec!["/srv/repo".into()]);
        assert!(repo.enable);
        assert_eq!(repo.repo_type, "disk");
    }
}
