//! Config-protect declarations

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directories whose existing files must not be overwritten on install.
///
/// Loaded from the config-protect conf dirs; `filename` records where the
/// declaration came from and is not part of the file format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigProtectConfFile {
    #[serde(skip)]
    pub filename: PathBuf,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "dirs")]
    pub directories: Vec<String>,
}

impl ConfigProtectConfFile {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }
}
