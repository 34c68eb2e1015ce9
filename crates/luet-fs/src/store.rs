//! Format-agnostic document loading and saving
//!
//! Configuration documents may be written as YAML (the historical luet
//! format), TOML or JSON. The format is picked from the file extension.

use std::fmt;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// Loads and saves serde documents, detecting the format per path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize a document.
    ///
    /// An empty YAML file deserializes like an empty mapping.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = DocumentFormat::from_path(path)?;
        let content = io::read_text(path)?;
        Self::parse(path, format, &content)
    }

    /// Parse already-read content as `format`.
    pub fn parse<T: DeserializeOwned>(path: &Path, format: DocumentFormat, content: &str) -> Result<T> {
        let parse_error = |message: String| Error::DocumentParse {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        };

        match format {
            DocumentFormat::Yaml => {
                let content = if content.trim().is_empty() { "{}" } else { content };
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }

    /// Serialize `value` and write it atomically.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let format = DocumentFormat::from_path(path)?;
        let content = Self::render(path, format, value)?;
        io::write_atomic(path, content.as_bytes())
    }

    /// Serialize `value` as `format` without writing it.
    pub fn render<T: Serialize>(path: &Path, format: DocumentFormat, value: &T) -> Result<String> {
        let serialize_error = |message: String| Error::DocumentSerialize {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        };

        match format {
            DocumentFormat::Yaml => {
                serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))
            }
            DocumentFormat::Toml => {
                toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
            }
            DocumentFormat::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
            }
        }
    }
}
