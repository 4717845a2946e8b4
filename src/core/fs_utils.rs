//! File system utility helpers (BOM-aware readers, etc.)
use std::fs;
use std::path::Path;

use super::{LensError, LensResult};

/// Read a fragment or configuration file as UTF-8 text, stripping UTF-8 BOM if present.
pub fn read_text_file(path: &Path) -> LensResult<String> {
    let mut content = fs::read_to_string(path).map_err(|source| LensError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.starts_with('\u{FEFF}') {
        content = content.trim_start_matches('\u{FEFF}').to_string();
    }
    Ok(content)
}

/// Serialization format, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Toml,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(DataFormat::Json),
            Some("yaml") | Some("yml") => Some(DataFormat::Yaml),
            Some("toml") => Some(DataFormat::Toml),
            _ => None,
        }
    }
}

/// Read and deserialize a JSON/YAML/TOML file
pub fn read_data_file<T: serde::de::DeserializeOwned>(path: &Path) -> LensResult<T> {
    let format = DataFormat::from_path(path).ok_or_else(|| LensError::Format {
        path: path.to_path_buf(),
        reason: "unsupported file extension (expected .json, .yaml, .yml or .toml)".to_string(),
    })?;
    let content = read_text_file(path)?;
    let decoded = match format {
        DataFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        DataFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        DataFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
    };
    decoded.map_err(|reason| LensError::Format {
        path: path.to_path_buf(),
        reason,
    })
}
