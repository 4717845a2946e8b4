/*!
# Error System for Fusion Lens

Typed failures of the merge → reverse-compile → anatomy pipeline.
Every variant carries the path or name needed to act on it.
*/

use std::path::PathBuf;
use thiserror::Error;

use super::path::PropertyPath;

/// Result alias used throughout the library
pub type LensResult<T> = Result<T, LensError>;

/// Errors raised by the library
#[derive(Error, Debug)]
pub enum LensError {
    #[error("Merge conflict at {path}: cannot merge {incoming} onto {existing}")]
    MergeConflict {
        path: PropertyPath,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("Unsupported literal at {path}: {literal}")]
    UnsupportedLiteral { path: PropertyPath, literal: String },

    #[error("Unknown prototype: {0}")]
    UnknownPrototype(String),

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Invalid property name at {path}")]
    InvalidName { path: PropertyPath },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("Failed to serialize: {0}")]
    Serialization(String),
}

impl LensError {
    /// Short machine-readable kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            LensError::MergeConflict { .. } => "MergeConflict",
            LensError::UnsupportedLiteral { .. } => "UnsupportedLiteral",
            LensError::UnknownPrototype(_) => "UnknownPrototype",
            LensError::UnknownPackage(_) => "UnknownPackage",
            LensError::InvalidName { .. } => "InvalidName",
            LensError::InvalidPattern { .. } => "InvalidPattern",
            LensError::Io { .. } => "Io",
            LensError::Format { .. } => "Format",
            LensError::Serialization(_) => "Serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_conflict_message_names_path() {
        let error = LensError::MergeConflict {
            path: PropertyPath::prototype("Vendor.Site:Button").child("label"),
            existing: "object",
            incoming: "scalar",
        };
        let message = error.to_string();
        assert!(message.contains("prototype(Vendor.Site:Button).label"));
        assert_eq!(error.kind(), "MergeConflict");
    }

    #[test]
    fn test_unknown_prototype_message() {
        let error = LensError::UnknownPrototype("Vendor.Site:Missing".to_string());
        assert_eq!(error.to_string(), "Unknown prototype: Vendor.Site:Missing");
    }
}
