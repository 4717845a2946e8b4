/*!
# Property paths

Location type for errors and anatomy roles. A path is either rooted in the
ordinary path tree or inside a named prototype, followed by property segments.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a path starts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathRoot {
    /// The ordinary rendering tree
    Paths,
    /// Inside `prototype(<name>)`
    Prototype(String),
}

/// Dotted property path, e.g. `prototype(Vendor.Site:Button).icon.size`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath {
    pub root: PathRoot,
    pub segments: Vec<String>,
}

impl PropertyPath {
    pub fn root() -> Self {
        Self {
            root: PathRoot::Paths,
            segments: Vec::new(),
        }
    }

    pub fn prototype(name: impl Into<String>) -> Self {
        Self {
            root: PathRoot::Prototype(name.into()),
            segments: Vec::new(),
        }
    }

    /// New path with one more segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(segment.into());
        next
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Segments joined with `.`, without the root
    pub fn relative(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            PathRoot::Paths => {
                if self.segments.is_empty() {
                    write!(f, "<root>")
                } else {
                    write!(f, "{}", self.relative())
                }
            }
            PathRoot::Prototype(name) => {
                write!(f, "prototype({})", name)?;
                for segment in &self.segments {
                    write!(f, ".{}", segment)?;
                }
                Ok(())
            }
        }
    }
}
