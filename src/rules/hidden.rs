//! Hide patterns: fnmatch-style globs that drop prototypes from listings.
//! `*` and `?` match any character, `.` and `:` included.

use glob::{MatchOptions, Pattern};

use crate::core::{LensError, LensResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled set of hide patterns
#[derive(Debug, Clone, Default)]
pub struct HidePatterns {
    patterns: Vec<Pattern>,
}

impl HidePatterns {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> LensResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| LensError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<LensResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any pattern matches `name`
    pub fn is_hidden(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
    }
}
