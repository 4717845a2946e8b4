/*!
# Classifier and filter

Listing decoration for prototype names. Both operations are pure and never
fail: patterns are compiled when the configuration is loaded.

- [`StructureRules`]: ordered regex rules, first match wins, fallback
  `{label: "Other", icon: "icon-question", color: "white"}`.
- [`HidePatterns`]: fnmatch globs; a name matching any of them is hidden
  from listings (it stays in the merged tree).

## Configuration Example

```yaml
ui:
  structure:
    - match: '^Vendor\.Site:Atom\.'
      label: Atoms
      icon: icon-atom
      color: '#ff8700'
    - match: '^Vendor\.Site:Form\.'
      label: Forms
hiddenPrototypeNamePatterns:
  - 'Vendor.Site:Internal.*'
```
*/

pub mod hidden;
pub mod structure;

pub use hidden::HidePatterns;
pub use structure::{Structure, StructureRule, StructureRules};

use crate::core::LensResult;

/// Structure rules and hide patterns of one package
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    structure: StructureRules,
    hidden: HidePatterns,
}

impl Classifier {
    pub fn new(structure: StructureRules, hidden: HidePatterns) -> Self {
        Self { structure, hidden }
    }

    /// Compile rule and pattern lists
    pub fn compile<S: AsRef<str>>(rules: &[StructureRule], hidden: &[S]) -> LensResult<Self> {
        Ok(Self {
            structure: StructureRules::compile(rules)?,
            hidden: HidePatterns::compile(hidden)?,
        })
    }

    pub fn classify(&self, name: &str) -> Structure {
        self.structure.classify(name)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.is_hidden(name)
    }

    pub fn structure_rules(&self) -> &StructureRules {
        &self.structure
    }

    pub fn hide_patterns(&self) -> &HidePatterns {
        &self.hidden
    }
}

/// Structure of `name` under `rules`
pub fn classify(name: &str, rules: &StructureRules) -> Structure {
    rules.classify(name)
}

/// Whether `name` is hidden by any of `patterns`
pub fn is_hidden(name: &str, patterns: &HidePatterns) -> bool {
    patterns.is_hidden(name)
}
