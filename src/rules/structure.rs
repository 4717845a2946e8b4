/*!
# Structure rules

Ordered regex rules that put a prototype into a named group for listings.
The first rule whose pattern matches the prototype name wins; patterns are
unanchored searches, so anchors must be written explicitly.
*/

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{LensError, LensResult};

/// Configured rule, as written in the site configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRule {
    /// Regular expression matched against the prototype name
    #[serde(rename = "match")]
    pub match_pattern: String,
    pub label: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_icon() -> String {
    "icon-question".to_string()
}

fn default_color() -> String {
    "white".to_string()
}

impl StructureRule {
    pub fn new(match_pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            match_pattern: match_pattern.into(),
            label: label.into(),
            icon: default_icon(),
            color: default_color(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    fn structure(&self) -> Structure {
        Structure {
            label: self.label.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }
}

/// Group decoration attached to a listed prototype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub label: String,
    pub icon: String,
    pub color: String,
}

impl Structure {
    /// Decoration for names no rule matches
    pub fn other() -> Self {
        Self {
            label: "Other".to_string(),
            icon: default_icon(),
            color: default_color(),
        }
    }
}

/// Compiled, ordered rule list
#[derive(Debug, Clone, Default)]
pub struct StructureRules {
    rules: Vec<(Regex, StructureRule)>,
}

impl StructureRules {
    /// Compile every pattern up front so that classification cannot fail
    pub fn compile(rules: &[StructureRule]) -> LensResult<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.match_pattern)
                    .map(|regex| (regex, rule.clone()))
                    .map_err(|e| LensError::InvalidPattern {
                        pattern: rule.match_pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<LensResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule, if any
    pub fn find(&self, name: &str) -> Option<&StructureRule> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(name))
            .map(|(_, rule)| rule)
    }

    /// Structure for `name`, falling back to [`Structure::other`]
    pub fn classify(&self, name: &str) -> Structure {
        self.find(name)
            .map(StructureRule::structure)
            .unwrap_or_else(Structure::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forms_rule_and_fallback() {
        let rules = StructureRules::compile(&[StructureRule::new(r"^Vendor\.Site:Form\..*", "Forms")]).unwrap();
        assert_eq!(rules.classify("Vendor.Site:Form.Input").label, "Forms");
        assert_eq!(rules.classify("Vendor.Site:Button"), Structure::other());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = StructureRules::compile(&[
            StructureRule::new(r"Form\.Input", "Inputs").with_icon("icon-pencil").with_color("blue"),
            StructureRule::new(r"Form", "Forms"),
        ])
        .unwrap();
        let structure = rules.classify("Vendor.Site:Form.Input.Text");
        assert_eq!(
            structure,
            Structure {
                label: "Inputs".to_string(),
                icon: "icon-pencil".to_string(),
                color: "blue".to_string(),
            }
        );
        assert_eq!(rules.classify("Vendor.Site:Form.Select").label, "Forms");
    }

    #[test]
    fn test_patterns_are_unanchored() {
        let rules = StructureRules::compile(&[StructureRule::new("Atom", "Atoms")]).unwrap();
        assert_eq!(rules.classify("Vendor.Site:Atom.Button").label, "Atoms");
    }

    #[test]
    fn test_invalid_pattern_is_rejected_at_compile_time() {
        let err = StructureRules::compile(&[StructureRule::new("(unclosed", "Broken")]).unwrap_err();
        assert!(matches!(err, LensError::InvalidPattern { pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_classify_is_repeatable() {
        let rules = StructureRules::compile(&[StructureRule::new("Molecule", "Molecules")]).unwrap();
        assert_eq!(rules.classify("X:Molecule.Card"), rules.classify("X:Molecule.Card"));
    }

    #[test]
    fn test_rule_yaml_uses_match_key() {
        let yaml = "- match: 'Atom'\n  label: Atoms\n  icon: icon-atom\n- match: 'Page'\n  label: Pages\n";
        let rules: Vec<StructureRule> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules[0].icon, "icon-atom");
        assert_eq!(rules[1].color, "white");
    }
}
