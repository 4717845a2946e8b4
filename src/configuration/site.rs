//! Per-package site configuration: structure rules, hide patterns and
//! the preview presets handed through to the UI.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::rules::{Classifier, StructureRule};
use crate::core::LensResult;

/// Viewport preset offered by the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportPreset {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Locale preset offered by the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalePreset {
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<String>,
}

/// UI section of the site configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfiguration {
    /// Ordered structure rules, more specific first
    #[serde(default)]
    pub structure: Vec<StructureRule>,
    #[serde(default)]
    pub viewport_presets: IndexMap<String, ViewportPreset>,
    #[serde(default)]
    pub locale_presets: IndexMap<String, LocalePreset>,
}

/// Effective configuration of one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfiguration {
    #[serde(default)]
    pub ui: UiConfiguration,
    #[serde(default)]
    pub hidden_prototype_name_patterns: Vec<String>,
}

impl SiteConfiguration {
    /// Compile the rule lists into a classifier
    pub fn classifier(&self) -> LensResult<Classifier> {
        Classifier::compile(&self.ui.structure, &self.hidden_prototype_name_patterns)
    }

    /// Apply a package override: every field present in the override replaces the global one
    pub fn overlay(&self, site: &SiteOverride) -> SiteConfiguration {
        let mut merged = self.clone();
        if let Some(ui) = &site.ui {
            if let Some(structure) = &ui.structure {
                merged.ui.structure = structure.clone();
            }
            if let Some(presets) = &ui.viewport_presets {
                merged.ui.viewport_presets = presets.clone();
            }
            if let Some(presets) = &ui.locale_presets {
                merged.ui.locale_presets = presets.clone();
            }
        }
        if let Some(patterns) = &site.hidden_prototype_name_patterns {
            merged.hidden_prototype_name_patterns = patterns.clone();
        }
        merged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiOverride {
    pub structure: Option<Vec<StructureRule>>,
    pub viewport_presets: Option<IndexMap<String, ViewportPreset>>,
    pub locale_presets: Option<IndexMap<String, LocalePreset>>,
}

/// Package-specific overrides of the global site configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOverride {
    pub ui: Option<UiOverride>,
    pub hidden_prototype_name_patterns: Option<Vec<String>>,
}
