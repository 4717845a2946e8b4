/*!
# Configuration Management

Settings for the inspector, loaded from TOML or YAML (picked by file
extension). Global site configuration can be overridden per package; the
effective configuration of a package is the global one with every field
present in the package override replaced.

```yaml
defaultPackage: Vendor.Site
mergePolicy: override
maxDepth: 8
render:
  indent: '    '
site:
  ui:
    structure:
      - match: '^Vendor\.Site:Atom\.'
        label: Atoms
packages:
  Vendor.Shop:
    hiddenPrototypeNamePatterns: ['Vendor.Shop:Legacy.*']
```
*/

pub mod site;

pub use site::{LocalePreset, SiteConfiguration, SiteOverride, UiConfiguration, ViewportPreset};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::{read_data_file, LensResult};
use crate::merge::MergePolicy;
use crate::reverse::RenderOptions;

/// Inspector settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Package used when the caller does not name one
    #[serde(default)]
    pub default_package: Option<String>,

    /// Directory with per-package fragment directories
    #[serde(default)]
    pub fragments_path: Option<PathBuf>,

    #[serde(default)]
    pub merge_policy: MergePolicy,

    /// Depth budget for transitive anatomy
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub render: RenderOptions,

    /// Global site configuration
    #[serde(default)]
    pub site: SiteConfiguration,

    /// Package-specific overrides
    #[serde(default)]
    pub packages: BTreeMap<String, SiteOverride>,
}

fn default_max_depth() -> usize {
    8
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_package: None,
            fragments_path: None,
            merge_policy: MergePolicy::default(),
            max_depth: default_max_depth(),
            render: RenderOptions::default(),
            site: SiteConfiguration::default(),
            packages: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LensResult<Self> {
        let path = path.as_ref();
        let settings: Self = read_data_file(path)?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Per-user settings file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fusion-lens").join("settings.yaml"))
    }

    /// Effective site configuration of `package`
    pub fn site_configuration(&self, package: &str) -> SiteConfiguration {
        match self.packages.get(package) {
            Some(site) => self.site.overlay(site),
            None => self.site.clone(),
        }
    }

    /// Human-readable problems; patterns are compiled to catch syntax errors early
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.max_depth == 0 {
            warnings.push("maxDepth is 0: transitive anatomy will not expand anything".to_string());
        }
        if self.render.indent.is_empty() {
            warnings.push("render.indent is empty: nested blocks will not be indented".to_string());
        }
        if let Some(package) = &self.default_package {
            if !self.packages.is_empty() && !self.packages.contains_key(package) {
                warnings.push(format!("defaultPackage '{}' has no package section", package));
            }
        }

        let mut sites = vec![("<global>".to_string(), self.site.clone())];
        sites.extend(
            self.packages
                .keys()
                .map(|name| (name.clone(), self.site_configuration(name))),
        );
        for (name, site) in sites {
            if let Err(e) = site.classifier() {
                warnings.push(format!("{}: {}", name, e));
            }
            for rule in &site.ui.structure {
                if rule.label.trim().is_empty() {
                    warnings.push(format!("{}: structure rule '{}' has an empty label", name, rule.match_pattern));
                }
            }
        }

        warnings
    }
}
