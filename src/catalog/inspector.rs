//! Inspector facade: fragment source + settings → merged tree and its views

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use super::{catalog, list_prototypes, prototype_detail, PrototypeDetail, PrototypeListing, StyleguideObject};
use crate::anatomy::{resolve, ResolvedComposition};
use crate::ast::ComponentTree;
use crate::configuration::{LocalePreset, Settings, ViewportPreset};
use crate::core::{LensError, LensResult};
use crate::merge::MergeEngine;
use crate::reverse::ReverseCompiler;
use crate::rules::Classifier;
use crate::source::FragmentSource;

/// Entry point of the library. Every query merges the package fragments afresh,
/// so edits to the underlying source are visible on the next call.
pub struct Inspector<S: FragmentSource> {
    source: S,
    settings: Settings,
    engine: MergeEngine,
    compiler: ReverseCompiler,
}

impl<S: FragmentSource> Inspector<S> {
    pub fn new(source: S, settings: Settings) -> Self {
        let engine = MergeEngine::new(settings.merge_policy);
        let compiler = ReverseCompiler::new(settings.render.clone());
        Self {
            source,
            settings,
            engine,
            compiler,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn compiler(&self) -> &ReverseCompiler {
        &self.compiler
    }

    /// Known packages of the source
    pub fn packages(&self) -> LensResult<Vec<String>> {
        self.source.packages()
    }

    /// Explicit package, else the configured default, else the first known package
    pub fn resolve_package(&self, package: Option<&str>) -> LensResult<String> {
        if let Some(package) = package {
            return Ok(package.to_string());
        }
        if let Some(package) = &self.settings.default_package {
            return Ok(package.clone());
        }
        self.packages()?
            .into_iter()
            .next()
            .ok_or_else(|| LensError::UnknownPackage("<none>".to_string()))
    }

    /// Merged and validated tree of `package`
    #[instrument(skip(self))]
    pub fn merged_tree(&self, package: &str) -> LensResult<ComponentTree> {
        let fragments = self.source.fragments(package)?;
        debug!("Merging {} fragments ({:?})", fragments.len(), self.engine.policy());
        let tree = self.engine.merge(fragments)?;
        tree.validate()?;
        info!("Merged {}: {} prototypes, {} paths", package, tree.prototypes.len(), tree.paths.len());
        Ok(tree)
    }

    /// Classifier built from the effective site configuration of `package`
    pub fn classifier(&self, package: &str) -> LensResult<Classifier> {
        self.settings.site_configuration(package).classifier()
    }

    pub fn prototypes(&self, package: &str) -> LensResult<IndexMap<String, PrototypeListing>> {
        Ok(list_prototypes(&self.merged_tree(package)?))
    }

    pub fn render_prototype(&self, package: &str, name: &str) -> LensResult<String> {
        let tree = self.merged_tree(package)?;
        super::render_prototype_source(&tree, name, &self.compiler)
    }

    pub fn catalog(&self, package: &str) -> LensResult<IndexMap<String, StyleguideObject>> {
        let classifier = self.classifier(package)?;
        Ok(catalog(&self.merged_tree(package)?, &classifier))
    }

    pub fn prototype_detail(&self, package: &str, name: &str) -> LensResult<PrototypeDetail> {
        prototype_detail(&self.merged_tree(package)?, name, &self.compiler)
    }

    /// Transitive anatomy within the configured depth budget
    pub fn resolve_anatomy(&self, package: &str, name: &str) -> LensResult<ResolvedComposition> {
        self.resolve_anatomy_with_depth(package, name, self.settings.max_depth)
    }

    pub fn resolve_anatomy_with_depth(
        &self,
        package: &str,
        name: &str,
        max_depth: usize,
    ) -> LensResult<ResolvedComposition> {
        resolve(&self.merged_tree(package)?, name, max_depth)
    }

    pub fn viewport_presets(&self, package: &str) -> IndexMap<String, ViewportPreset> {
        self.settings.site_configuration(package).ui.viewport_presets
    }

    pub fn locale_presets(&self, package: &str) -> IndexMap<String, LocalePreset> {
        self.settings.site_configuration(package).ui.locale_presets
    }
}
