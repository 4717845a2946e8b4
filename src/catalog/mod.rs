/*!
# Catalog

Plain data views over a merged tree, ready for JSON/YAML transport:

- [`list_prototypes`]: every prototype with its node and anatomy
- [`styleguide_objects`]: prototypes annotated with `@styleguide`
- [`catalog`]: styleguide objects decorated with their structure group,
  hidden ones removed
- [`prototype_detail`]: everything the detail view of one prototype shows
*/

pub mod inspector;

pub use inspector::Inspector;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anatomy::{analyze, anatomy_tree, AnatomyNode, AnatomySummary};
use crate::ast::{ComponentTree, Literal, Node};
use crate::core::{LensError, LensResult};
use crate::reverse::ReverseCompiler;
use crate::rules::{Classifier, Structure};

/// Meta directive marking a prototype for the styleguide
pub const STYLEGUIDE_DIRECTIVE: &str = "styleguide";

/// Listing entry for one prototype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeListing {
    pub node: Node,
    pub anatomy: AnatomySummary,
}

/// All prototypes of a tree with their anatomy, in tree order
pub fn list_prototypes(tree: &ComponentTree) -> IndexMap<String, PrototypeListing> {
    let entries: Vec<(&String, &Node)> = tree.prototypes.iter().collect();
    let listed: Vec<(String, PrototypeListing)> = entries
        .into_par_iter()
        .map(|(name, node)| {
            let listing = PrototypeListing {
                node: node.clone(),
                anatomy: analyze(node),
            };
            (name.clone(), listing)
        })
        .collect();
    listed.into_iter().collect()
}

/// Source text of one prototype of the tree
pub fn render_prototype_source(
    tree: &ComponentTree,
    name: &str,
    compiler: &ReverseCompiler,
) -> LensResult<String> {
    compiler.render_prototype(name, tree.prototype(name)?)
}

/// Styleguide entry of a prototype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleguideObject {
    pub title: String,
    pub path: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Structure>,
}

fn scalar_text(node: &Node) -> Option<String> {
    match node {
        Node::Scalar(Literal::String(text)) => Some(text.clone()),
        Node::Scalar(Literal::Null) => None,
        Node::Scalar(literal) => Some(literal.to_string()),
        _ => None,
    }
}

/// Name without the package part: `Vendor.Site:Atom.Button` → `Atom.Button`
fn local_name(prototype_name: &str) -> &str {
    prototype_name
        .split_once(':')
        .map(|(_, local)| local)
        .unwrap_or(prototype_name)
}

fn styleguide_object(prototype_name: &str, annotation: &Node) -> StyleguideObject {
    let local = local_name(prototype_name);
    let field = |key: &str| annotation.get(key).and_then(scalar_text);

    StyleguideObject {
        title: field("title").unwrap_or_else(|| local.split('.').rev().collect::<Vec<_>>().join(" ")),
        path: field("path").unwrap_or_else(|| local.to_string()),
        description: field("description").unwrap_or_default(),
        options: annotation.get("options").cloned(),
        structure: None,
    }
}

/// Prototypes carrying a `@styleguide` directive
pub fn styleguide_objects(tree: &ComponentTree) -> IndexMap<String, StyleguideObject> {
    tree.prototypes
        .iter()
        .filter_map(|(name, node)| {
            let annotation = node.meta_directives()?.get(STYLEGUIDE_DIRECTIVE)?;
            Some((name.clone(), styleguide_object(name, annotation)))
        })
        .collect()
}

/// Styleguide listing: hidden prototypes removed, the rest decorated with their structure
pub fn catalog(tree: &ComponentTree, classifier: &Classifier) -> IndexMap<String, StyleguideObject> {
    let objects = styleguide_objects(tree);
    let total = objects.len();
    let listed: IndexMap<String, StyleguideObject> = objects
        .into_iter()
        .filter(|(name, _)| !classifier.is_hidden(name))
        .map(|(name, mut object)| {
            object.structure = Some(classifier.classify(&name));
            (name, object)
        })
        .collect();
    debug!("Catalog: {} of {} styleguide objects listed", listed.len(), total);
    listed
}

/// Detail view of one prototype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeDetail {
    pub prototype_name: String,
    /// Reverse-compiled source
    pub rendered_code: String,
    /// YAML dump of the AST
    pub parsed_code: String,
    pub ast: Node,
    pub anatomy: AnatomySummary,
    pub anatomy_tree: Vec<AnatomyNode>,
}

pub fn prototype_detail(
    tree: &ComponentTree,
    name: &str,
    compiler: &ReverseCompiler,
) -> LensResult<PrototypeDetail> {
    let node = tree.prototype(name)?;
    let rendered_code = compiler.render_prototype(name, node)?;
    let parsed_code = serde_yaml::to_string(node).map_err(|e| LensError::Serialization(e.to_string()))?;

    Ok(PrototypeDetail {
        prototype_name: name.to_string(),
        rendered_code,
        parsed_code,
        ast: node.clone(),
        anatomy: analyze(node),
        anatomy_tree: anatomy_tree(node),
    })
}
