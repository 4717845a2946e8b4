/*!
# Structural Analyzer (Anatomy)

Summarises what a prototype is made of.

[`analyze`] walks one prototype subtree and lists every instantiation it
contains as a `(role, referencedPrototype)` pair, where the role is the
property path relative to the prototype. It stays inside the subtree: the
bodies of referenced prototypes are not visited, so the result reads
"made of X, Y, Z" rather than the transitive closure. Pairs are deduplicated,
first occurrence wins the position.

[`anatomy_tree`] keeps the nesting of inline instantiations instead, and
[`resolve`](resolve::resolve) follows names through the merged tree.
*/

pub mod resolve;

pub use resolve::{resolve, ResolveStatus, ResolvedComposition};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ast::{Node, Properties};

/// One composition relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnatomyEntry {
    /// Property path at which the instantiation occurs
    pub role: String,
    pub referenced_prototype: String,
}

impl AnatomyEntry {
    pub fn new(role: impl Into<String>, referenced_prototype: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            referenced_prototype: referenced_prototype.into(),
        }
    }
}

/// Deduplicated structural outline of a prototype
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnatomySummary {
    /// Parent prototype, for `prototype(A) < prototype(B)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub entries: Vec<AnatomyEntry>,
}

impl AnatomySummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct referenced prototypes in first-seen order
    pub fn referenced_prototypes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.referenced_prototype.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Composition outline of a prototype subtree
pub fn analyze(node: &Node) -> AnatomySummary {
    let mut collector = Collector::default();
    let mut role = Vec::new();

    let extends = match node {
        Node::Reference(instance) => {
            collector.walk_properties(&instance.overrides, &mut role);
            Some(instance.prototype.clone())
        }
        other => {
            collector.walk_node(other, &mut role);
            None
        }
    };

    AnatomySummary {
        extends,
        entries: collector.entries,
    }
}

#[derive(Default)]
struct Collector {
    seen: HashSet<AnatomyEntry>,
    entries: Vec<AnatomyEntry>,
}

impl Collector {
    fn record(&mut self, role: &[String], prototype: &str) {
        let entry = AnatomyEntry::new(role.join("."), prototype);
        if self.seen.insert(entry.clone()) {
            self.entries.push(entry);
        }
    }

    fn walk_properties(&mut self, properties: &Properties, role: &mut Vec<String>) {
        for (key, node) in properties {
            match node {
                Node::Meta(directives) => self.walk_directives(directives, role),
                _ => {
                    role.push(key.clone());
                    self.walk_node(node, role);
                    role.pop();
                }
            }
        }
    }

    fn walk_directives(&mut self, directives: &Properties, role: &mut Vec<String>) {
        for (name, value) in directives {
            role.push(format!("@{}", name));
            self.walk_node(value, role);
            role.pop();
        }
    }

    fn walk_node(&mut self, node: &Node, role: &mut Vec<String>) {
        match node {
            Node::Reference(instance) => {
                self.record(role, &instance.prototype);
                self.walk_properties(&instance.overrides, role);
            }
            Node::Object(children) => self.walk_properties(children, role),
            Node::Meta(directives) => self.walk_directives(directives, role),
            Node::Scalar(_) | Node::Expression(_) => {}
        }
    }
}

/// Nested outline node: an inline instantiation and what its overrides compose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnatomyNode {
    /// Path relative to the enclosing instantiation (or the prototype root)
    pub role: String,
    pub prototype_name: String,
    pub children: Vec<AnatomyNode>,
}

/// Nested composition outline, one node per inline instantiation
pub fn anatomy_tree(node: &Node) -> Vec<AnatomyNode> {
    let mut role = Vec::new();
    match node {
        Node::Reference(instance) => tree_properties(&instance.overrides, &mut role),
        other => tree_node(other, &mut role),
    }
}

fn tree_properties(properties: &Properties, role: &mut Vec<String>) -> Vec<AnatomyNode> {
    let mut result = Vec::new();
    for (key, node) in properties {
        match node {
            Node::Meta(directives) => result.extend(tree_directives(directives, role)),
            _ => {
                role.push(key.clone());
                result.extend(tree_node(node, role));
                role.pop();
            }
        }
    }
    result
}

fn tree_directives(directives: &Properties, role: &mut Vec<String>) -> Vec<AnatomyNode> {
    let mut result = Vec::new();
    for (name, value) in directives {
        role.push(format!("@{}", name));
        result.extend(tree_node(value, role));
        role.pop();
    }
    result
}

fn tree_node(node: &Node, role: &mut Vec<String>) -> Vec<AnatomyNode> {
    match node {
        Node::Reference(instance) => {
            let mut inner = Vec::new();
            vec![AnatomyNode {
                role: role.join("."),
                prototype_name: instance.prototype.clone(),
                children: tree_properties(&instance.overrides, &mut inner),
            }]
        }
        Node::Object(children) => tree_properties(children, role),
        Node::Meta(directives) => tree_directives(directives, role),
        Node::Scalar(_) | Node::Expression(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::META_KEY;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_button_anatomy() {
        let node = Node::object([
            ("label", Node::string("Click")),
            ("icon", Node::reference("Vendor.Site:Icon")),
        ]);
        let summary = analyze(&node);
        assert_eq!(summary.entries, vec![AnatomyEntry::new("icon", "Vendor.Site:Icon")]);
        assert_eq!(summary.extends, None);
    }

    #[test]
    fn test_roles_matter_and_duplicates_collapse() {
        let node = Node::object([
            ("left", Node::reference("X:Icon")),
            ("right", Node::reference("X:Icon")),
            (
                "group",
                Node::object([("first", Node::reference("X:Button")), ("second", Node::reference("X:Button"))]),
            ),
        ]);
        let summary = analyze(&node);
        assert_eq!(
            summary.entries,
            vec![
                AnatomyEntry::new("left", "X:Icon"),
                AnatomyEntry::new("right", "X:Icon"),
                AnatomyEntry::new("group.first", "X:Button"),
                AnatomyEntry::new("group.second", "X:Button"),
            ]
        );
        assert_eq!(summary.referenced_prototypes(), vec!["X:Icon", "X:Button"]);
    }

    #[test]
    fn test_inheritance_overrides_and_meta_roles() {
        let node = Node::instance(
            "Neos.Fusion:Component",
            [
                ("renderer", Node::instance("X:Card", [("media", Node::reference("X:Image"))])),
                (
                    META_KEY,
                    Node::meta([("process", Node::object([("wrap", Node::reference("X:Wrapper"))]))]),
                ),
            ],
        );
        let summary = analyze(&node);
        assert_eq!(summary.extends.as_deref(), Some("Neos.Fusion:Component"));
        assert_eq!(
            summary.entries,
            vec![
                AnatomyEntry::new("renderer", "X:Card"),
                AnatomyEntry::new("renderer.media", "X:Image"),
                AnatomyEntry::new("@process.wrap", "X:Wrapper"),
            ]
        );
    }

    #[test]
    fn test_self_cycle_edge_recorded_once() {
        let node = Node::object([("children", Node::reference("X:Tree"))]);
        let summary = analyze(&node);
        assert_eq!(summary.entries, vec![AnatomyEntry::new("children", "X:Tree")]);
    }

    #[test]
    fn test_leaf_prototype_has_no_anatomy() {
        assert!(analyze(&Node::string("x")).is_empty());
    }

    #[test]
    fn test_anatomy_tree_nests_inline_instances() {
        let node = Node::object([
            (
                "renderer",
                Node::instance(
                    "X:Card",
                    [("header", Node::object([("logo", Node::reference("X:Logo"))]))],
                ),
            ),
            ("footer", Node::reference("X:Footer")),
        ]);
        let tree = anatomy_tree(&node);
        assert_eq!(
            tree,
            vec![
                AnatomyNode {
                    role: "renderer".to_string(),
                    prototype_name: "X:Card".to_string(),
                    children: vec![AnatomyNode {
                        role: "header.logo".to_string(),
                        prototype_name: "X:Logo".to_string(),
                        children: Vec::new(),
                    }],
                },
                AnatomyNode {
                    role: "footer".to_string(),
                    prototype_name: "X:Footer".to_string(),
                    children: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = analyze(&Node::object([("icon", Node::reference("Vendor.Site:Icon"))]));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"entries": [{"role": "icon", "referencedPrototype": "Vendor.Site:Icon"}]})
        );
    }
}
