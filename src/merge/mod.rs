/*!
# Tree Merge Engine

Combines per-source [`ComponentTree`] fragments into one tree per package.

Sources are folded left to right: later sources override earlier ones.
Objects merge recursively, keeping the position of keys already present and
appending new ones. Leaves replace whatever was there before.

## Usage

```rust
use fusion_lens::ast::{ComponentTree, Node};
use fusion_lens::merge::MergeEngine;

let base = ComponentTree::new()
    .with_prototype("Vendor.Site:Button", Node::object([("label", Node::string("Click"))]));
let site = ComponentTree::new()
    .with_prototype("Vendor.Site:Button", Node::object([("size", Node::string("large"))]));

let merged = MergeEngine::default().merge([base, site]).unwrap();
let button = merged.prototype("Vendor.Site:Button").unwrap();
assert_eq!(button.children().unwrap().len(), 2);
```
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{ComponentTree, Instance, Node, Properties};
use crate::core::{LensError, LensResult, PropertyPath};

/// How tag changes at the same path are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Later node replaces the earlier one, objects merge recursively
    #[default]
    Override,
    /// Reject replacing structural content with leaves (and vice versa)
    Strict,
}

/// Broad shape of a node, used by the strict policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Leaf,
    Object,
    Meta,
    Instance,
}

fn shape(node: &Node) -> Shape {
    match node {
        Node::Scalar(_) | Node::Expression(_) => Shape::Leaf,
        Node::Object(_) => Shape::Object,
        Node::Meta(_) => Shape::Meta,
        Node::Reference(_) => Shape::Instance,
    }
}

fn is_compatible(existing: Shape, incoming: Shape) -> bool {
    match (existing, incoming) {
        (Shape::Leaf, Shape::Leaf) => true,
        (Shape::Meta, Shape::Meta) => true,
        (Shape::Object | Shape::Instance, Shape::Object | Shape::Instance) => true,
        _ => false,
    }
}

/// Merge engine
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeEngine {
    policy: MergePolicy,
}

impl MergeEngine {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Fold an ordered sequence of sources into one tree
    pub fn merge<I>(&self, sources: I) -> LensResult<ComponentTree>
    where
        I: IntoIterator<Item = ComponentTree>,
    {
        let mut count = 0usize;
        let merged = sources.into_iter().try_fold(ComponentTree::new(), |acc, next| {
            count += 1;
            self.merge_into(acc, next)
        })?;
        debug!(
            "Merged {} sources: {} paths, {} prototypes",
            count,
            merged.paths.len(),
            merged.prototypes.len()
        );
        Ok(merged)
    }

    /// Merge `next` on top of `base`
    pub fn merge_into(&self, base: ComponentTree, next: ComponentTree) -> LensResult<ComponentTree> {
        let paths = self.merge_properties(base.paths, next.paths, &PropertyPath::root())?;

        let mut prototypes = base.prototypes;
        for (name, incoming) in next.prototypes {
            let path = PropertyPath::prototype(name.clone());
            match prototypes.get_mut(&name) {
                Some(slot) => {
                    let existing = std::mem::replace(slot, Node::null());
                    *slot = self.merge_node(existing, incoming, &path)?;
                }
                None => {
                    prototypes.insert(name, incoming);
                }
            }
        }

        Ok(ComponentTree { paths, prototypes })
    }

    fn merge_properties(
        &self,
        mut base: Properties,
        incoming: Properties,
        parent: &PropertyPath,
    ) -> LensResult<Properties> {
        for (key, node) in incoming {
            match base.get_mut(&key) {
                Some(slot) => {
                    let path = parent.child(key.clone());
                    let existing = std::mem::replace(slot, Node::null());
                    *slot = self.merge_node(existing, node, &path)?;
                }
                None => {
                    base.insert(key, node);
                }
            }
        }
        Ok(base)
    }

    fn merge_node(&self, existing: Node, incoming: Node, path: &PropertyPath) -> LensResult<Node> {
        if self.policy == MergePolicy::Strict && !is_compatible(shape(&existing), shape(&incoming)) {
            return Err(LensError::MergeConflict {
                path: path.clone(),
                existing: existing.kind(),
                incoming: incoming.kind(),
            });
        }

        match (existing, incoming) {
            (Node::Object(base), Node::Object(next)) => {
                Ok(Node::Object(self.merge_properties(base, next, path)?))
            }
            (Node::Meta(base), Node::Meta(next)) => {
                Ok(Node::Meta(self.merge_properties(base, next, path)?))
            }
            // Extending an instantiated path keeps its prototype
            (Node::Reference(instance), Node::Object(next)) => Ok(Node::Reference(Instance {
                prototype: instance.prototype,
                overrides: self.merge_properties(instance.overrides, next, path)?,
            })),
            (_, incoming) => Ok(incoming),
        }
    }
}

/// Merge with the default override policy
pub fn merge<I>(sources: I) -> LensResult<ComponentTree>
where
    I: IntoIterator<Item = ComponentTree>,
{
    MergeEngine::default().merge(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::META_KEY;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn proto(name: &str, node: Node) -> ComponentTree {
        ComponentTree::new().with_prototype(name, node)
    }

    #[test]
    fn test_objects_merge_recursively() {
        let a = proto(
            "Vendor.Site:Card",
            Node::object([("header", Node::object([("title", Node::string("A"))]))]),
        );
        let b = proto(
            "Vendor.Site:Card",
            Node::object([("header", Node::object([("subtitle", Node::string("B"))]))]),
        );
        let merged = merge([a, b]).unwrap();
        let expected = Node::object([(
            "header",
            Node::object([("title", Node::string("A")), ("subtitle", Node::string("B"))]),
        )]);
        assert_eq!(merged.prototype("Vendor.Site:Card").unwrap(), &expected);
    }

    #[test]
    fn test_later_leaf_replaces_and_keeps_position() {
        let a = proto(
            "Vendor.Site:Card",
            Node::object([("c", Node::integer(1)), ("a", Node::integer(2))]),
        );
        let b = proto(
            "Vendor.Site:Card",
            Node::object([("b", Node::integer(3)), ("c", Node::expression("props.c"))]),
        );
        let merged = merge([a, b]).unwrap();
        let node = merged.prototype("Vendor.Site:Card").unwrap();
        let keys: Vec<_> = node.children().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(node.get("c"), Some(&Node::expression("props.c")));
    }

    #[test]
    fn test_later_scalar_replaces_object_under_override_policy() {
        let a = proto("X:Y", Node::object([("p", Node::object([("q", Node::integer(1))]))]));
        let b = proto("X:Y", Node::object([("p", Node::string("flat"))]));
        let merged = merge([a, b]).unwrap();
        assert_eq!(merged.prototype("X:Y").unwrap().get("p"), Some(&Node::string("flat")));
    }

    #[test]
    fn test_strict_policy_reports_conflict_path() {
        let a = proto("X:Y", Node::object([("p", Node::object([("q", Node::integer(1))]))]));
        let b = proto("X:Y", Node::object([("p", Node::string("flat"))]));
        let err = MergeEngine::new(MergePolicy::Strict).merge([a, b]).unwrap_err();
        match err {
            LensError::MergeConflict { path, existing, incoming } => {
                assert_eq!(path.to_string(), "prototype(X:Y).p");
                assert_eq!(existing, "object");
                assert_eq!(incoming, "scalar");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_policy_allows_leaf_over_leaf() {
        let a = proto("X:Y", Node::object([("p", Node::integer(1))]));
        let b = proto("X:Y", Node::object([("p", Node::expression("q"))]));
        let merged = MergeEngine::new(MergePolicy::Strict).merge([a, b]).unwrap();
        assert_eq!(merged.prototype("X:Y").unwrap().get("p"), Some(&Node::expression("q")));
    }

    #[test]
    fn test_object_extends_reference_overrides() {
        let a = proto(
            "X:Page",
            Node::object([("icon", Node::instance("X:Icon", [("size", Node::integer(12))]))]),
        );
        let b = proto("X:Page", Node::object([("icon", Node::object([("color", Node::string("red"))]))]));
        let merged = merge([a, b]).unwrap();
        let expected = Node::instance("X:Icon", [("size", Node::integer(12)), ("color", Node::string("red"))]);
        assert_eq!(merged.prototype("X:Page").unwrap().get("icon"), Some(&expected));
    }

    #[test]
    fn test_meta_directives_merge() {
        let a = proto(
            "X:Y",
            Node::object([(META_KEY, Node::meta([("if", Node::object([("a", Node::expression("x"))]))]))]),
        );
        let b = proto(
            "X:Y",
            Node::object([(META_KEY, Node::meta([("if", Node::object([("b", Node::expression("y"))]))]))]),
        );
        let merged = merge([a, b]).unwrap();
        let meta = merged.prototype("X:Y").unwrap().meta_directives().unwrap();
        assert_eq!(meta["if"].children().unwrap().len(), 2);
    }

    #[test]
    fn test_later_source_adds_prototypes_and_paths() {
        let a = proto("X:A", Node::object([("a", Node::integer(1))]));
        let b = proto("X:B", Node::object([("b", Node::integer(2))])).with_path("root", Node::reference("X:A"));
        let merged = merge([a, b]).unwrap();
        let names: Vec<_> = merged.prototype_names().collect();
        assert_eq!(names, vec!["X:A", "X:B"]);
        assert_eq!(merged.paths["root"], Node::reference("X:A"));
    }

    #[test]
    fn test_leaf_in_the_middle_resets_earlier_object() {
        let a = proto("X:A", Node::object([("a", Node::integer(0))]));
        let b = proto("X:A", Node::integer(0));
        let c = proto("X:A", Node::object(Vec::<(String, Node)>::new()));

        let engine = MergeEngine::default();
        let all = engine.merge([a.clone(), b.clone(), c.clone()]).unwrap();
        let stepwise = engine.merge_into(engine.merge([a, b]).unwrap(), c).unwrap();
        assert_eq!(all, stepwise);
        assert_eq!(all.prototype("X:A").unwrap(), &Node::object(Vec::<(String, Node)>::new()));
    }

    #[test]
    fn test_empty_source_list() {
        assert!(merge(Vec::new()).unwrap().is_empty());
    }

    fn arb_leaf() -> impl Strategy<Value = Node> {
        prop_oneof![
            any::<i64>().prop_map(Node::integer),
            "[a-z]{0,4}".prop_map(Node::string),
            "[a-z.]{1,6}".prop_map(Node::expression),
            any::<bool>().prop_map(Node::boolean),
        ]
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        arb_leaf().prop_recursive(3, 16, 3, |inner| {
            let props = prop::collection::vec(("[abc]", inner), 0..3);
            prop_oneof![
                props.clone().prop_map(Node::object),
                (prop_oneof![Just("X:A"), Just("X:B")], props).prop_map(|(name, p)| Node::instance(name, p)),
            ]
        })
    }

    fn arb_tree() -> impl Strategy<Value = ComponentTree> {
        (
            prop::collection::vec(("[pq]", arb_node()), 0..3),
            prop::collection::vec((prop_oneof![Just("X:A"), Just("X:B")], arb_node()), 0..3),
        )
            .prop_map(|(paths, prototypes)| {
                let mut tree = ComponentTree::new();
                for (k, v) in paths {
                    tree.paths.insert(k, v);
                }
                for (k, v) in prototypes {
                    tree.prototypes.insert(k.to_string(), v);
                }
                tree
            })
    }

    proptest! {
        #[test]
        fn merge_folds_left(a in arb_tree(), b in arb_tree(), c in arb_tree()) {
            let engine = MergeEngine::default();
            let all = engine.merge([a.clone(), b.clone(), c.clone()]).unwrap();
            let stepwise = engine.merge_into(engine.merge([a, b]).unwrap(), c).unwrap();
            prop_assert_eq!(&all, &stepwise);
        }
    }
}
