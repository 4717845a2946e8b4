/*!
# Component Tree AST

Typed representation of a merged Fusion component tree.

A [`ComponentTree`] holds the ordinary rendering paths and the prototype
definitions of one package. Each position in the tree is a [`Node`], a closed
union of five kinds; consumers match on it exhaustively instead of probing
for reserved keys.

```text
ComponentTree
├── paths       name → Node
└── prototypes  prototype name → Node
                 ├── Object     (plain prototype)
                 └── Reference  (prototype(A) < prototype(B), overrides = body)
```

Child order of `Object`, `Meta` and reference overrides is insertion/merge
order and is the order the reverse compiler emits.
*/

pub mod literal;

pub use literal::Literal;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{LensError, LensResult, PropertyPath};

/// Ordered property map
pub type Properties = IndexMap<String, Node>;

/// Reserved child key under which an object records its meta directives
pub const META_KEY: &str = "__meta";

/// Separator between property path segments in source text
pub const PATH_SEPARATOR: char = '.';

/// Instantiation of a named prototype, optionally with inline overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub prototype: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub overrides: Properties,
}

impl Instance {
    pub fn new(prototype: impl Into<String>) -> Self {
        Self {
            prototype: prototype.into(),
            overrides: Properties::new(),
        }
    }
}

/// AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Node {
    /// Literal value
    Scalar(Literal),
    /// Inline expression, kept verbatim without the `${}` delimiters
    Expression(String),
    /// Instantiation of another prototype
    Reference(Instance),
    /// Nested property bag
    Object(Properties),
    /// Meta directives (`@if`, `@process`, `@position`, ...)
    Meta(Properties),
}

impl Node {
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        Node::Scalar(Literal::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Node::Scalar(Literal::Float(value))
    }

    pub fn boolean(value: bool) -> Self {
        Node::Scalar(Literal::Bool(value))
    }

    pub fn null() -> Self {
        Node::Scalar(Literal::Null)
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Node::Expression(text.into())
    }

    pub fn reference(prototype: impl Into<String>) -> Self {
        Node::Reference(Instance::new(prototype))
    }

    /// Reference with inline overrides
    pub fn instance<K, I>(prototype: impl Into<String>, overrides: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Reference(Instance {
            prototype: prototype.into(),
            overrides: collect_properties(overrides),
        })
    }

    pub fn object<K, I>(children: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Object(collect_properties(children))
    }

    pub fn meta<K, I>(directives: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Meta(collect_properties(directives))
    }

    /// Tag name, used in conflict messages and listings
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Expression(_) => "expression",
            Node::Reference(_) => "reference",
            Node::Object(_) => "object",
            Node::Meta(_) => "meta",
        }
    }

    /// Nested children: object properties, meta directives or reference overrides
    pub fn children(&self) -> Option<&Properties> {
        match self {
            Node::Object(children) | Node::Meta(children) => Some(children),
            Node::Reference(instance) => Some(&instance.overrides),
            Node::Scalar(_) | Node::Expression(_) => None,
        }
    }

    /// Meta directives recorded directly on this node
    pub fn meta_directives(&self) -> Option<&Properties> {
        self.children()?.values().find_map(|child| match child {
            Node::Meta(directives) => Some(directives),
            _ => None,
        })
    }

    /// Look up a child by name
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children()?.get(key)
    }
}

fn collect_properties<K, I>(entries: I) -> Properties
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Node)>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Merged definitions of one package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentTree {
    #[serde(default)]
    pub paths: Properties,
    #[serde(default)]
    pub prototypes: IndexMap<String, Node>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style prototype insertion
    pub fn with_prototype(mut self, name: impl Into<String>, node: Node) -> Self {
        self.prototypes.insert(name.into(), node);
        self
    }

    /// Builder-style path insertion
    pub fn with_path(mut self, name: impl Into<String>, node: Node) -> Self {
        self.paths.insert(name.into(), node);
        self
    }

    pub fn prototype(&self, name: &str) -> LensResult<&Node> {
        self.prototypes
            .get(name)
            .ok_or_else(|| LensError::UnknownPrototype(name.to_string()))
    }

    pub fn prototype_names(&self) -> impl Iterator<Item = &str> {
        self.prototypes.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.prototypes.is_empty()
    }

    /// Check that every property name is non-empty and free of the path separator,
    /// and that meta directives sit only under [`META_KEY`]
    pub fn validate(&self) -> LensResult<()> {
        validate_properties(&self.paths, &PropertyPath::root())?;
        for (name, node) in &self.prototypes {
            let path = PropertyPath::prototype(name.clone());
            if name.is_empty() {
                return Err(LensError::InvalidName { path });
            }
            if let Some(children) = node.children() {
                validate_properties(children, &path)?;
            }
        }
        Ok(())
    }
}

fn validate_properties(properties: &Properties, parent: &PropertyPath) -> LensResult<()> {
    for (key, node) in properties {
        let path = parent.child(key.clone());
        if key.is_empty() || key.contains(PATH_SEPARATOR) {
            return Err(LensError::InvalidName { path });
        }
        // directives only live under the reserved key, and the reserved key holds nothing else
        if (key == META_KEY) != matches!(node, Node::Meta(_)) {
            return Err(LensError::InvalidName { path });
        }
        if let Some(children) = node.children() {
            validate_properties(children, &path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn button() -> Node {
        Node::object([
            ("label", Node::string("Click")),
            ("icon", Node::reference("Vendor.Site:Icon")),
            (META_KEY, Node::meta([("if", Node::object([("visible", Node::expression("props.visible"))]))])),
        ])
    }

    #[test]
    fn test_children_preserve_insertion_order() {
        let node = Node::object([("c", Node::integer(1)), ("a", Node::integer(2)), ("b", Node::integer(3))]);
        let keys: Vec<_> = node.children().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_meta_directives_lookup() {
        let node = button();
        let meta = node.meta_directives().unwrap();
        assert!(meta.contains_key("if"));
        assert_eq!(node.get("label"), Some(&Node::string("Click")));
        assert_eq!(node.get("icon").map(Node::kind), Some("reference"));
    }

    #[test]
    fn test_unknown_prototype() {
        let tree = ComponentTree::new().with_prototype("Vendor.Site:Button", button());
        assert!(tree.prototype("Vendor.Site:Button").is_ok());
        let err = tree.prototype("Vendor.Site:Nope").unwrap_err();
        assert!(matches!(err, LensError::UnknownPrototype(name) if name == "Vendor.Site:Nope"));
    }

    #[test]
    fn test_validate_rejects_separator_in_key() {
        let tree = ComponentTree::new()
            .with_prototype("Vendor.Site:Button", Node::object([("a.b", Node::integer(1))]));
        let err = tree.validate().unwrap_err();
        match err {
            LensError::InvalidName { path } => assert_eq!(path.to_string(), "prototype(Vendor.Site:Button).a.b"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_meta_outside_reserved_key() {
        let tree = ComponentTree::new().with_prototype(
            "X:Y",
            Node::object([
                ("wrapper", Node::meta([("if", Node::expression("props.visible"))])),
                ("other", Node::meta([("position", Node::string("end"))])),
            ]),
        );
        match tree.validate() {
            Err(LensError::InvalidName { path }) => assert_eq!(path.to_string(), "prototype(X:Y).wrapper"),
            other => panic!("expected InvalidName, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_plain_value_under_reserved_key() {
        let tree = ComponentTree::new().with_path(
            "page",
            Node::instance("X:Page", [(META_KEY, Node::string("not a directive"))]),
        );
        assert!(matches!(tree.validate(), Err(LensError::InvalidName { .. })));

        let nested = ComponentTree::new().with_prototype(
            "X:Y",
            Node::object([(
                META_KEY,
                Node::meta([("process", Node::object([(META_KEY, Node::meta([("position", Node::string("end"))]))]))]),
            )]),
        );
        assert!(nested.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_key_in_paths() {
        let tree = ComponentTree::new().with_path("root", Node::object([("", Node::null())]));
        assert!(matches!(tree.validate(), Err(LensError::InvalidName { .. })));
    }

    #[test]
    fn test_json_round_trip_keeps_shape() {
        let tree = ComponentTree::new().with_prototype("Vendor.Site:Button", button());
        let json = serde_json::to_string(&tree).unwrap();
        let back: ComponentTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_deserialize_fragment_json() {
        let json = r#"{
            "prototypes": {
                "Vendor.Site:Button": {
                    "type": "reference",
                    "value": {
                        "prototype": "Neos.Fusion:Component",
                        "overrides": {
                            "label": {"type": "scalar", "value": "Click"},
                            "count": {"type": "scalar", "value": 3},
                            "enabled": {"type": "expression", "value": "props.enabled"}
                        }
                    }
                }
            }
        }"#;
        let tree: ComponentTree = serde_json::from_str(json).unwrap();
        let node = tree.prototype("Vendor.Site:Button").unwrap();
        assert_eq!(node.get("count"), Some(&Node::integer(3)));
        assert_eq!(node.get("enabled"), Some(&Node::expression("props.enabled")));
        assert!(tree.paths.is_empty());
    }
}
