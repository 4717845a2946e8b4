/*!
# Fusion Lens

Development-time inspector for Fusion-style component trees. Takes the
per-source trees produced by a forward parser and answers the questions a
living styleguide asks about them.

## Pipeline

```text
fragments ──► Merge ──► merged ComponentTree ──┬──► Reverse compiler ──► source text
                                               ├──► Anatomy ──► composition outline
                                               └──► Catalog ◄── Classifier (structure + hide rules)
```

- **AST** (`ast`): closed node model, ordered property maps
- **Merge** (`merge`): left fold over fragments with override precedence
- **Reverse compiler** (`reverse`): AST back to formatted source
- **Anatomy** (`anatomy`): deduplicated composition outline, with a cycle-safe
  transitive expansion
- **Rules** (`rules`): first-match structure groups and glob hide patterns
- **Catalog** (`catalog`): listings, styleguide objects, detail views and the
  [`Inspector`] facade
- **Source** (`source`): fragment suppliers (memory, directory of JSON/YAML)

## Usage

```rust,no_run
use fusion_lens::{DirectorySource, Inspector, Settings};

let inspector = Inspector::new(DirectorySource::new("./fragments"), Settings::default());
let package = inspector.resolve_package(None)?;
for (name, object) in inspector.catalog(&package)? {
    println!("{} [{}]", name, object.structure.map(|s| s.label).unwrap_or_default());
}
# Ok::<(), fusion_lens::LensError>(())
```
*/

pub mod anatomy;
pub mod ast;
pub mod catalog;
pub mod cli_common;
pub mod configuration;
pub mod core;
pub mod merge;
pub mod reverse;
pub mod rules;
pub mod source;

pub use anatomy::{analyze, anatomy_tree, resolve, AnatomyEntry, AnatomyNode, AnatomySummary, ResolveStatus, ResolvedComposition};
pub use ast::{ComponentTree, Instance, Literal, Node, Properties, META_KEY};
pub use catalog::{
    catalog, list_prototypes, prototype_detail, render_prototype_source, styleguide_objects, Inspector,
    PrototypeDetail, PrototypeListing, StyleguideObject,
};
pub use configuration::{LocalePreset, Settings, SiteConfiguration, ViewportPreset};
pub use crate::core::{LensError, LensResult, PathRoot, PropertyPath};
pub use merge::{merge, MergeEngine, MergePolicy};
pub use reverse::{render, RenderOptions, ReverseCompiler};
pub use rules::{classify, is_hidden, Classifier, HidePatterns, Structure, StructureRule, StructureRules};
pub use source::{DirectorySource, FragmentSource, MemorySource};

/// Merged tree of `package` with default settings
pub fn get_merged_tree<S: FragmentSource>(source: &S, package: &str) -> LensResult<ComponentTree> {
    let tree = MergeEngine::default().merge(source.fragments(package)?)?;
    tree.validate()?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_merged_tree() {
        let source = MemorySource::new()
            .with_fragment("P", ComponentTree::new().with_prototype("P:A", Node::object([("a", Node::integer(1))])))
            .with_fragment("P", ComponentTree::new().with_prototype("P:A", Node::object([("b", Node::integer(2))])));
        let tree = get_merged_tree(&source, "P").unwrap();
        let names: Vec<_> = tree.prototype("P:A").unwrap().children().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_names_rejected_after_merge() {
        let source = MemorySource::new().with_fragment(
            "P",
            ComponentTree::new().with_prototype("P:A", Node::object([("a.b", Node::integer(1))])),
        );
        assert!(matches!(get_merged_tree(&source, "P"), Err(LensError::InvalidName { .. })));
    }

    #[test]
    fn test_misplaced_directives_rejected_after_merge() {
        let source = MemorySource::new()
            .with_fragment("P", ComponentTree::new().with_prototype("P:A", Node::object([("a", Node::integer(1))])))
            .with_fragment(
                "P",
                ComponentTree::new().with_prototype("P:A", Node::object([("late", Node::meta([("if", Node::boolean(true))]))])),
            );
        assert!(matches!(get_merged_tree(&source, "P"), Err(LensError::InvalidName { .. })));
    }
}
