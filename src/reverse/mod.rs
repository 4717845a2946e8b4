/*!
# Reverse Compiler

Regenerates Fusion source text from a merged prototype AST.

The output is what an author would have written to obtain the same tree:
a parser reading it back produces an equal [`Node`]. Formatting is fixed
(one statement per line, one indentation level per nesting depth), so the
text is not byte-identical to any original file.

```text
prototype(Vendor.Site:Button) < prototype(Neos.Fusion:Component) {
    label = 'Click'
    icon = Vendor.Site:Icon {
        size = 12
    }
    @if.visible = ${props.visible}
}
```

Rendering never dereferences prototype names: a reference is emitted as a
name, so missing or cyclic prototypes cannot make it fail or loop.
*/

mod literal;

pub use literal::{format_key, format_literal, quote_string};

use serde::{Deserialize, Serialize};

use crate::ast::{Node, Properties};
use crate::core::{LensResult, PropertyPath};

/// Formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// One level of indentation
    #[serde(default = "default_indent")]
    pub indent: String,
}

fn default_indent() -> String {
    "    ".to_string()
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

/// Reverse compiler
#[derive(Debug, Clone, Default)]
pub struct ReverseCompiler {
    options: RenderOptions,
}

impl ReverseCompiler {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Source text of a single prototype definition
    pub fn render_prototype(&self, name: &str, node: &Node) -> LensResult<String> {
        let mut emitter = Emitter::new(&self.options.indent);
        let path = PropertyPath::prototype(name);
        let header = format!("prototype({})", name);

        match node {
            Node::Object(children) => emitter.write_block(&header, children, &path, 0)?,
            Node::Reference(instance) => {
                let header = format!("{} < prototype({})", header, instance.prototype);
                emitter.write_block(&header, &instance.overrides, &path, 0)?;
            }
            Node::Meta(directives) => {
                emitter.line(0, &format!("{} {{", header));
                emitter.write_directives(directives, &path, 1)?;
                emitter.line(0, "}");
            }
            Node::Scalar(_) | Node::Expression(_) => emitter.write_property(&header, node, &path, 0)?,
        }

        Ok(emitter.finish())
    }

    /// Source text of the ordinary path tree, statements at top level
    pub fn render_paths(&self, paths: &Properties) -> LensResult<String> {
        let mut emitter = Emitter::new(&self.options.indent);
        emitter.write_body(paths, &PropertyPath::root(), 0)?;
        Ok(emitter.finish())
    }
}

/// Render a prototype with default options
pub fn render(name: &str, node: &Node) -> LensResult<String> {
    ReverseCompiler::default().render_prototype(name, node)
}

struct Emitter<'a> {
    out: String,
    indent: &'a str,
}

impl<'a> Emitter<'a> {
    fn new(indent: &'a str) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn write_block(
        &mut self,
        header: &str,
        children: &Properties,
        path: &PropertyPath,
        depth: usize,
    ) -> LensResult<()> {
        self.line(depth, &format!("{} {{", header));
        self.write_body(children, path, depth + 1)?;
        self.line(depth, "}");
        Ok(())
    }

    fn write_body(&mut self, children: &Properties, path: &PropertyPath, depth: usize) -> LensResult<()> {
        for (key, node) in children {
            match node {
                // meta keys are reserved; directives are emitted where they were recorded
                Node::Meta(directives) => self.write_directives(directives, path, depth)?,
                _ => self.write_property(&format_key(key), node, &path.child(key.clone()), depth)?,
            }
        }
        Ok(())
    }

    fn write_directives(&mut self, directives: &Properties, path: &PropertyPath, depth: usize) -> LensResult<()> {
        for (name, value) in directives {
            let key = format!("@{}", format_key(name));
            let path = path.child(format!("@{}", name));
            match value {
                Node::Object(children)
                    if !children.is_empty() && !children.values().any(|c| matches!(c, Node::Meta(_))) =>
                {
                    for (child_key, child) in children {
                        let line_key = format!("{}.{}", key, format_key(child_key));
                        self.write_property(&line_key, child, &path.child(child_key.clone()), depth)?;
                    }
                }
                _ => self.write_property(&key, value, &path, depth)?,
            }
        }
        Ok(())
    }

    fn write_property(&mut self, key: &str, node: &Node, path: &PropertyPath, depth: usize) -> LensResult<()> {
        match node {
            Node::Scalar(literal) => {
                let value = format_literal(literal, path)?;
                self.line(depth, &format!("{} = {}", key, value));
            }
            Node::Expression(text) => self.line(depth, &format!("{} = ${{{}}}", key, text)),
            Node::Reference(instance) if instance.overrides.is_empty() => {
                self.line(depth, &format!("{} = {}", key, instance.prototype));
            }
            Node::Reference(instance) => {
                let header = format!("{} = {}", key, instance.prototype);
                self.write_block(&header, &instance.overrides, path, depth)?;
            }
            Node::Object(children) => self.write_block(key, children, path, depth)?,
            Node::Meta(directives) => {
                self.line(depth, &format!("{} {{", key));
                self.write_directives(directives, path, depth + 1)?;
                self.line(depth, "}");
            }
        }
        Ok(())
    }
}
