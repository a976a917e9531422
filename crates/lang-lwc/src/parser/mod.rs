mod doc;
mod members;
mod position;

use position::LineIndex;
use std::path::Path;
use tagscope_api::{CompileOutput, ComponentMetadata, Diagnostic, MetadataCompiler};
use tree_sitter::{Language, Node, Parser, Tree};

/// `MetadataCompiler` over the tree-sitter JavaScript and TypeScript grammars.
#[derive(Clone)]
pub struct LwcCompiler {
    javascript: Language,
    typescript: Language,
}

impl Default for LwcCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl LwcCompiler {
    pub fn new() -> Self {
        Self {
            javascript: tree_sitter_javascript::LANGUAGE.into(),
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    fn language_for(&self, file_name: &str) -> &Language {
        let is_ts = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ts"));
        if is_ts { &self.typescript } else { &self.javascript }
    }

    fn parse(&self, source: &str, file_name: &str) -> Result<Tree, Diagnostic> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(file_name))
            .map_err(|e| Diagnostic::new(e.to_string(), None))?;
        parser
            .parse(source, None)
            .ok_or_else(|| Diagnostic::new(format!("Failed to parse {}", file_name), None))
    }
}

impl MetadataCompiler for LwcCompiler {
    fn compile(&self, source: &str, file_name: &str) -> CompileOutput {
        let tree = match self.parse(source, file_name) {
            Ok(tree) => tree,
            Err(diagnostic) => return CompileOutput::failed(vec![diagnostic]),
        };
        let lines = LineIndex::new(source);
        let root = tree.root_node();

        if root.has_error() {
            let range = first_error(root).map(|n| lines.range(n));
            tracing::debug!("Syntax error in {}", file_name);
            return CompileOutput::failed(vec![Diagnostic::new("Syntax error", range)]);
        }

        let Some((export, class)) = default_class(root) else {
            return CompileOutput::failed(vec![Diagnostic::new(
                "Module has no default exported class",
                None,
            )]);
        };
        let Some(body) = class.child_by_field_name("body") else {
            return CompileOutput::failed(vec![Diagnostic::new(
                "Class has no body",
                Some(lines.range(class)),
            )]);
        };

        let class_members = members::collect(body, source, &lines);
        let mut decorators = Vec::new();
        for decorator in class_members.iter().filter_map(|m| m.decorator) {
            if !decorators.contains(&decorator) {
                decorators.push(decorator);
            }
        }

        CompileOutput::ok(ComponentMetadata {
            decorators,
            class_members,
            declaration_loc: Some(lines.range(class)),
            doc: doc::leading_doc(export, source),
        })
    }
}

/// The `export default class` statement and its class node.
fn default_class(root: Node<'_>) -> Option<(Node<'_>, Node<'_>)> {
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        if statement.kind() != "export_statement" {
            continue;
        }
        let mut inner = statement.walk();
        let is_default = statement.children(&mut inner).any(|c| c.kind() == "default");
        if !is_default {
            continue;
        }
        let class = statement
            .child_by_field_name("declaration")
            .or_else(|| statement.child_by_field_name("value"))
            .filter(|n| matches!(n.kind(), "class_declaration" | "class"));
        if let Some(class) = class {
            return Some((statement, class));
        }
    }
    None
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_grammar_from_extension() {
        let compiler = LwcCompiler::new();
        let ts = "export default class Foo { @api label: string; }";
        assert!(compiler.compile(ts, "foo.ts").diagnostics.is_empty());
        assert!(!compiler.compile(ts, "foo.js").diagnostics.is_empty());
    }

    #[test]
    fn anonymous_default_class_is_accepted() {
        let out = LwcCompiler::new().compile("export default class extends Base {}", "foo.js");
        assert!(out.diagnostics.is_empty());
        assert!(out.metadata.unwrap().class_members.is_empty());
    }
}
