//! Symbol provider built on tree-sitter parse trees
//!
//! Walks the syntax tree of Rust and Python documents, collects the
//! structural items as a flat list and nests them by byte-range
//! containment.

use std::rc::Rc;

use anyhow::{anyhow, Context};
use futures::future::{self, LocalBoxFuture};
use tokio_util::sync::CancellationToken;
use tree_sitter::{Language, Node, Parser};

use super::{DocumentSymbolProvider, ProviderResult};
use crate::document::{Range, TextDocument};
use crate::symbol::{DocumentSymbol, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyntaxLanguage {
    Rust,
    Python,
}

impl SyntaxLanguage {
    fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "rust" => Some(SyntaxLanguage::Rust),
            "python" => Some(SyntaxLanguage::Python),
            _ => None,
        }
    }

    fn grammar(self) -> Language {
        match self {
            SyntaxLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
            SyntaxLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }
}

/// Extracts symbols for `rust` and `python` documents.
///
/// Parsing is synchronous, so the returned future is already resolved.
#[derive(Debug, Default)]
pub struct TreeSitterSymbolProvider;

impl TreeSitterSymbolProvider {
    pub fn new() -> Self {
        Self
    }

    fn extract(&self, document: &dyn TextDocument) -> ProviderResult {
        let Some(language) = SyntaxLanguage::from_language_id(document.language_id()) else {
            return Ok(None);
        };

        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|err| anyhow!("failed to load {:?} grammar: {}", language, err))?;

        let source = document.text();
        let tree = parser
            .parse(source, None)
            .with_context(|| format!("tree-sitter produced no tree for {}", document.uri()))?;

        let mut flat = Vec::new();
        match language {
            SyntaxLanguage::Rust => collect_rust_symbols(tree.root_node(), source, &mut flat),
            SyntaxLanguage::Python => collect_python_symbols(tree.root_node(), source, &mut flat),
        }

        Ok(Some(nest_by_containment(flat)))
    }
}

impl DocumentSymbolProvider for TreeSitterSymbolProvider {
    fn display_name(&self) -> &str {
        "tree-sitter"
    }

    fn provide_document_symbols(
        &self,
        document: Rc<dyn TextDocument>,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, ProviderResult> {
        let result = if token.is_cancelled() {
            Ok(None)
        } else {
            self.extract(document.as_ref())
        };
        Box::pin(future::ready(result))
    }
}

// =============================================================================
// Flat symbol for pre-nesting
// =============================================================================

struct FlatSymbol {
    kind: SymbolKind,
    name: String,
    start_byte: usize,
    end_byte: usize,
    range: Range,
    selection: Range,
    detail: Option<String>,
}

fn node_range(node: &Node) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range::new(start.row, start.column, end.row, end.column)
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    node.utf8_text(source.as_bytes()).ok()
}

/// Push `node` as a symbol named after its `name` field
fn push_named(kind: SymbolKind, node: &Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    if let Some(name) = node_text(&name_node, source) {
        symbols.push(flat_sym(kind, name, node, &name_node));
    }
}

/// Like [`push_named`], with the parameter list (and return type) as detail
fn push_function(kind: SymbolKind, node: &Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    let before = symbols.len();
    push_named(kind, node, source, symbols);
    if symbols.len() == before {
        return;
    }

    let params = node
        .child_by_field_name("parameters")
        .and_then(|params| node_text(&params, source));
    let returns = node
        .child_by_field_name("return_type")
        .and_then(|ret| node_text(&ret, source));
    let detail = match (params, returns) {
        (Some(params), Some(returns)) => Some(format!("{} -> {}", params, returns)),
        (Some(params), None) => Some(params.to_string()),
        _ => None,
    };

    if let Some(symbol) = symbols.last_mut() {
        symbol.detail = detail;
    }
}

fn flat_sym(kind: SymbolKind, name: &str, node: &Node, name_node: &Node) -> FlatSymbol {
    FlatSymbol {
        kind,
        name: name.to_string(),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        range: node_range(node),
        selection: node_range(name_node),
        detail: None,
    }
}

// =============================================================================
// Range-containment nesting
// =============================================================================

fn into_symbol(flat: FlatSymbol) -> DocumentSymbol {
    let symbol = DocumentSymbol::new(flat.name, flat.kind, flat.selection).with_range(flat.range);
    match flat.detail {
        Some(detail) => symbol.with_detail(detail),
        None => symbol,
    }
}

fn attach(
    finished: DocumentSymbol,
    stack: &mut [(usize, DocumentSymbol)],
    roots: &mut Vec<DocumentSymbol>,
) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(finished),
        None => roots.push(finished),
    }
}

fn nest_by_containment(mut symbols: Vec<FlatSymbol>) -> Vec<DocumentSymbol> {
    // Parents before children
    symbols.sort_by(|a, b| {
        a.start_byte
            .cmp(&b.start_byte)
            .then(b.end_byte.cmp(&a.end_byte))
    });

    let mut roots = Vec::new();
    // (end_byte, symbol)
    let mut stack: Vec<(usize, DocumentSymbol)> = Vec::new();

    for sym in symbols {
        while stack.last().is_some_and(|(end, _)| *end <= sym.start_byte) {
            if let Some((_, finished)) = stack.pop() {
                attach(finished, &mut stack, &mut roots);
            }
        }
        stack.push((sym.end_byte, into_symbol(sym)));
    }

    while let Some((_, finished)) = stack.pop() {
        attach(finished, &mut stack, &mut roots);
    }

    roots
}

// =============================================================================
// Rust
// =============================================================================

fn collect_rust_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "function_item" | "function_signature_item" => {
            push_function(SymbolKind::Function, &node, source, symbols)
        }
        "struct_item" | "union_item" => push_named(SymbolKind::Struct, &node, source, symbols),
        "enum_item" => push_named(SymbolKind::Enum, &node, source, symbols),
        "enum_variant" => push_named(SymbolKind::EnumVariant, &node, source, symbols),
        "trait_item" => push_named(SymbolKind::Trait, &node, source, symbols),
        "const_item" | "static_item" => push_named(SymbolKind::Constant, &node, source, symbols),
        "mod_item" => push_named(SymbolKind::Module, &node, source, symbols),
        "field_declaration" => push_named(SymbolKind::Field, &node, source, symbols),
        "impl_item" => {
            if let Some(type_node) = node.child_by_field_name("type") {
                if let Some(name) = node_text(&type_node, source) {
                    let label = match node
                        .child_by_field_name("trait")
                        .and_then(|t| node_text(&t, source))
                    {
                        Some(trait_name) => format!("{} for {}", trait_name, name),
                        None => name.to_string(),
                    };
                    symbols.push(flat_sym(SymbolKind::Impl, &label, &node, &type_node));
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_rust_symbols(child, source, symbols);
    }
}

// =============================================================================
// Python
// =============================================================================

fn collect_python_symbols(node: Node, source: &str, symbols: &mut Vec<FlatSymbol>) {
    match node.kind() {
        "function_definition" => {
            let inside_class = enclosing_block(node)
                .and_then(|block| block.parent())
                .is_some_and(|owner| owner.kind() == "class_definition");
            let kind = if inside_class {
                SymbolKind::Method
            } else {
                SymbolKind::Function
            };
            push_function(kind, &node, source, symbols);
        }
        "class_definition" => push_named(SymbolKind::Class, &node, source, symbols),
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_python_symbols(child, source, symbols);
    }
}

/// The block holding a definition, looking through any decorators
fn enclosing_block(node: Node) -> Option<Node> {
    let parent = node.parent()?;
    if parent.kind() == "decorated_definition" {
        parent.parent()
    } else {
        Some(parent)
    }
}
