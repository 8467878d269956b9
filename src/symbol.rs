//! Document symbols as reported by providers

use serde::{Deserialize, Serialize};

use crate::document::Range;

/// Symbol kind for display and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Heading { level: u8 },
    Module,
    Class,
    Struct,
    Enum,
    Interface,
    Trait,
    Function,
    Method,
    Property,
    Field,
    Constant,
    Variable,
    EnumVariant,
    Impl,
    Namespace,
}

impl SymbolKind {
    /// Short label for rendering in the outline tree
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Heading { level: 1 } => "H1",
            SymbolKind::Heading { level: 2 } => "H2",
            SymbolKind::Heading { level: 3 } => "H3",
            SymbolKind::Heading { level: 4 } => "H4",
            SymbolKind::Heading { level: 5 } => "H5",
            SymbolKind::Heading { level: 6 } => "H6",
            SymbolKind::Heading { .. } => "H?",
            SymbolKind::Module => "mod",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::Interface => "iface",
            SymbolKind::Trait => "trait",
            SymbolKind::Function => "fn",
            SymbolKind::Method => "fn",
            SymbolKind::Property => "prop",
            SymbolKind::Field => "field",
            SymbolKind::Constant => "const",
            SymbolKind::Variable => "var",
            SymbolKind::EnumVariant => "variant",
            SymbolKind::Impl => "impl",
            SymbolKind::Namespace => "ns",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub range: Range,
}

/// One symbol occurrence, optionally with nested symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSymbol {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub kind: SymbolKind,
    /// Full extent of the symbol, e.g. a whole function body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: Range) -> Self {
        Self {
            name: name.into(),
            detail: None,
            kind,
            range: None,
            location: Location { range: location },
            children: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DocumentSymbol>) -> Self {
        self.children = children;
        self
    }

    /// The defining range, falling back to the location range
    pub fn defining_range(&self) -> Range {
        self.range.unwrap_or(self.location.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defining_range_falls_back_to_location() {
        let sym = DocumentSymbol::new("main", SymbolKind::Function, Range::new(3, 3, 3, 7));
        assert_eq!(sym.defining_range(), Range::new(3, 3, 3, 7));

        let sym = sym.with_range(Range::lines(3, 9));
        assert_eq!(sym.defining_range(), Range::lines(3, 9));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "name": "Config",
            "kind": "struct",
            "location": {
                "range": { "start": { "line": 2, "column": 0 }, "end": { "line": 2, "column": 6 } }
            }
        }"#;
        let sym: DocumentSymbol = serde_json::from_str(json).unwrap();
        assert_eq!(sym.name, "Config");
        assert_eq!(sym.kind, SymbolKind::Struct);
        assert!(sym.range.is_none());
        assert!(sym.children.is_empty());
    }
}
