//! Document handle and position geometry
//!
//! The outline never reads the document itself; it only hands the handle
//! to symbol providers. Positions and ranges are 0-based.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A position in a document (line/column are 0-based)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A range in the document. Both ends are inclusive for containment checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Range covering whole lines `start_line..=end_line`
    pub fn lines(start_line: usize, end_line: usize) -> Self {
        Self::new(start_line, 0, end_line, usize::MAX)
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Whether the two ranges share at least one position
    pub fn intersects(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Order by start position, then by end position
    pub fn compare_by_start(a: &Range, b: &Range) -> Ordering {
        a.start.cmp(&b.start).then(a.end.cmp(&b.end))
    }
}

/// Read-only, identity-stable handle to the text being outlined
pub trait TextDocument {
    fn uri(&self) -> &str;

    /// Language identifier used by provider selectors, e.g. `"rust"`
    fn language_id(&self) -> &str;

    /// Monotonic version, bumped on every edit
    fn version(&self) -> u64;

    fn text(&self) -> &str;

    /// URI scheme (`file`, `untitled`, ...) or empty when the URI has none
    fn scheme(&self) -> &str {
        self.uri()
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .unwrap_or("")
    }
}

/// In-memory document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    uri: String,
    language_id: String,
    version: u64,
    text: String,
}

impl SourceDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version: 1,
            text: text.into(),
        }
    }

    /// Replace the whole text and bump the version
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.version += 1;
    }
}

impl TextDocument for SourceDocument {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn text(&self) -> &str {
        &self.text
    }
}
