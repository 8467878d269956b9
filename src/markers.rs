//! Problem markers (diagnostics) attached to outline elements

use serde::{Deserialize, Serialize};

use crate::document::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSeverity {
    Hint,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub range: Range,
    pub severity: MarkerSeverity,
    #[serde(default)]
    pub message: String,
}

impl Marker {
    pub fn new(range: Range, severity: MarkerSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
        }
    }
}

/// Markers claimed by one element.
///
/// `count` only includes markers that no child claimed, `top_severity`
/// covers the whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerSummary {
    pub count: usize,
    pub top_severity: MarkerSeverity,
}
