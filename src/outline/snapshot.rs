//! Serializable view of an outline for debugging and tests

use serde::Serialize;

use super::tree::{NodeIdx, NodeKind, OutlineTree};
use crate::fuzzy::FuzzyScore;
use crate::markers::MarkerSummary;

#[derive(Debug, Serialize)]
pub struct OutlineSnapshot {
    pub groups: usize,
    pub children: Vec<NodeSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<FuzzyScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl OutlineSnapshot {
    /// Capture the presented tree, starting at the root's children
    pub fn capture(tree: &OutlineTree) -> Self {
        Self {
            groups: tree.groups().len(),
            children: tree
                .children()
                .values()
                .map(|&idx| capture_node(tree, idx))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn capture_node(tree: &OutlineTree, idx: NodeIdx) -> NodeSnapshot {
    let node = tree.node(idx);
    let (kind, name, score, marker) = match node.kind() {
        NodeKind::Root => ("root".to_string(), None, None, None),
        NodeKind::Group(group) => {
            let kind = format!("group:{}", group.provider.display_name());
            (kind, None, None, None)
        }
        NodeKind::Element(element) => (
            element.symbol.kind.label().to_string(),
            Some(element.symbol.name.clone()),
            element.score.clone(),
            element.marker,
        ),
    };

    NodeSnapshot {
        id: node.id().to_string(),
        kind,
        name,
        score,
        marker,
        children: node
            .children()
            .values()
            .map(|&child| capture_node(tree, child))
            .collect(),
    }
}
