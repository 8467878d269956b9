//! Arena-backed outline tree
//!
//! Every node (root, provider group, symbol element) lives in one `Vec`
//! and is addressed by [`NodeIdx`]. Parents are plain indices, so the
//! arena is the only owner. Each node also carries a string id that is
//! unique within the tree and stable across identical rebuilds.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::fuzzy::FuzzyScore;
use crate::markers::MarkerSummary;
use crate::provider::DocumentSymbolProvider;
use crate::symbol::DocumentSymbol;

/// Id of the root node; every other id is built by appending to it
pub const ROOT_ID: &str = "root";

/// Index of a node inside one [`OutlineTree`]. Not valid across refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

/// Symbols contributed by one provider
pub struct OutlineGroup {
    pub provider_index: usize,
    pub provider: Rc<dyn DocumentSymbolProvider>,
}

impl fmt::Debug for OutlineGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineGroup")
            .field("provider_index", &self.provider_index)
            .field("provider", &self.provider.display_name())
            .finish()
    }
}

/// One symbol occurrence
#[derive(Debug, Clone)]
pub struct OutlineElement {
    /// Symbol as reported, with `children` moved into the tree
    pub symbol: DocumentSymbol,
    /// `None` means "filtered out by the last search"
    pub score: Option<FuzzyScore>,
    pub marker: Option<MarkerSummary>,
}

impl OutlineElement {
    fn new(symbol: DocumentSymbol) -> Self {
        Self {
            symbol,
            score: Some(FuzzyScore::default()),
            marker: None,
        }
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Root,
    Group(OutlineGroup),
    Element(OutlineElement),
}

#[derive(Debug)]
pub struct OutlineNode {
    id: String,
    parent: Option<NodeIdx>,
    children: IndexMap<String, NodeIdx>,
    kind: NodeKind,
}

impl OutlineNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    /// Children keyed by id, in insertion order
    pub fn children(&self) -> &IndexMap<String, NodeIdx> {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_element(&self) -> Option<&OutlineElement> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&OutlineGroup> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Symbol name for elements, `None` for the root and groups
    pub fn name(&self) -> Option<&str> {
        self.as_element().map(|element| element.symbol.name.as_str())
    }

    pub fn score(&self) -> Option<&FuzzyScore> {
        self.as_element().and_then(|element| element.score.as_ref())
    }
}

/// The whole outline of one document for one fetch cycle
#[derive(Debug)]
pub struct OutlineTree {
    nodes: Vec<OutlineNode>,
    groups: IndexMap<String, NodeIdx>,
}

impl Default for OutlineTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineTree {
    /// Tree holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![OutlineNode {
                id: ROOT_ID.to_string(),
                parent: None,
                children: IndexMap::new(),
                kind: NodeKind::Root,
            }],
            groups: IndexMap::new(),
        }
    }

    pub fn root(&self) -> NodeIdx {
        NodeIdx(0)
    }

    pub fn node(&self, idx: NodeIdx) -> &OutlineNode {
        &self.nodes[idx.0]
    }

    pub(crate) fn element_mut(&mut self, idx: NodeIdx) -> Option<&mut OutlineElement> {
        match &mut self.nodes[idx.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The presented top level: groups, or the adopted elements of a sole group
    pub fn children(&self) -> &IndexMap<String, NodeIdx> {
        &self.node(self.root()).children
    }

    /// Every group of this cycle, whether presented or not
    pub fn groups(&self) -> &IndexMap<String, NodeIdx> {
        &self.groups
    }

    pub fn element_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Element(_)))
            .count()
    }

    /// Children of `idx` as an owned list, for walks that mutate the tree
    pub(crate) fn child_indices(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        self.node(idx).children.values().copied().collect()
    }

    /// Allocate an id for `candidate` under `container`.
    ///
    /// The id is `container.id + candidate`, suffixed with 1, 2, ... until it
    /// is unused among the container's current children.
    pub fn find_id(&self, candidate: &str, container: NodeIdx) -> String {
        let container = self.node(container);
        let id = format!("{}{}", container.id, candidate);
        if !container.children.contains_key(&id) {
            return id;
        }

        let mut suffix = 1usize;
        loop {
            let next = format!("{}{}", id, suffix);
            if !container.children.contains_key(&next) {
                return next;
            }
            suffix += 1;
        }
    }

    /// Pre-order depth-first search for `id` starting at `element`
    pub fn get_element_by_id(&self, id: &str, element: NodeIdx) -> Option<NodeIdx> {
        let node = self.node(element);
        if node.id == id {
            return Some(element);
        }
        node.children
            .values()
            .find_map(|&child| self.get_element_by_id(id, child))
    }

    /// Lookup from the root, through the presented children
    pub fn get_item_by_id(&self, id: &str) -> Option<NodeIdx> {
        self.get_element_by_id(id, self.root())
    }

    /// Create the group node for one provider. It is not part of the tree
    /// until [`OutlineTree::record_group`] and [`OutlineTree::present`].
    pub(crate) fn add_group(
        &mut self,
        provider_index: usize,
        provider: Rc<dyn DocumentSymbolProvider>,
    ) -> NodeIdx {
        let id = self.find_id(&format!("provider_{}", provider_index), self.root());
        self.push(OutlineNode {
            id,
            parent: Some(self.root()),
            children: IndexMap::new(),
            kind: NodeKind::Group(OutlineGroup {
                provider_index,
                provider,
            }),
        })
    }

    /// Convert `symbol` and its nested symbols into elements under `container`
    pub(crate) fn insert_symbol(
        &mut self,
        container: NodeIdx,
        mut symbol: DocumentSymbol,
    ) -> NodeIdx {
        let id = self.find_id(&symbol.name, container);
        let nested = std::mem::take(&mut symbol.children);

        let idx = self.push(OutlineNode {
            id: id.clone(),
            parent: Some(container),
            children: IndexMap::new(),
            kind: NodeKind::Element(OutlineElement::new(symbol)),
        });
        self.nodes[container.0].children.insert(id, idx);

        for child in nested {
            self.insert_symbol(idx, child);
        }
        idx
    }

    pub(crate) fn record_group(&mut self, group: NodeIdx) {
        let id = self.node(group).id.clone();
        self.groups.insert(id, group);
    }

    /// Decide the presented top level once every group is recorded.
    ///
    /// With exactly one group (and adoption enabled) its children are
    /// reparented to the root and shown directly; otherwise the groups are.
    pub(crate) fn present(&mut self, adopt_single_group: bool) {
        let root = self.root();

        if adopt_single_group && self.groups.len() == 1 {
            let group = self.groups[0];
            let adopted = self.node(group).children.clone();
            for &child in adopted.values() {
                self.nodes[child.0].parent = Some(root);
            }
            self.nodes[root.0].children = adopted;
        } else {
            self.nodes[root.0].children = self.groups.clone();
        }
    }

    fn push(&mut self, node: OutlineNode) -> NodeIdx {
        self.nodes.push(node);
        NodeIdx(self.nodes.len() - 1)
    }
}
