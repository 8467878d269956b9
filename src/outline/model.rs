//! Outline model: aggregates every provider's symbols for one document
//!
//! Construction starts a fetch cycle on the given [`LocalSpawner`]. A cycle
//! asks each provider for symbols concurrently, waits for all of them,
//! builds a fresh [`OutlineTree`] and swaps it in. A newer cycle (or
//! [`OutlineModel::dispose`]) cancels the older one, whose results are then
//! dropped without touching the model.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::executor::LocalSpawner;
use futures::future::{self, Either};
use futures::task::LocalSpawnExt;
use tokio_util::sync::CancellationToken;

use super::snapshot::OutlineSnapshot;
use super::tree::{NodeIdx, OutlineNode, OutlineTree};
use crate::config::OutlineConfig;
use crate::document::{Position, Range, TextDocument};
use crate::fuzzy::Scorer;
use crate::markers::Marker;
use crate::provider::{DocumentSymbolProvider, ProviderRegistry};

/// Sent to subscribers after a fetch cycle is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineEvent {
    Updated { groups: usize, elements: usize },
}

#[derive(Default)]
struct ModelState {
    tree: OutlineTree,
    settled: bool,
    listeners: Vec<UnboundedSender<OutlineEvent>>,
}

pub struct OutlineModel {
    document: Rc<dyn TextDocument>,
    registry: Rc<dyn ProviderRegistry>,
    spawner: LocalSpawner,
    config: OutlineConfig,
    scorer: Box<dyn Scorer>,
    state: Rc<RefCell<ModelState>>,
    /// Cancels the in-flight fetch cycle
    request: Option<CancellationToken>,
}

impl OutlineModel {
    pub fn new(
        document: Rc<dyn TextDocument>,
        registry: Rc<dyn ProviderRegistry>,
        spawner: LocalSpawner,
    ) -> Self {
        Self::with_config(document, registry, spawner, OutlineConfig::default())
    }

    pub fn with_config(
        document: Rc<dyn TextDocument>,
        registry: Rc<dyn ProviderRegistry>,
        spawner: LocalSpawner,
        config: OutlineConfig,
    ) -> Self {
        let mut model = Self {
            document,
            registry,
            spawner,
            scorer: config.scorer.build(),
            config,
            state: Rc::default(),
            request: None,
        };
        model.start_fetch();
        model
    }

    pub fn document(&self) -> &Rc<dyn TextDocument> {
        &self.document
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Replace the fuzzy scorer used by [`OutlineModel::update_matches`]
    pub fn set_scorer(&mut self, scorer: Box<dyn Scorer>) {
        self.scorer = scorer;
    }

    /// Read access to the current tree.
    ///
    /// Drop the guard before driving the executor again; a fetch cycle that
    /// completes while it is held would panic on the borrow.
    pub fn tree(&self) -> Ref<'_, OutlineTree> {
        Ref::map(self.state.borrow(), |state| &state.tree)
    }

    /// Whether the latest fetch cycle has been applied
    pub fn is_settled(&self) -> bool {
        self.state.borrow().settled
    }

    /// Receive an [`OutlineEvent`] after every applied fetch cycle
    pub fn subscribe(&self) -> UnboundedReceiver<OutlineEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.state.borrow_mut().listeners.push(tx);
        rx
    }

    /// Cancel the in-flight cycle, clear the tree and fetch again
    pub fn refresh(&mut self) {
        self.cancel_request();
        {
            let mut state = self.state.borrow_mut();
            state.tree = OutlineTree::new();
            state.settled = false;
        }
        self.start_fetch();
    }

    /// Cancel the in-flight cycle. The tree is left as it is.
    pub fn dispose(&mut self) {
        self.cancel_request();
    }

    /// Score every element against `pattern` and return the id of the best
    /// match across all groups
    pub fn update_matches(&self, pattern: &str) -> Option<String> {
        let mut state = self.state.borrow_mut();
        let best = state.tree.update_matches(pattern, self.scorer.as_ref())?;
        Some(state.tree.node(best).id().to_string())
    }

    /// Id of the deepest element containing `position`, first group wins
    pub fn get_item_enclosing_position(&self, position: Position) -> Option<String> {
        let state = self.state.borrow();
        let hit = state.tree.item_enclosing_position(position)?;
        Some(state.tree.node(hit).id().to_string())
    }

    pub fn get_item_by_id(&self, id: &str) -> Option<Ref<'_, OutlineNode>> {
        Ref::filter_map(self.state.borrow(), |state| {
            state
                .tree
                .get_item_by_id(id)
                .map(|idx| state.tree.node(idx))
        })
        .ok()
    }

    /// Attach problem markers to the current tree
    pub fn update_markers(&self, markers: &[Marker]) {
        self.state.borrow_mut().tree.update_markers(markers);
    }

    pub fn snapshot(&self) -> OutlineSnapshot {
        OutlineSnapshot::capture(&self.state.borrow().tree)
    }

    fn start_fetch(&mut self) {
        let token = CancellationToken::new();
        let providers = self.registry.ordered(self.document.as_ref());

        tracing::debug!(
            uri = self.document.uri(),
            version = self.document.version(),
            providers = providers.len(),
            "requesting document symbols"
        );

        let cycle = FetchCycle {
            document: Rc::clone(&self.document),
            providers,
            token: token.clone(),
            state: Rc::downgrade(&self.state),
            adopt_single_group: self.config.adopt_single_group,
        };

        if let Err(err) = self.spawner.spawn_local(cycle.run()) {
            tracing::warn!("Failed to schedule outline request: {}", err);
        }
        self.request = Some(token);
    }

    fn cancel_request(&mut self) {
        if let Some(token) = self.request.take() {
            token.cancel();
        }
    }
}

impl Drop for OutlineModel {
    fn drop(&mut self) {
        self.cancel_request();
    }
}

/// One round of provider requests and the continuation that applies them
struct FetchCycle {
    document: Rc<dyn TextDocument>,
    providers: Vec<Rc<dyn DocumentSymbolProvider>>,
    token: CancellationToken,
    state: Weak<RefCell<ModelState>>,
    adopt_single_group: bool,
}

impl FetchCycle {
    async fn run(self) {
        let requests = self.providers.iter().map(|provider| {
            let request =
                provider.provide_document_symbols(Rc::clone(&self.document), self.token.clone());
            let token = self.token.clone();
            async move {
                let cancelled = token.cancelled();
                futures::pin_mut!(cancelled);
                match future::select(cancelled, request).await {
                    Either::Left(_) => None,
                    Either::Right((result, _)) => Some(result),
                }
            }
        });
        let results = future::join_all(requests).await;

        if self.token.is_cancelled() {
            tracing::debug!(
                uri = self.document.uri(),
                "discarding results of cancelled outline request"
            );
            return;
        }
        let Some(state) = self.state.upgrade() else {
            return;
        };

        let mut tree = OutlineTree::new();
        for (index, (provider, result)) in self.providers.into_iter().zip(results).enumerate() {
            let symbols = match result {
                Some(Ok(symbols)) => symbols.unwrap_or_default(),
                Some(Err(err)) => {
                    tracing::warn!(
                        provider = provider.display_name(),
                        index,
                        "Document symbol provider failed: {:#}",
                        err
                    );
                    Vec::new()
                }
                None => Vec::new(),
            };

            let group = tree.add_group(index, provider);
            for symbol in symbols {
                tree.insert_symbol(group, symbol);
            }
            tree.record_group(group);
        }
        tree.present(self.adopt_single_group);

        let event = OutlineEvent::Updated {
            groups: tree.groups().len(),
            elements: tree.element_count(),
        };
        tracing::debug!(uri = self.document.uri(), ?event, "outline updated");

        let mut state = state.borrow_mut();
        state.tree = tree;
        state.settled = true;
        state
            .listeners
            .retain(|listener| listener.unbounded_send(event.clone()).is_ok());
    }
}

// Model-wide queries: each delegates into the groups in order
impl OutlineTree {
    /// Best match across all groups; one accumulator is threaded through
    pub fn update_matches(&mut self, pattern: &str, scorer: &dyn Scorer) -> Option<NodeIdx> {
        let groups: Vec<NodeIdx> = self.groups().values().copied().collect();
        groups.into_iter().fold(None, |top, group| {
            self.update_group_matches(group, pattern, scorer, top)
        })
    }

    /// First group with a hit wins; groups are not compared
    pub fn item_enclosing_position(&self, position: Position) -> Option<NodeIdx> {
        self.groups()
            .values()
            .find_map(|&group| self.group_item_enclosing_position(group, position))
    }

    /// Every group sees the full, start-sorted marker list
    pub fn update_markers(&mut self, markers: &[Marker]) {
        let mut sorted = markers.to_vec();
        sorted.sort_by(|a, b| Range::compare_by_start(&a.range, &b.range));

        let groups: Vec<NodeIdx> = self.groups().values().copied().collect();
        for group in groups {
            self.update_group_markers(group, &sorted);
        }
    }
}
