//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{FutureExt, LocalBoxFuture};
use tokio_util::sync::CancellationToken;

use outline_model::{
    DocumentSymbol, DocumentSymbolProvider, OutlineConfig, OutlineModel, ProviderRegistry,
    ProviderResult, Range, SourceDocument, SymbolKind, TextDocument,
};

/// Symbol spanning whole lines `start_line..=end_line`
pub fn sym(name: &str, start_line: usize, end_line: usize) -> DocumentSymbol {
    DocumentSymbol::new(name, SymbolKind::Function, Range::lines(start_line, end_line))
}

/// Clone a concrete provider handle into the trait object the model takes
pub fn erase<P: DocumentSymbolProvider + 'static>(
    provider: &Rc<P>,
) -> Rc<dyn DocumentSymbolProvider> {
    provider.clone()
}

pub fn test_document() -> Rc<dyn TextDocument> {
    Rc::new(SourceDocument::new("file:///src/lib.rs", "rust", ""))
}

/// Build a model over a fixed provider list and let its first fetch settle
pub fn settled_model(
    providers: Vec<Rc<dyn DocumentSymbolProvider>>,
) -> (LocalPool, OutlineModel) {
    settled_model_with_config(providers, OutlineConfig::default())
}

pub fn settled_model_with_config(
    providers: Vec<Rc<dyn DocumentSymbolProvider>>,
    config: OutlineConfig,
) -> (LocalPool, OutlineModel) {
    let mut pool = LocalPool::new();
    let registry: Rc<dyn ProviderRegistry> = Rc::new(providers);
    let model = OutlineModel::with_config(test_document(), registry, pool.spawner(), config);
    pool.run_until_stalled();
    (pool, model)
}

/// Ids of the presented top level, in order
pub fn child_ids(model: &OutlineModel) -> Vec<String> {
    model.tree().children().keys().cloned().collect()
}

/// Resolves immediately with a fixed (replaceable) symbol list
pub struct ScriptedProvider {
    symbols: RefCell<Vec<DocumentSymbol>>,
    calls: RefCell<usize>,
}

impl ScriptedProvider {
    pub fn new(symbols: Vec<DocumentSymbol>) -> Rc<Self> {
        Rc::new(Self {
            symbols: RefCell::new(symbols),
            calls: RefCell::new(0),
        })
    }

    pub fn set_symbols(&self, symbols: Vec<DocumentSymbol>) {
        *self.symbols.borrow_mut() = symbols;
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl DocumentSymbolProvider for ScriptedProvider {
    fn display_name(&self) -> &str {
        "scripted"
    }

    fn provide_document_symbols(
        &self,
        _document: Rc<dyn TextDocument>,
        _token: CancellationToken,
    ) -> LocalBoxFuture<'static, ProviderResult> {
        *self.calls.borrow_mut() += 1;
        let symbols = self.symbols.borrow().clone();
        futures::future::ready(Ok(Some(symbols))).boxed_local()
    }
}

/// Always rejects
pub struct FailingProvider;

impl DocumentSymbolProvider for FailingProvider {
    fn display_name(&self) -> &str {
        "failing"
    }

    fn provide_document_symbols(
        &self,
        _document: Rc<dyn TextDocument>,
        _token: CancellationToken,
    ) -> LocalBoxFuture<'static, ProviderResult> {
        futures::future::ready(Err(anyhow!("language server crashed"))).boxed_local()
    }
}

/// Never resolves on its own; each call is resolved by the test
#[derive(Default)]
pub struct PendingProvider {
    senders: RefCell<Vec<Option<oneshot::Sender<ProviderResult>>>>,
    tokens: RefCell<Vec<CancellationToken>>,
}

impl PendingProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.senders.borrow().len()
    }

    pub fn token(&self, call: usize) -> CancellationToken {
        self.tokens.borrow()[call].clone()
    }

    /// Resolve request number `call`. Ignored if the request was dropped.
    pub fn resolve(&self, call: usize, symbols: Vec<DocumentSymbol>) {
        if let Some(sender) = self.senders.borrow_mut()[call].take() {
            let _ = sender.send(Ok(Some(symbols)));
        }
    }
}

impl DocumentSymbolProvider for PendingProvider {
    fn display_name(&self) -> &str {
        "pending"
    }

    fn provide_document_symbols(
        &self,
        _document: Rc<dyn TextDocument>,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, ProviderResult> {
        let (tx, rx) = oneshot::channel();
        self.senders.borrow_mut().push(Some(tx));
        self.tokens.borrow_mut().push(token);

        async move {
            match rx.await {
                Ok(result) => result,
                Err(_canceled) => Ok(None),
            }
        }
        .boxed_local()
    }
}
