//! Symbol providers and the registry that orders them per document
//!
//! A provider answers "which symbols are in this document" asynchronously
//! and may fail. The registry decides which providers apply to a document
//! and in which order; that order becomes each group's `provider_index`.

mod syntax;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use tokio_util::sync::CancellationToken;

use crate::document::TextDocument;
use crate::symbol::DocumentSymbol;

pub use syntax::TreeSitterSymbolProvider;

/// `Ok(None)` and `Ok(Some(vec![]))` both mean "no symbols"
pub type ProviderResult = anyhow::Result<Option<Vec<DocumentSymbol>>>;

/// Capability that yields the symbols it understands for a document
pub trait DocumentSymbolProvider {
    /// Name used in log output
    fn display_name(&self) -> &str {
        "provider"
    }

    /// Compute symbols for `document`.
    ///
    /// Implementations should stop early once `token` is cancelled; the
    /// caller discards results of cancelled requests either way.
    fn provide_document_symbols(
        &self,
        document: Rc<dyn TextDocument>,
        token: CancellationToken,
    ) -> LocalBoxFuture<'static, ProviderResult>;
}

/// Supplies the ordered providers for a document
pub trait ProviderRegistry {
    fn ordered(&self, document: &dyn TextDocument) -> Vec<Rc<dyn DocumentSymbolProvider>>;
}

/// A fixed list applies to every document in list order
impl ProviderRegistry for Vec<Rc<dyn DocumentSymbolProvider>> {
    fn ordered(&self, _document: &dyn TextDocument) -> Vec<Rc<dyn DocumentSymbolProvider>> {
        self.clone()
    }
}

/// Which documents a provider applies to. `"*"` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSelector {
    pub language: Option<String>,
    pub scheme: Option<String>,
}

impl DocumentSelector {
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            scheme: None,
        }
    }

    pub fn scheme(scheme: impl Into<String>) -> Self {
        Self {
            language: None,
            scheme: Some(scheme.into()),
        }
    }

    /// Selector matching every document
    pub fn any() -> Self {
        Self::language("*")
    }

    /// Match score for a document; 0 means the selector does not apply.
    ///
    /// Exact matches score 10, wildcards 5. When both fields are set both
    /// must match and the higher score wins.
    pub fn score(&self, document: &dyn TextDocument) -> u32 {
        let mut score = 0;

        if let Some(language) = &self.language {
            match field_score(language, document.language_id()) {
                0 => return 0,
                s => score = score.max(s),
            }
        }

        if let Some(scheme) = &self.scheme {
            match field_score(scheme, document.scheme()) {
                0 => return 0,
                s => score = score.max(s),
            }
        }

        score
    }
}

fn field_score(pattern: &str, value: &str) -> u32 {
    if pattern == value {
        10
    } else if pattern == "*" {
        5
    } else {
        0
    }
}

struct RegistryEntry {
    id: u64,
    selector: DocumentSelector,
    provider: Rc<dyn DocumentSymbolProvider>,
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    entries: Vec<RegistryEntry>,
}

/// Selector-based provider registry.
///
/// Providers are ordered by selector score (best first), then by
/// registration (most recent first).
#[derive(Clone, Default)]
pub struct SymbolProviderRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl SymbolProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        selector: DocumentSelector,
        provider: Rc<dyn DocumentSymbolProvider>,
    ) -> Registration {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;

        tracing::debug!(
            provider = provider.display_name(),
            ?selector,
            "registered document symbol provider"
        );

        inner.entries.push(RegistryEntry {
            id,
            selector,
            provider,
        });

        Registration {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any provider applies to `document`
    pub fn has(&self, document: &dyn TextDocument) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|entry| entry.selector.score(document) > 0)
    }
}

impl ProviderRegistry for SymbolProviderRegistry {
    fn ordered(&self, document: &dyn TextDocument) -> Vec<Rc<dyn DocumentSymbolProvider>> {
        let inner = self.inner.borrow();
        let mut scored: Vec<(u32, u64, &Rc<dyn DocumentSymbolProvider>)> = inner
            .entries
            .iter()
            .filter_map(|entry| {
                let score = entry.selector.score(document);
                (score > 0).then_some((score, entry.id, &entry.provider))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        scored
            .into_iter()
            .map(|(_, _, provider)| Rc::clone(provider))
            .collect()
    }
}

/// Handle returned by [`SymbolProviderRegistry::register`]
pub struct Registration {
    id: u64,
    registry: Weak<RefCell<RegistryInner>>,
}

impl Registration {
    /// Remove the provider from the registry. No-op if the registry is gone.
    pub fn unregister(self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().entries.retain(|entry| entry.id != self.id);
        }
    }
}
