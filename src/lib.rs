//! Outline model - searchable symbol tree for a single document
//!
//! This crate aggregates document symbols from any number of asynchronous
//! symbol providers into one tree with stable ids, and answers fuzzy-search
//! and enclosing-position queries against it.
//!
//! ```ignore
//! let mut pool = futures::executor::LocalPool::new();
//! let registry = SymbolProviderRegistry::new();
//! registry.register(DocumentSelector::language("rust"), Rc::new(TreeSitterSymbolProvider::new()));
//!
//! let model = OutlineModel::new(document, Rc::new(registry), pool.spawner());
//! pool.run_until_stalled();
//! let best = model.update_matches("parse");
//! ```

pub mod config;
pub mod config_paths;
pub mod document;
pub mod fuzzy;
pub mod logging;
pub mod markers;
pub mod outline;
pub mod provider;
pub mod symbol;

// Re-export commonly used types
pub use config::OutlineConfig;
pub use document::{Position, Range, SourceDocument, TextDocument};
pub use fuzzy::{FuzzyScore, Scorer};
pub use outline::{OutlineEvent, OutlineModel, OutlineTree};
pub use provider::{
    DocumentSelector, DocumentSymbolProvider, ProviderRegistry, ProviderResult,
    SymbolProviderRegistry, TreeSitterSymbolProvider,
};
pub use symbol::{DocumentSymbol, SymbolKind};
