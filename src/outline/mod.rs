//! Document outline
//!
//! A tree of the symbols in one document, merged from every registered
//! symbol provider. Supports fuzzy filtering (ancestors of matches stay
//! visible), enclosing-symbol lookup for a position, and lookup by id.
//!
//! ## Shape
//!
//! ```text
//! root
//! ├── rootprovider_0            (one group per provider)
//! │   ├── rootprovider_0Foo
//! │   └── rootprovider_0Bar
//! │       └── rootprovider_0BarBaz
//! └── rootprovider_1
//! ```
//!
//! When only one provider contributed, its group is hidden and its
//! elements hang directly off the root.

mod group;
mod model;
mod snapshot;
mod tree;

pub use model::{OutlineEvent, OutlineModel};
pub use snapshot::{NodeSnapshot, OutlineSnapshot};
pub use tree::{NodeIdx, NodeKind, OutlineElement, OutlineGroup, OutlineNode, OutlineTree, ROOT_ID};
