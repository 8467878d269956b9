//! Benchmarks for outline building and queries
//!
//! Run with: cargo bench outline

use std::rc::Rc;

use futures::executor::LocalPool;
use futures::future::{self, FutureExt, LocalBoxFuture};
use tokio_util::sync::CancellationToken;

use outline_model::{
    DocumentSymbol, DocumentSymbolProvider, OutlineModel, Position, ProviderResult, Range,
    SourceDocument, SymbolKind, TextDocument, TreeSitterSymbolProvider,
};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// `count` structs of ten lines, each with three methods
struct SyntheticProvider {
    count: usize,
}

impl DocumentSymbolProvider for SyntheticProvider {
    fn provide_document_symbols(
        &self,
        _document: Rc<dyn TextDocument>,
        _token: CancellationToken,
    ) -> LocalBoxFuture<'static, ProviderResult> {
        let symbols = (0..self.count)
            .map(|i| {
                let start = i * 10;
                let methods = (0..3)
                    .map(|m| {
                        DocumentSymbol::new(
                            format!("handle_event_{}", m),
                            SymbolKind::Method,
                            Range::lines(start + 1 + m * 3, start + 3 + m * 3),
                        )
                    })
                    .collect();
                DocumentSymbol::new(
                    format!("Widget{}", i),
                    SymbolKind::Struct,
                    Range::lines(start, start + 9),
                )
                .with_children(methods)
            })
            .collect();
        future::ready(Ok(Some(symbols))).boxed_local()
    }
}

fn settled_model(count: usize) -> (LocalPool, OutlineModel) {
    let mut pool = LocalPool::new();
    let document: Rc<dyn TextDocument> =
        Rc::new(SourceDocument::new("file:///bench.rs", "rust", ""));
    let providers: Vec<Rc<dyn DocumentSymbolProvider>> = vec![Rc::new(SyntheticProvider { count })];
    let model = OutlineModel::new(document, Rc::new(providers), pool.spawner());
    pool.run_until_stalled();
    (pool, model)
}

// ============================================================================
// Fetch cycle
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn build_outline(bencher: divan::Bencher, count: usize) {
    bencher.bench_local(|| {
        let (_pool, model) = settled_model(count);
        divan::black_box(model.tree().element_count());
    });
}

#[divan::bench(args = [100, 1_000])]
fn tree_sitter_outline(bencher: divan::Bencher, count: usize) {
    let source: String = (0..count)
        .map(|i| {
            format!(
                "struct Widget{i} {{ id: u32 }}\n\n\
                 impl Widget{i} {{\n    fn render(&self) {{}}\n}}\n\n"
            )
        })
        .collect();
    let document: Rc<dyn TextDocument> =
        Rc::new(SourceDocument::new("file:///bench.rs", "rust", source));
    let providers: Vec<Rc<dyn DocumentSymbolProvider>> =
        vec![Rc::new(TreeSitterSymbolProvider::new())];
    let registry = Rc::new(providers);

    bencher.bench_local(|| {
        let mut pool = LocalPool::new();
        let model = OutlineModel::new(Rc::clone(&document), registry.clone(), pool.spawner());
        pool.run_until_stalled();
        divan::black_box(model.tree().element_count());
    });
}

// ============================================================================
// Queries
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn update_matches(bencher: divan::Bencher, count: usize) {
    let (_pool, model) = settled_model(count);
    bencher.bench_local(|| divan::black_box(model.update_matches("wdgevt")));
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn enclosing_position(bencher: divan::Bencher, count: usize) {
    let (_pool, model) = settled_model(count);
    let position = Position::new(count * 10 - 3, 4);
    bencher.bench_local(|| divan::black_box(model.get_item_enclosing_position(position)));
}
