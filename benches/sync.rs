//! Benchmarks for the scroll engine hot paths.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports. Everything
//! here runs against in-memory pane fakes; the DOM never enters the picture,
//! so the numbers isolate the engine math from browser layout cost.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::cast_precision_loss
)]

use std::cell::{Cell, RefCell};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tripane::layout::ColumnLayout;
use tripane::sync::{resolve_row_heights, PaneSet, PaneSurface, RowSurface, SyncEngine};
use tripane::types::{ColumnSpec, FixedSide, ScrollPosition};

/// In-memory pane with fixed geometry and live scroll offsets.
struct BenchPane {
    top: Cell<f64>,
    left: Cell<f64>,
    scroll_height: f64,
    client_height: f64,
    scroll_width: f64,
    client_width: f64,
}

impl BenchPane {
    fn new(scroll_height: f64, client_height: f64, scroll_width: f64, client_width: f64) -> Self {
        Self {
            top: Cell::new(0.0),
            left: Cell::new(0.0),
            scroll_height,
            client_height,
            scroll_width,
            client_width,
        }
    }
}

impl PaneSurface for BenchPane {
    fn scroll_top(&self) -> f64 {
        self.top.get()
    }

    fn set_scroll_top(&self, top: f64) {
        self.top.set(top);
    }

    fn scroll_left(&self) -> f64 {
        self.left.get()
    }

    fn set_scroll_left(&self, left: f64) {
        self.left.set(left);
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn scroll_width(&self) -> f64 {
        self.scroll_width
    }

    fn client_width(&self) -> f64 {
        self.client_width
    }
}

/// Row surface backed by plain vectors, mirroring what the widget reads
/// from rendered rows.
struct BenchRows {
    naturals: Vec<f64>,
    pinned: RefCell<Vec<Option<f64>>>,
}

impl BenchRows {
    fn new(count: usize, base: f64) -> Self {
        // Vary heights so the per-row max never degenerates to a constant.
        let naturals = (0..count).map(|i| base + (i % 7) as f64 * 3.0).collect();
        Self {
            naturals,
            pinned: RefCell::new(vec![None; count]),
        }
    }
}

impl RowSurface for BenchRows {
    fn row_count(&self) -> usize {
        self.naturals.len()
    }

    fn clear_row_height(&self, row: usize) {
        if let Some(slot) = self.pinned.borrow_mut().get_mut(row) {
            *slot = None;
        }
    }

    fn natural_row_height(&self, row: usize) -> Option<f64> {
        self.naturals.get(row).copied()
    }

    fn pin_row_height(&self, row: usize, height: f64) {
        if let Some(slot) = self.pinned.borrow_mut().get_mut(row) {
            *slot = Some(height);
        }
    }
}

/// Main + both fixed panes + header, all with real overflow.
fn full_pane_set() -> PaneSet<BenchPane> {
    PaneSet {
        main: Some(BenchPane::new(20_000.0, 400.0, 3_000.0, 800.0)),
        left: Some(BenchPane::new(20_000.0, 400.0, 120.0, 120.0)),
        right: Some(BenchPane::new(20_000.0, 400.0, 120.0, 120.0)),
        header: Some(BenchPane::new(48.0, 48.0, 3_000.0, 800.0)),
    }
}

fn column_specs(count: usize) -> Vec<ColumnSpec> {
    (0..count)
        .map(|i| ColumnSpec {
            key: format!("col{i}"),
            width: (i % 3 != 0).then(|| 80.0 + (i % 5) as f64 * 20.0),
            min_width: 60.0,
            fixed: match i {
                0 | 1 => FixedSide::Left,
                i if i + 1 == count => FixedSide::Right,
                _ => FixedSide::None,
            },
        })
        .collect()
}

/// Benchmark a full four-pane sync with the target alternating, so every
/// iteration takes the write path rather than the idempotence skip.
fn bench_sync_moving(c: &mut Criterion) {
    let engine = SyncEngine::new(full_pane_set(), 5.0);
    engine.set_max_left(2_200.0);

    let mut flip = false;
    c.bench_function("sync_to_moving", |b| {
        b.iter(|| {
            flip = !flip;
            let target = if flip {
                ScrollPosition::new(9_000.0, 1_500.0)
            } else {
                ScrollPosition::new(100.0, 40.0)
            };
            engine.sync_to(black_box(target))
        })
    });
}

/// Benchmark re-syncing to the position the panes already hold; this is the
/// path every echoed scroll event takes.
fn bench_sync_idempotent(c: &mut Criterion) {
    let engine = SyncEngine::new(full_pane_set(), 5.0);
    engine.set_max_left(2_200.0);
    engine.sync_to(ScrollPosition::new(5_000.0, 1_000.0));

    c.bench_function("sync_to_idempotent", |b| {
        b.iter(|| engine.sync_to(black_box(ScrollPosition::new(5_000.0, 1_000.0))))
    });
}

/// Benchmark the boundary read that precedes every clamp.
fn bench_boundary_reads(c: &mut Criterion) {
    let engine = SyncEngine::new(full_pane_set(), 5.0);
    engine.set_max_left(2_200.0);

    c.bench_function("bounds_snapshot", |b| {
        b.iter(|| black_box(engine.bounds()))
    });
}

/// Benchmark column width resolution across column counts.
fn bench_column_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_layout");

    for count in [10usize, 100, 1_000] {
        let specs = column_specs(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("resolve", count), &specs, |b, specs| {
            b.iter(|| ColumnLayout::resolve(black_box(specs), black_box(1_200.0)))
        });
    }

    group.finish();
}

/// Benchmark the offset lookup used by tap hit-testing and
/// `scroll_to_column`.
fn bench_column_lookup(c: &mut Criterion) {
    let specs = column_specs(1_000);
    let layout = ColumnLayout::resolve(&specs, 1_200.0);
    let total = layout.total_width();

    let mut x = 0.0;
    c.bench_function("column_at_sweep", |b| {
        b.iter(|| {
            x += 97.0;
            if x >= total {
                x -= total;
            }
            layout.column_at(black_box(x))
        })
    });
}

/// Benchmark cross-pane row height resolution across row counts.
fn bench_row_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_measurement");

    for count in [100usize, 1_000] {
        let main = BenchRows::new(count, 44.0);
        let left = BenchRows::new(count, 41.0);
        let right = BenchRows::new(count, 39.0);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("resolve_and_pin", count),
            &count,
            |b, _| b.iter(|| resolve_row_heights(black_box(&[&main, &left, &right]), 44.0)),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sync_moving,
    bench_sync_idempotent,
    bench_boundary_reads,
    bench_column_resolve,
    bench_column_lookup,
    bench_row_resolve,
);

criterion_main!(benches);
