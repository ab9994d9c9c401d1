//! Benchmarks for geometry, hit testing and frame drawing.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlmatrix::layout::AxisModel;
use xlmatrix::scrollbar::ScrollAction;
use xlmatrix::{Axis, Matrix, MatrixConfig, MergedRange, RecordingCanvas};

/// Matrix with every cell filled and a sprinkling of merges.
fn filled(num_lin: usize, num_col: usize) -> Matrix {
    let mut m = Matrix::new(MatrixConfig {
        num_lin,
        num_col,
        ..MatrixConfig::default()
    });
    for lin in 1..=num_lin.min(200) {
        for col in 1..=num_col {
            m.set_value(lin, col, Some(&format!("{lin}.{col}")))
                .expect("Failed to set value");
        }
    }
    for lin in (2..num_lin.min(200)).step_by(10) {
        m.merge(MergedRange::new(lin, 1, lin, 2))
            .expect("Failed to merge");
    }
    m.resize(1280, 800);
    m
}

/// Visible window recomputation across axis lengths
fn bench_visible_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_window");

    for count in [100usize, 10_000, 100_000] {
        let mut lines = AxisModel::new(Axis::Lin, count + 1, 1, 20, 20);
        lines.recompute_visible_window(800);
        lines.set_scroll_pos(i32::try_from(count * 10).unwrap_or(i32::MAX));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("recompute", count), &count, |b, _| {
            b.iter(|| lines.recompute_visible_window(black_box(800)));
        });
    }

    group.finish();
}

/// Hit testing a point in a large matrix
fn bench_cell_at(c: &mut Criterion) {
    let mut m = filled(10_000, 50);
    m.scroll(Axis::Lin, ScrollAction::DragTo(100_000));

    c.bench_function("cell_at", |b| {
        b.iter(|| m.cell_at(black_box(640), black_box(400)));
    });
}

/// Full frame into the recording canvas at different column counts
fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_frame");

    for num_col in [10usize, 50] {
        let mut m = filled(10_000, num_col);
        let mut canvas = RecordingCanvas::new(1280, 800);
        group.bench_with_input(BenchmarkId::new("cols", num_col), &num_col, |b, _| {
            b.iter(|| m.draw(black_box(&mut canvas)));
        });
    }

    group.finish();
}

/// Scrolling a page at a time through a long matrix
fn bench_scroll_pages(c: &mut Criterion) {
    let mut m = filled(10_000, 10);

    c.bench_function("scroll_page", |b| {
        b.iter(|| {
            m.scroll(Axis::Lin, black_box(ScrollAction::PageInc));
            if m.axis(Axis::Lin).last() + 1 >= m.axis(Axis::Lin).count() {
                m.scroll(Axis::Lin, ScrollAction::Begin);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_visible_window,
    bench_cell_at,
    bench_draw,
    bench_scroll_pages,
);

criterion_main!(benches);
