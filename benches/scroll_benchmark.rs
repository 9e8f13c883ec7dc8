//! Scroll and repaint benchmarks for the viewport.
//!
//! A single-line move inside the window should cost two row repaints no
//! matter how large the source is; a move off the window costs one full list
//! repaint.
//!
//! Run with: cargo bench --bench scroll_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use pipeview::source::LineBuffer;
use pipeview::viewport::Viewport;
use ratatui::backend::TestBackend;

const WIDTH: u16 = 200;
const HEIGHT: u16 = 60;

/// Source sizes to benchmark against.
const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

fn make_lines(count: usize) -> LineBuffer {
    (0..count)
        .map(|i| format!("{:>8} compiling crate_{} v0.{}.{} (/src/crate_{})", i, i, i % 7, i % 13, i))
        .collect()
}

/// A drawn viewport with both bars, selection at `start`.
fn setup(lines: &LineBuffer, start: usize, pager: bool) -> Viewport<TestBackend> {
    let mut viewport = Viewport::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    viewport.set_top_text(Some("cargo build"));
    viewport.set_bottom_text(Some("status"));
    viewport.set_pager_mode(pager);
    viewport.on_source_count_changed(lines, true);
    viewport.set_selection(lines, start).unwrap();
    viewport.draw(lines).unwrap();
    viewport
}

/// Benchmark single-line moves that stay in the window (partial repaint).
fn benchmark_line_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_move");

    for count in SIZES {
        let lines = make_lines(count);
        group.bench_with_input(BenchmarkId::new("lines", count), &lines, |b, lines| {
            b.iter_batched(
                || setup(lines, count / 2, false),
                |mut viewport| {
                    viewport.move_selection_by(lines, 1);
                    viewport.draw(lines).unwrap();
                    black_box(viewport.repaints().list_rows)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark page moves in both window modes (full list repaint).
fn benchmark_page_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_move");

    for count in SIZES {
        let lines = make_lines(count);
        for pager in [false, true] {
            let mode = if pager { "pager" } else { "continuous" };
            group.bench_with_input(
                BenchmarkId::new(mode, count),
                &lines,
                |b, lines| {
                    b.iter_batched(
                        || setup(lines, count / 2, pager),
                        |mut viewport| {
                            let page = isize::try_from(viewport.list_height()).unwrap();
                            viewport.move_selection_by(lines, page);
                            viewport.draw(lines).unwrap();
                            black_box(viewport.repaints().list_full)
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
}

/// Benchmark jumping to an arbitrary line (centering).
fn benchmark_goto(c: &mut Criterion) {
    let mut group = c.benchmark_group("goto");

    for count in SIZES {
        let lines = make_lines(count);
        group.bench_with_input(BenchmarkId::new("lines", count), &lines, |b, lines| {
            b.iter_batched(
                || setup(lines, 0, false),
                |mut viewport| {
                    viewport.set_selection(lines, count * 3 / 4).unwrap();
                    viewport.draw(lines).unwrap();
                    black_box(viewport.selection())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark appending a batch of lines while following the tail.
fn benchmark_follow_append(c: &mut Criterion) {
    c.bench_function("follow_append_100", |b| {
        b.iter_batched(
            || {
                let lines = make_lines(10_000);
                let viewport = setup(&lines, 9_999, false);
                (viewport, lines)
            },
            |(mut viewport, mut lines)| {
                lines.extend((0..100).map(|i| format!("appended {}", i)));
                viewport.on_source_count_changed(&lines, false);
                viewport.set_selection(&lines, lines.lines().len() - 1).unwrap();
                viewport.draw(&lines).unwrap();
                black_box(viewport.selection())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    benchmark_line_move,
    benchmark_page_move,
    benchmark_goto,
    benchmark_follow_append
);
criterion_main!(benches);
