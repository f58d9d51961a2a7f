//! Benchmarks for pivoting experiment tables into grids.
//!
//! Run:
//! - cargo bench --bench pivot_grid

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use winprob_report::data::{Column, Dataset, DuplicatePolicy, Observation, pivot};
use winprob_report::render::{ColorScale, HeatmapLayout};

const SIDES: [usize; 3] = [8, 32, 128];

fn build_dataset(side: usize) -> Dataset {
    let mut rows = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            // Leave a sparse diagonal of holes.
            if (i + 3 * j) % 17 == 0 {
                continue;
            }
            rows.push(Observation {
                r: Some(0.5 * (i + 1) as f64),
                l: Some(0.25 * (j + 1) as f64),
                n: None,
                win_probability: ((i * 31 + j * 7) % 100) as f64 / 100.0,
            });
        }
    }
    // Rows arrive in file order, not key order.
    rows.reverse();
    Dataset::from_rows("bench", &[Column::R, Column::L], rows).unwrap()
}

fn bench_pivot(c: &mut Criterion) {
    let mut group = c.benchmark_group("pivot");
    for &side in &SIDES {
        let dataset = build_dataset(side);
        group.bench_with_input(BenchmarkId::new("r_by_l", side), &dataset, |b, ds| {
            b.iter(|| {
                let grid = pivot(
                    black_box(ds),
                    Column::R,
                    Column::L,
                    Column::WinProbability,
                    DuplicatePolicy::Reject,
                )
                .unwrap();
                black_box(grid);
            });
        });
    }
    group.finish();
}

fn bench_heatmap_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap_layout");
    for &side in &SIDES {
        let grid = pivot(
            &build_dataset(side),
            Column::R,
            Column::L,
            Column::WinProbability,
            DuplicatePolicy::Reject,
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("yl_or_rd", side), &grid, |b, grid| {
            b.iter(|| {
                let layout = HeatmapLayout::from_grid(black_box(grid), ColorScale::YlOrRd).unwrap();
                black_box(layout);
            });
        });
    }
    group.finish();
}

criterion_group!(pivot_grid, bench_pivot, bench_heatmap_layout);
criterion_main!(pivot_grid);
