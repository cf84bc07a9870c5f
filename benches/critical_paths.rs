//! Criterion benchmarks for SpriteStudio critical paths
//!
//! Benchmarks the operations a preview runs per tick or per sheet:
//! - Grid: frame index to cell and background geometry
//! - Style: full render style for a frame
//! - Sheet: splitting a sheet into frames and drawing the grid overlay

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use spritestudio::grid::{cell_position, render_coordinates};
use spritestudio::models::{CompositeImage, GridShape};
use spritestudio::sheet::{draw_grid_overlay, split_sheet};
use spritestudio::style::compute_render_style;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a sheet of `shape` cells, each `cell` pixels square
fn make_sheet(shape: GridShape, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(shape.cols * cell, shape.rows * cell, |x, y| {
        let index = (y / cell) * shape.cols + x / cell;
        Rgba([(index * 17) as u8, (x % 256) as u8, (y % 256) as u8, 255])
    })
}

const SHAPES: [(u32, u32); 3] = [(2, 4), (4, 4), (8, 12)];

// =============================================================================
// Grid Benchmarks
// =============================================================================

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");

    for (rows, cols) in SHAPES {
        let shape = GridShape::new(rows, cols);
        let total = shape.total_frames();
        group.throughput(Throughput::Elements(u64::from(total)));

        group.bench_with_input(BenchmarkId::new("cell_position", shape), &shape, |b, shape| {
            b.iter(|| {
                for frame in 0..total {
                    let _ = black_box(cell_position(black_box(frame), *shape));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("render_coordinates", shape), &shape, |b, shape| {
            b.iter(|| {
                for frame in 0..total {
                    let _ = black_box(render_coordinates(black_box(frame), *shape));
                }
            })
        });
    }

    group.finish();
}

// =============================================================================
// Style Benchmarks
// =============================================================================

fn bench_style(c: &mut Criterion) {
    let mut group = c.benchmark_group("style");
    let shape = GridShape::new(2, 4);
    let path = CompositeImage::from("sprites/knight_walk.png");
    let data_uri = CompositeImage::from(format!("data:image/png;base64,{}", "A".repeat(64 * 1024)));

    group.bench_function("compute_render_style_path", |b| {
        b.iter(|| compute_render_style(black_box(5), shape, &path))
    });

    group.bench_function("compute_render_style_data_uri", |b| {
        b.iter(|| compute_render_style(black_box(5), shape, &data_uri))
    });

    group.bench_function("to_css", |b| {
        let style = compute_render_style(5, shape, &path).unwrap();
        b.iter(|| black_box(&style).to_css())
    });

    group.finish();
}

// =============================================================================
// Sheet Benchmarks
// =============================================================================

fn bench_sheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet");

    for (rows, cols) in SHAPES {
        let shape = GridShape::new(rows, cols);
        let sheet = make_sheet(shape, 64);
        group.throughput(Throughput::Elements(u64::from(sheet.width() * sheet.height())));

        group.bench_with_input(BenchmarkId::new("split", shape), &sheet, |b, sheet| {
            b.iter(|| split_sheet(black_box(sheet), shape))
        });

        group.bench_with_input(BenchmarkId::new("overlay", shape), &sheet, |b, sheet| {
            b.iter(|| draw_grid_overlay(black_box(sheet), shape, Rgba([99, 102, 241, 200])))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid, bench_style, bench_sheet);
criterion_main!(benches);
