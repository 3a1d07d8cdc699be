//! Criterion benchmarks for fridge critical paths
//!
//! Benchmarks the operations run on every view of a shared link:
//! - Pixels: stream decode and canonical encode
//! - Share: arrangement encode and decode
//! - Compositor: placing magnets onto a full canvas
//! - Render: canvas to image

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fridge::compositor::composite_placements;
use fridge::geometry::{Layout, ScaleRange};
use fridge::models::{Magnet, Placement};
use fridge::palette::Palette;
use fridge::pixels::{decode, encode};
use fridge::render::render_canvas;
use fridge::share::{encode_share, parse_share};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Stream covering a `size` x `size` square from the origin
fn make_stream(size: u32) -> String {
    let mut stream = String::with_capacity((size * size * 6) as usize);
    for y in 0..size {
        for x in 0..size {
            stream.push_str(&format!("{:02x}{:02x}{:02x}", x, y, (x + y) % 8));
        }
    }
    stream
}

fn make_magnets(count: usize, size: u32) -> Vec<Magnet> {
    let pixels = make_stream(size);
    (0..count).map(|i| Magnet::new(format!("0x{:04x}", i), i.to_string(), pixels.clone())).collect()
}

fn make_placements(count: usize) -> Vec<Placement> {
    (0..count)
        .map(|i| Placement {
            magnet_index: i,
            x: (i * 37 % 256) as f64,
            y: (i * 91 % 256) as f64,
            scale: 0.25 + (i % 16) as f64 * 0.25,
        })
        .collect()
}

// =============================================================================
// Pixels
// =============================================================================

fn bench_pixels(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixels");

    for size in [16u32, 64, 256] {
        let stream = make_stream(size);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", size), &stream, |b, stream| {
            b.iter(|| decode(black_box(stream)))
        });
    }

    let canvas = decode(&make_stream(256));
    group.bench_function("encode_full_canvas", |b| b.iter(|| encode(black_box(&canvas))));

    group.finish();
}

// =============================================================================
// Share
// =============================================================================

fn bench_share(c: &mut Criterion) {
    let mut group = c.benchmark_group("share");
    let range = ScaleRange::default();

    for count in [1usize, 20, 200] {
        let placements = make_placements(count);
        let encoded = encode_share(&placements, &range).unwrap_or_default();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("encode", count), &placements, |b, p| {
            b.iter(|| encode_share(black_box(p), &range))
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &encoded, |b, text| {
            b.iter(|| parse_share(black_box(text), &range))
        });
    }

    group.finish();
}

// =============================================================================
// Compositor and render
// =============================================================================

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");
    let base = decode(&make_stream(256));
    let layout = Layout::default();

    for count in [1usize, 10, 50] {
        let magnets = make_magnets(count, 24);
        let placements = make_placements(count);
        group.bench_function(BenchmarkId::new("composite", count), |b| {
            b.iter(|| composite_placements(black_box(&base), &magnets, &placements, &layout))
        });
    }

    let palette = Palette::basepaint();
    group.bench_function("render_full_canvas", |b| b.iter(|| render_canvas(black_box(&base), &palette)));

    group.finish();
}

criterion_group!(benches, bench_pixels, bench_share, bench_composite);
criterion_main!(benches);
