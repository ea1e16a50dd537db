//! Benchmarks for column blits at aligned and unaligned offsets.
//!
//! Run with: cargo bench -p oledfx-render --bench blit_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oledfx_render::{BitOrder, FrameBuffer};
use std::hint::black_box;

fn bench_blit(c: &mut Criterion) {
    let mut group = c.benchmark_group("blit/columns");
    let mut fb = FrameBuffer::new(128, 64).unwrap();

    // 10x16 glyph, 2 bytes per column.
    let glyph: Vec<u8> = (0..20u8).map(|i| i.wrapping_mul(37)).collect();
    group.throughput(Throughput::Bytes(glyph.len() as u64));

    for y in [0, 3, -5] {
        group.bench_with_input(BenchmarkId::new("glyph", y), &y, |b, &y| {
            b.iter(|| fb.blit_columns(black_box(40), y, 10, 16, &glyph))
        });
    }

    let image = vec![0xA5u8; 1024];
    group.throughput(Throughput::Bytes(image.len() as u64));
    group.bench_function("fast_image_full_screen", |b| {
        b.iter(|| fb.draw_fast_image(0, black_box(0), 128, 64, &image))
    });

    group.finish();
}

fn bench_row_major(c: &mut Criterion) {
    let mut fb = FrameBuffer::new(128, 64).unwrap();
    let xbm = vec![0x5Au8; 16 * 64];

    c.bench_function("blit/xbm_full_screen", |b| {
        b.iter(|| fb.draw_row_major(0, 0, 128, 64, black_box(&xbm), BitOrder::LsbFirst))
    });
}

criterion_group!(benches, bench_blit, bench_row_major);
criterion_main!(benches);
