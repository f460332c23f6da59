//! # Tessellation Benchmark
//!
//! Measures the hot emitters a typical frame leans on:
//! 1. Filled rects (fast path, one quad each)
//! 2. Anti-aliased rounded rects (path + convex fringe)
//! 3. Thick anti-aliased polylines
//! 4. Text through the placeholder box font

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera_core::color::pack_rgba;
use tessera_core::Vec2;
use tessera_draw::{Corners, DrawList, DrawListSharedData, FontAtlas, FontConfig};

const SHAPE_COUNT: usize = 10_000;

fn shared() -> Arc<DrawListSharedData> {
    Arc::new(DrawListSharedData::new())
}

#[allow(clippy::cast_precision_loss)]
fn grid_pos(i: usize) -> Vec2 {
    Vec2::new((i % 100) as f32 * 12.0, (i / 100) as f32 * 12.0)
}

fn bench_rect_filled(c: &mut Criterion) {
    let shared = shared();
    let mut list = DrawList::new(Arc::clone(&shared));
    let col = pack_rgba(40, 80, 160, 255);

    c.bench_function("rect_filled_10k", |b| {
        b.iter(|| {
            list.reset_for_new_frame(Arc::clone(&shared));
            for i in 0..SHAPE_COUNT {
                let p = grid_pos(i);
                list.add_rect_filled(p, p + Vec2::splat(10.0), col, 0.0, Corners::ALL);
            }
            black_box(list.vtx_buffer.len())
        });
    });
}

fn bench_rounded_rect_aa(c: &mut Criterion) {
    let shared = shared();
    let mut list = DrawList::new(Arc::clone(&shared));
    let col = pack_rgba(200, 200, 200, 255);

    c.bench_function("rounded_rect_aa_10k", |b| {
        b.iter(|| {
            list.reset_for_new_frame(Arc::clone(&shared));
            for i in 0..SHAPE_COUNT {
                let p = grid_pos(i);
                list.add_rect_filled(p, p + Vec2::splat(10.0), col, 3.0, Corners::ALL);
            }
            black_box(list.vtx_buffer.len())
        });
    });
}

fn bench_thick_polyline(c: &mut Criterion) {
    let shared = shared();
    let mut list = DrawList::new(Arc::clone(&shared));
    let col = pack_rgba(255, 128, 0, 255);
    #[allow(clippy::cast_precision_loss)]
    let points: Vec<Vec2> = (0..1_000)
        .map(|i| Vec2::new(i as f32 * 2.0, ((i as f32) * 0.1).sin() * 50.0 + 100.0))
        .collect();

    c.bench_function("polyline_aa_thick_1k_points", |b| {
        b.iter(|| {
            list.reset_for_new_frame(Arc::clone(&shared));
            list.add_polyline(&points, col, false, 3.0);
            black_box(list.idx_buffer.len())
        });
    });
}

fn bench_text(c: &mut Criterion) {
    let shared = shared();
    let mut atlas = FontAtlas::new();
    let font_idx = atlas.add_font(FontConfig::box_glyphs(13.0));
    atlas.build().expect("box font always packs");
    let font = atlas.font(font_idx).expect("font was built");
    let mut list = DrawList::new(Arc::clone(&shared));
    let line = "The quick brown fox jumps over the lazy dog 0123456789";

    c.bench_function("text_1k_lines", |b| {
        b.iter(|| {
            list.reset_for_new_frame(Arc::clone(&shared));
            for i in 0..1_000 {
                #[allow(clippy::cast_precision_loss)]
                let pos = Vec2::new(0.0, i as f32 * 13.0);
                list.add_text(font, 13.0, pos, 0xFFFF_FFFF, line);
            }
            black_box(list.vtx_buffer.len())
        });
    });
}

criterion_group!(
    benches,
    bench_rect_filled,
    bench_rounded_rect_aa,
    bench_thick_polyline,
    bench_text,
);
criterion_main!(benches);
