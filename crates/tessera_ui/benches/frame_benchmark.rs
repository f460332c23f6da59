//! # Frame Benchmark
//!
//! Full `new_frame` → widgets → `render` cycles:
//! 1. One window of buttons (item layout + hover tests)
//! 2. Many small windows (begin/end, sorting, draw data assembly)
//! 3. Four-column table (channel split and merge)

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera_core::Vec2;
use tessera_ui::{ColumnsFlags, Cond, Context, IoConfig, Style, WindowFlags};

fn context() -> Context {
    let mut ctx = Context::new(IoConfig::default(), Style::default()).unwrap();
    ctx.input_mut().display_size = Vec2::new(1920.0, 1080.0);
    ctx.input_mut().delta_time = 1.0 / 60.0;
    ctx.input_mut().mouse_pos = Vec2::new(200.0, 200.0);
    ctx
}

fn bench_buttons(c: &mut Criterion) {
    let mut ctx = context();
    let labels: Vec<String> = (0..500).map(|i| format!("Button {i}")).collect();

    c.bench_function("frame_500_buttons", |b| {
        b.iter(|| {
            ctx.new_frame();
            ctx.set_next_window_size(Vec2::new(600.0, 900.0), Cond::FIRST_USE_EVER);
            ctx.begin("Buttons", WindowFlags::empty());
            for label in &labels {
                black_box(ctx.button(label, Vec2::ZERO));
            }
            ctx.end();
            black_box(ctx.render().total_vtx_count);
        });
    });
}

fn bench_windows(c: &mut Criterion) {
    let mut ctx = context();
    let names: Vec<String> = (0..64).map(|i| format!("Window {i}")).collect();

    c.bench_function("frame_64_windows", |b| {
        b.iter(|| {
            ctx.new_frame();
            for (i, name) in names.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let offset = (i % 16) as f32 * 40.0;
                ctx.set_next_window_pos(Vec2::splat(offset), Cond::FIRST_USE_EVER, Vec2::ZERO);
                ctx.begin(name, WindowFlags::empty());
                ctx.text_unformatted("contents");
                ctx.end();
            }
            black_box(ctx.render().cmd_lists_count());
        });
    });
}

fn bench_columns(c: &mut Criterion) {
    let mut ctx = context();

    c.bench_function("frame_columns_4x100", |b| {
        b.iter(|| {
            ctx.new_frame();
            ctx.set_next_window_size(Vec2::new(800.0, 900.0), Cond::FIRST_USE_EVER);
            ctx.begin("Table", WindowFlags::empty());
            ctx.begin_columns("cols", 4, ColumnsFlags::empty());
            for row in 0..100 {
                for col in 0..4 {
                    ctx.text_unformatted(if (row + col) % 2 == 0 { "even" } else { "odd" });
                    ctx.next_column();
                }
            }
            ctx.end_columns();
            ctx.end();
            black_box(ctx.render().total_idx_count);
        });
    });
}

criterion_group!(benches, bench_buttons, bench_windows, bench_columns);
criterion_main!(benches);
