//! Buffer invariants and batching across mixed emitter sequences.

use std::sync::Arc;

use tessera_core::color::{pack_rgba, COL32_WHITE};
use tessera_core::{Rect, Vec2};
use tessera_draw::{Corners, DrawData, DrawList, DrawListFlags, DrawListSharedData, FontAtlas, FontConfig, TextureId};

fn list() -> DrawList {
    DrawList::with_owner(Arc::new(DrawListSharedData::new()), "test")
}

fn emit_everything(list: &mut DrawList) {
    let col = pack_rgba(90, 160, 220, 255);
    list.add_line(Vec2::ZERO, Vec2::new(30.0, 12.0), col, 1.0);
    list.add_line(Vec2::ZERO, Vec2::new(30.0, 12.0), col, 4.0);
    list.add_rect(Vec2::ZERO, Vec2::new(20.0, 20.0), col, 0.0, Corners::ALL, 1.0);
    list.add_rect(Vec2::ZERO, Vec2::new(20.0, 20.0), col, 5.0, Corners::TOP, 2.0);
    list.add_rect_filled(Vec2::ZERO, Vec2::new(20.0, 20.0), col, 5.0, Corners::ALL);
    list.add_triangle_filled(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(5.0, 8.0), col);
    list.add_quad(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0), col, 1.5);
    list.add_circle(Vec2::new(50.0, 50.0), 10.0, col, 16, 1.0);
    list.add_circle_filled(Vec2::new(50.0, 50.0), 10.0, col, 16);
    list.add_bezier_curve(
        Vec2::ZERO,
        Vec2::new(40.0, 0.0),
        Vec2::new(0.0, 40.0),
        Vec2::new(40.0, 40.0),
        col,
        2.0,
        0,
    );
    list.add_image(TextureId(9), Vec2::ZERO, Vec2::splat(8.0), Vec2::ZERO, Vec2::ONE, COL32_WHITE);
}

#[test]
fn test_invariants_hold_after_every_emitter_with_aa() {
    let mut list = list();
    emit_everything(&mut list);
    assert!(list.invariants_hold());
    assert_eq!(list.total_elem_count(), list.idx_buffer.len());
}

#[test]
fn test_invariants_hold_after_every_emitter_without_aa() {
    let mut list = list();
    list.flags = DrawListFlags::empty();
    emit_everything(&mut list);
    assert!(list.invariants_hold());
}

#[test]
fn test_every_index_references_a_vertex() {
    let mut list = list();
    emit_everything(&mut list);
    let vtx_count = u32::try_from(list.vtx_buffer.len()).unwrap();
    assert!(list.idx_buffer.iter().all(|&i| i < vtx_count));
}

#[test]
fn test_nested_clip_rects_batch_per_region() {
    let mut list = list();
    let col = pack_rgba(255, 255, 255, 255);
    list.push_clip_rect(Vec2::ZERO, Vec2::splat(100.0), false);
    list.add_rect_filled(Vec2::ZERO, Vec2::ONE, col, 0.0, Corners::ALL);
    list.push_clip_rect(Vec2::splat(10.0), Vec2::splat(200.0), true);
    list.add_rect_filled(Vec2::ZERO, Vec2::ONE, col, 0.0, Corners::ALL);
    list.pop_clip_rect();
    list.add_rect_filled(Vec2::ZERO, Vec2::ONE, col, 0.0, Corners::ALL);
    list.pop_clip_rect();
    list.pop_unused_draw_cmd();

    let clips: Vec<Rect> = list.cmd_buffer.iter().map(|c| c.clip_rect).collect();
    assert_eq!(
        clips,
        vec![
            Rect::from_coords(0.0, 0.0, 100.0, 100.0),
            Rect::from_coords(10.0, 10.0, 100.0, 100.0),
            Rect::from_coords(0.0, 0.0, 100.0, 100.0),
        ]
    );
}

#[test]
fn test_channel_round_trip_preserves_counts() {
    let mut list = list();
    let col = pack_rgba(255, 0, 0, 255);
    list.channels_split(3);
    for ch in [2, 0, 1, 2, 0] {
        list.channels_set_current(ch);
        list.add_rect_filled(Vec2::ZERO, Vec2::ONE, col, 0.0, Corners::ALL);
    }
    list.channels_merge();

    assert_eq!(list.vtx_buffer.len(), 20);
    assert_eq!(list.idx_buffer.len(), 30);
    assert!(list.invariants_hold());
}

#[test]
fn test_text_and_shapes_share_draw_data() {
    let mut atlas = FontAtlas::new();
    let font_idx = atlas.add_font(FontConfig::box_glyphs(13.0));
    atlas.build().unwrap();
    atlas.set_texture_id(TextureId(1));

    let mut shared = DrawListSharedData::new();
    shared.tex_uv_white_pixel = atlas.tex_uv_white_pixel();
    let mut list = DrawList::new(Arc::new(shared));
    list.push_texture_id(TextureId(1));
    list.add_rect_filled(Vec2::ZERO, Vec2::new(100.0, 20.0), pack_rgba(30, 30, 30, 255), 0.0, Corners::ALL);
    list.add_text(atlas.font(font_idx).unwrap(), 13.0, Vec2::new(4.0, 4.0), COL32_WHITE, "OK");
    list.pop_texture_id();
    list.pop_unused_draw_cmd();

    // Solid fill and glyphs use the same texture, so they batch.
    assert_eq!(list.cmd_buffer.len(), 1);

    let mut data = DrawData::new(Vec2::ZERO, Vec2::new(320.0, 240.0), Vec2::ONE);
    data.add_list(&list);
    data.valid = true;
    assert_eq!(data.total_idx_count, 18);
}
