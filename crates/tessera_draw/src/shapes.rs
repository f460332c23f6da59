//! High-level shape emitters built on paths and primitives.

use std::f32::consts::PI;

use tessera_core::color::PackedColor;
use tessera_core::{Rect, Vec2};

use crate::font::Font;
use crate::list::{Corners, DrawList};
use crate::vertex::TextureId;

impl DrawList {
    /// Line segment. Endpoints are offset by half a pixel so 1px lines land
    /// on pixel centers.
    pub fn add_line(&mut self, a: Vec2, b: Vec2, col: PackedColor, thickness: f32) {
        if Self::skip_color(col) {
            return;
        }
        self.path_line_to(a + Vec2::splat(0.5));
        self.path_line_to(b + Vec2::splat(0.5));
        self.path_stroke(col, false, thickness);
    }

    /// Rectangle outline. `a` is the upper-left corner, `b` the lower-right.
    pub fn add_rect(&mut self, a: Vec2, b: Vec2, col: PackedColor, rounding: f32, corners: Corners, thickness: f32) {
        if Self::skip_color(col) {
            return;
        }
        self.path_rect(a + Vec2::splat(0.5), b - Vec2::splat(0.5), rounding, corners);
        self.path_stroke(col, true, thickness);
    }

    /// Filled rectangle. Square corners take the 6-index/4-vertex fast path.
    pub fn add_rect_filled(&mut self, a: Vec2, b: Vec2, col: PackedColor, rounding: f32, corners: Corners) {
        if Self::skip_color(col) {
            return;
        }
        if rounding > 0.0 && !corners.is_empty() {
            self.path_rect(a, b, rounding, corners);
            self.path_fill_convex(col);
        } else {
            self.prim_reserve(6, 4);
            self.prim_rect(a, b, col);
        }
    }

    /// Filled rectangle with a color per corner.
    pub fn add_rect_filled_multi_color(
        &mut self,
        a: Vec2,
        c: Vec2,
        col_upr_left: PackedColor,
        col_upr_right: PackedColor,
        col_bot_right: PackedColor,
        col_bot_left: PackedColor,
    ) {
        let all = col_upr_left | col_upr_right | col_bot_right | col_bot_left;
        if Self::skip_color(all) {
            return;
        }
        let uv = self.shared.tex_uv_white_pixel;
        self.prim_reserve(6, 4);
        let idx = self.vtx_current_idx;
        self.write_tri(idx, idx + 1, idx + 2);
        self.write_tri(idx, idx + 2, idx + 3);
        self.write_vtx(a, uv, col_upr_left);
        self.write_vtx(Vec2::new(c.x, a.y), uv, col_upr_right);
        self.write_vtx(c, uv, col_bot_right);
        self.write_vtx(Vec2::new(a.x, c.y), uv, col_bot_left);
        self.vtx_current_idx += 4;
    }

    /// Quadrilateral outline.
    pub fn add_quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, col: PackedColor, thickness: f32) {
        if Self::skip_color(col) {
            return;
        }
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_line_to(d);
        self.path_stroke(col, true, thickness);
    }

    /// Filled convex quadrilateral.
    pub fn add_quad_filled(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, col: PackedColor) {
        if Self::skip_color(col) {
            return;
        }
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_line_to(d);
        self.path_fill_convex(col);
    }

    /// Triangle outline.
    pub fn add_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, col: PackedColor, thickness: f32) {
        if Self::skip_color(col) {
            return;
        }
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_stroke(col, true, thickness);
    }

    /// Filled triangle.
    pub fn add_triangle_filled(&mut self, a: Vec2, b: Vec2, c: Vec2, col: PackedColor) {
        if Self::skip_color(col) {
            return;
        }
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_fill_convex(col);
    }

    /// Circle outline approximated by `num_segments` edges.
    pub fn add_circle(&mut self, centre: Vec2, radius: f32, col: PackedColor, num_segments: u32, thickness: f32) {
        if Self::skip_color(col) || num_segments < 3 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let a_max = PI * 2.0 * (num_segments - 1) as f32 / num_segments as f32;
        self.path_arc_to(centre, radius - 0.5, 0.0, a_max, num_segments - 1);
        self.path_stroke(col, true, thickness);
    }

    /// Filled circle approximated by `num_segments` edges.
    pub fn add_circle_filled(&mut self, centre: Vec2, radius: f32, col: PackedColor, num_segments: u32) {
        if Self::skip_color(col) || num_segments < 3 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let a_max = PI * 2.0 * (num_segments - 1) as f32 / num_segments as f32;
        self.path_arc_to(centre, radius, 0.0, a_max, num_segments - 1);
        self.path_fill_convex(col);
    }

    /// Cubic bezier stroke from `pos0` to `pos1` with control points `cp0`
    /// and `cp1`. `num_segments == 0` selects adaptive tessellation.
    #[allow(clippy::too_many_arguments)]
    pub fn add_bezier_curve(
        &mut self,
        pos0: Vec2,
        cp0: Vec2,
        cp1: Vec2,
        pos1: Vec2,
        col: PackedColor,
        thickness: f32,
        num_segments: u32,
    ) {
        if Self::skip_color(col) {
            return;
        }
        self.path_line_to(pos0);
        self.path_bezier_curve_to(cp0, cp1, pos1, num_segments);
        self.path_stroke(col, false, thickness);
    }

    /// Textured rectangle.
    pub fn add_image(&mut self, texture_id: TextureId, a: Vec2, b: Vec2, uv_a: Vec2, uv_b: Vec2, col: PackedColor) {
        if Self::skip_color(col) {
            return;
        }
        let push = texture_id != self.current_texture_id();
        if push {
            self.push_texture_id(texture_id);
        }
        self.prim_reserve(6, 4);
        self.prim_rect_uv(a, b, uv_a, uv_b, col);
        if push {
            self.pop_texture_id();
        }
    }

    /// Draws `text` with its top-left at `pos`. Lines break on `'\n'`;
    /// glyphs entirely outside the current clip rect are skipped.
    pub fn add_text(&mut self, font: &Font, font_size: f32, pos: Vec2, col: PackedColor, text: &str) {
        if Self::skip_color(col) || text.is_empty() {
            return;
        }
        let clip = self.current_clip_rect();
        self.add_text_clipped(font, font_size, pos, col, text, &clip);
    }

    /// Same as [`Self::add_text`] with an explicit CPU-side clip rectangle.
    pub fn add_text_clipped(
        &mut self,
        font: &Font,
        font_size: f32,
        pos: Vec2,
        col: PackedColor,
        text: &str,
        clip_rect: &Rect,
    ) {
        if Self::skip_color(col) || text.is_empty() {
            return;
        }
        let push = font.texture_id() != self.current_texture_id();
        if push {
            self.push_texture_id(font.texture_id());
        }
        font.render_text(self, font_size, pos.floor(), col, clip_rect, text);
        if push {
            self.pop_texture_id();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_core::color::{self, pack_rgba};

    use super::*;
    use crate::list::DrawListFlags;
    use crate::shared::DrawListSharedData;

    fn list() -> DrawList {
        DrawList::new(Arc::new(DrawListSharedData::new()))
    }

    #[test]
    fn test_two_rects_same_state_batch_into_one_command() {
        let mut list = list();
        let col = pack_rgba(200, 10, 10, 255);
        list.add_rect_filled(Vec2::ZERO, Vec2::new(10.0, 10.0), col, 0.0, Corners::ALL);
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), col, 0.0, Corners::ALL);

        assert_eq!(list.cmd_buffer.len(), 1);
        assert_eq!(list.cmd_buffer[0].elem_count, 12);
    }

    #[test]
    fn test_clip_change_between_rects_makes_two_commands() {
        let mut list = list();
        let col = pack_rgba(200, 10, 10, 255);
        list.add_rect_filled(Vec2::ZERO, Vec2::new(10.0, 10.0), col, 0.0, Corners::ALL);
        list.push_clip_rect(Vec2::ZERO, Vec2::new(100.0, 100.0), false);
        list.add_rect_filled(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), col, 0.0, Corners::ALL);
        list.pop_clip_rect();
        list.pop_unused_draw_cmd();

        assert_eq!(list.cmd_buffer.len(), 2);
        assert_eq!(list.cmd_buffer[0].elem_count, 6);
        assert_eq!(list.cmd_buffer[1].elem_count, 6);
    }

    #[test]
    fn test_rounded_fill_goes_through_path() {
        let mut list = list();
        list.flags = DrawListFlags::empty();
        list.add_rect_filled(Vec2::ZERO, Vec2::new(40.0, 40.0), color::COL32_WHITE, 4.0, Corners::ALL);

        // 16 path points, fan triangulated.
        assert_eq!(list.vtx_buffer.len(), 16);
        assert_eq!(list.idx_buffer.len(), 14 * 3);
    }

    #[test]
    fn test_invisible_color_is_skipped() {
        let mut list = list();
        list.add_rect_filled(Vec2::ZERO, Vec2::ONE, 0x00FF_FFFF, 0.0, Corners::ALL);
        list.add_circle(Vec2::ZERO, 5.0, 0, 12, 1.0);
        assert!(list.vtx_buffer.is_empty());
    }

    #[test]
    fn test_image_restores_texture() {
        let mut list = list();
        list.add_image(TextureId(3), Vec2::ZERO, Vec2::ONE, Vec2::ZERO, Vec2::ONE, color::COL32_WHITE);

        assert_eq!(list.texture_depth(), 0);
        assert_eq!(list.cmd_buffer[0].texture_id, TextureId(3));
        assert_eq!(list.cmd_buffer[0].elem_count, 6);
    }

    #[test]
    fn test_multi_color_rect_corner_colors() {
        let mut list = list();
        list.add_rect_filled_multi_color(Vec2::ZERO, Vec2::ONE, 1 << 24, 2 << 24, 3 << 24, 4 << 24);
        let cols: Vec<_> = list.vtx_buffer.iter().map(|v| v.col >> 24).collect();
        assert_eq!(cols, vec![1, 2, 3, 4]);
    }
}
