//! Resize grips and borders.
//!
//! Each grip and border is a `button_behavior` item with a synthetic id
//! under `"#RESIZE"`. While one is held, the mouse position is turned into
//! a target corner, run through the size constraints and applied once.

use tessera_core::color::PackedColor;
use tessera_core::{Rect, Vec2};

use super::WindowIdx;
use crate::config::StyleColor;
use crate::context::Context;
use crate::flags::{ButtonFlags, WindowFlags};
use crate::input::MouseButton;

/// Thickness of the invisible edge handles.
const RESIZE_BORDER_SIZE: f32 = 5.0;

struct ResizeGripDef {
    corner: Vec2,
    inner_dir: Vec2,
    arc_min_12: u32,
    arc_max_12: u32,
}

const RESIZE_GRIP_DEF: [ResizeGripDef; 2] = [
    // Lower right.
    ResizeGripDef {
        corner: Vec2::new(1.0, 1.0),
        inner_dir: Vec2::new(-1.0, -1.0),
        arc_min_12: 0,
        arc_max_12: 3,
    },
    // Lower left.
    ResizeGripDef {
        corner: Vec2::new(0.0, 1.0),
        inner_dir: Vec2::new(1.0, -1.0),
        arc_min_12: 3,
        arc_max_12: 6,
    },
];

/// What the resize pass needs the decoration pass to draw.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ResizeResult {
    pub grip_count: usize,
    /// Zero means "do not draw".
    pub grip_cols: [PackedColor; 2],
    pub border_held: Option<usize>,
}

/// Edge rect `n` (top, right, bottom, left), inset by `perp_padding` along
/// the edge.
fn border_rect(window_rect: Rect, n: usize, perp_padding: f32, thickness: f32) -> Rect {
    let mut r = window_rect;
    if thickness == 0.0 {
        r.max -= Vec2::ONE;
    }
    match n {
        0 => Rect::from_coords(r.min.x + perp_padding, r.min.y, r.max.x - perp_padding, r.min.y + thickness),
        1 => Rect::from_coords(r.max.x - thickness, r.min.y + perp_padding, r.max.x, r.max.y - perp_padding),
        2 => Rect::from_coords(r.min.x + perp_padding, r.max.y - thickness, r.max.x - perp_padding, r.max.y),
        _ => Rect::from_coords(r.min.x, r.min.y + perp_padding, r.min.x + thickness, r.max.y - perp_padding),
    }
}

impl Context {
    fn resize_grip_draw_size(&self, idx: WindowIdx) -> f32 {
        let rounding = self.windows[idx].window_rounding;
        (self.font_size * 1.35).max(rounding + 1.0 + self.font_size * 0.2).floor()
    }

    /// Position and size that put the window's `corner_norm` corner at
    /// `corner_target` while the opposite corner stays fixed.
    fn calc_resize_pos_size_from_any_corner(&self, idx: WindowIdx, corner_target: Vec2, corner_norm: Vec2) -> (Vec2, Vec2) {
        let w = &self.windows[idx];
        let pos_min = corner_target.lerp_xy(w.pos, corner_norm);
        let pos_max = (w.pos + w.size).lerp_xy(corner_target, corner_norm);
        let size_expected = pos_max - pos_min;
        let size_constrained = self.calc_size_after_constraint(idx, size_expected);
        let mut pos = pos_min;
        if corner_norm.x == 0.0 {
            pos.x -= size_constrained.x - size_expected.x;
        }
        if corner_norm.y == 0.0 {
            pos.y -= size_constrained.y - size_expected.y;
        }
        (pos, size_constrained)
    }

    /// Handles the resize grips and borders of the window being begun.
    pub(crate) fn update_manual_resize(&mut self, idx: WindowIdx, size_auto_fit: Vec2) -> ResizeResult {
        let mut result = ResizeResult::default();
        {
            let w = &self.windows[idx];
            if w.flags.intersects(WindowFlags::NO_RESIZE | WindowFlags::ALWAYS_AUTO_RESIZE)
                || w.auto_fit_frames != [0, 0]
                || w.collapsed
            {
                return result;
            }
        }
        result.grip_count = RESIZE_GRIP_DEF.len();
        let border_count = if self.io.config_windows_resize_from_edges { 4 } else { 0 };
        let grip_draw_size = self.resize_grip_draw_size(idx);
        let grip_hover_size = (grip_draw_size * 0.75).floor();

        let mut pos_target = Vec2::INVALID;
        let mut size_target = Vec2::INVALID;

        self.push_id("#RESIZE");
        for (n, grip) in RESIZE_GRIP_DEF.iter().enumerate() {
            let (pos, size) = (self.windows[idx].pos, self.windows[idx].size);
            let corner = pos.lerp_xy(pos + size, grip.corner);
            let a = corner;
            let b = corner + grip.inner_dir * grip_hover_size;
            let r = Rect::new(a.min(b), a.max(b));
            let id = self.get_id(n);
            let (hovered, held, _) =
                self.button_behavior(r, id, ButtonFlags::FLATTEN_CHILDREN | ButtonFlags::NO_NAV_FOCUS);
            if held && n == 0 && self.input.is_mouse_double_clicked(MouseButton::Left) {
                size_target = self.calc_size_after_constraint(idx, size_auto_fit);
                self.clear_active_id();
            } else if held {
                let corner_target = self.input.mouse_pos - self.active_id_click_offset + r.size().mul_elem(grip.corner);
                (pos_target, size_target) = self.calc_resize_pos_size_from_any_corner(idx, corner_target, grip.corner);
            }
            if n == 0 || held || hovered {
                let col = if held {
                    StyleColor::ResizeGripActive
                } else if hovered {
                    StyleColor::ResizeGripHovered
                } else {
                    StyleColor::ResizeGrip
                };
                result.grip_cols[n] = self.col(col);
            }
        }

        for n in 0..border_count {
            let rect = border_rect(self.windows[idx].rect(), n, grip_hover_size, RESIZE_BORDER_SIZE);
            let id = self.get_id(n + 4);
            let (_, held, _) = self.button_behavior(rect, id, ButtonFlags::FLATTEN_CHILDREN | ButtonFlags::NO_NAV_FOCUS);
            if !held {
                continue;
            }
            result.border_held = Some(n);
            let m = self.input.mouse_pos - self.active_id_click_offset;
            let mut target = self.windows[idx].pos;
            let norm = match n {
                0 => {
                    target.y = m.y;
                    Vec2::ZERO
                }
                1 => {
                    target.x = m.x + RESIZE_BORDER_SIZE;
                    Vec2::new(1.0, 0.0)
                }
                2 => {
                    target.y = m.y + RESIZE_BORDER_SIZE;
                    Vec2::new(0.0, 1.0)
                }
                _ => {
                    target.x = m.x;
                    Vec2::ZERO
                }
            };
            (pos_target, size_target) = self.calc_resize_pos_size_from_any_corner(idx, target, norm);
        }
        self.pop_id();

        let saved = !self.windows[idx].flags.contains(WindowFlags::NO_SAVED_SETTINGS);
        let w = &mut self.windows[idx];
        let mut changed = false;
        if size_target.is_valid() {
            w.size_full = size_target;
            changed = true;
        }
        if pos_target.is_valid() {
            w.pos_float = pos_target.floor();
            w.pos = w.pos_float;
            changed = true;
        }
        w.size = w.size_full;
        if changed && saved {
            self.mark_settings_dirty();
        }
        result
    }

    pub(crate) fn render_resize_grips(&mut self, idx: WindowIdx, resize: &ResizeResult) {
        let grip_draw_size = self.resize_grip_draw_size(idx);
        let w = &mut self.windows[idx];
        let (pos, size, rounding, border) = (w.pos, w.size, w.window_rounding, w.window_border_size);
        for (n, grip) in RESIZE_GRIP_DEF.iter().enumerate().take(resize.grip_count) {
            let col = resize.grip_cols[n];
            if col == 0 {
                continue;
            }
            let corner = pos.lerp_xy(pos + size, grip.corner);
            let (first, second) = if n & 1 == 1 {
                (Vec2::new(border, grip_draw_size), Vec2::new(grip_draw_size, border))
            } else {
                (Vec2::new(grip_draw_size, border), Vec2::new(border, grip_draw_size))
            };
            let list = &mut w.draw_list;
            list.path_line_to(corner + grip.inner_dir.mul_elem(first));
            list.path_line_to(corner + grip.inner_dir.mul_elem(second));
            list.path_arc_to_fast(
                corner + grip.inner_dir * (rounding + border),
                rounding,
                grip.arc_min_12,
                grip.arc_max_12,
            );
            list.path_fill_convex(col);
        }
    }

    pub(crate) fn render_held_border(&mut self, idx: WindowIdx, resize: &ResizeResult) {
        let Some(n) = resize.border_held else { return };
        let grip_draw_size = self.resize_grip_draw_size(idx);
        let col = self.col(StyleColor::SeparatorActive);
        let w = &mut self.windows[idx];
        let r = border_rect(w.rect(), n, grip_draw_size, 0.0);
        let thickness = w.window_border_size.max(1.0);
        w.draw_list.add_line(r.min, r.max, col, thickness);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::flags::Cond;
    use crate::test_support::{frame, test_context};
    use crate::window::{SizeCallback, SizeCallbackData};

    #[derive(Debug, Clone, Copy)]
    struct Snapshot {
        pos: Vec2,
        size: Vec2,
        contents: Vec2,
    }

    impl Snapshot {
        /// A point just inside the lower-right grip.
        fn grip(&self) -> Vec2 {
            self.pos + self.size - Vec2::splat(5.0)
        }
    }

    fn sized_frame(ctx: &mut Context, constraints: Option<(Vec2, Vec2, Option<SizeCallback>)>) -> Snapshot {
        frame(ctx, |ctx| {
            ctx.set_next_window_pos(Vec2::new(100.0, 100.0), Cond::FIRST_USE_EVER, Vec2::ZERO);
            ctx.set_next_window_size(Vec2::new(200.0, 150.0), Cond::FIRST_USE_EVER);
            if let Some((min, max, callback)) = constraints {
                ctx.set_next_window_size_constraints(min, max, callback);
            }
            ctx.begin("Sized", WindowFlags::empty());
            ctx.dummy(Vec2::new(120.0, 60.0));
            let w = ctx.cw();
            let out = Snapshot {
                pos: w.pos,
                size: w.size_full,
                contents: w.size_contents,
            };
            ctx.end();
            out
        })
    }

    /// Runs frames until the window is laid out and the mouse rests on its
    /// lower-right grip.
    fn on_grip(ctx: &mut Context, constraints: &Option<(Vec2, Vec2, Option<SizeCallback>)>) -> Snapshot {
        let first = sized_frame(ctx, constraints.clone());
        ctx.input_mut().mouse_pos = first.grip();
        let hovered = sized_frame(ctx, constraints.clone());
        assert_eq!(hovered.size, first.size);
        hovered
    }

    #[test]
    fn test_grip_drag_resizes_from_corner() {
        let mut ctx = test_context();
        let start = on_grip(&mut ctx, &None);
        assert_eq!(start.size, Vec2::new(200.0, 150.0));

        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        let clicked = sized_frame(&mut ctx, None);
        assert_eq!(clicked.size, start.size, "grabbing alone does not resize");

        ctx.input_mut().mouse_pos = start.grip() + Vec2::new(50.0, 40.0);
        let dragged = sized_frame(&mut ctx, None);
        assert_eq!(dragged.size, Vec2::new(250.0, 190.0));
        assert_eq!(dragged.pos, start.pos, "opposite corner stays put");

        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        ctx.input_mut().mouse_pos += Vec2::new(30.0, 30.0);
        assert_eq!(sized_frame(&mut ctx, None).size, dragged.size);
    }

    #[test]
    fn test_grip_drag_goes_through_constraints_and_callback() {
        let square: SizeCallback = Arc::new(|data: &SizeCallbackData| Vec2::splat(data.desired_size.x.max(data.desired_size.y)));
        let constraints = Some((Vec2::new(100.0, 100.0), Vec2::new(260.0, 260.0), Some(square)));
        let mut ctx = test_context();
        let start = on_grip(&mut ctx, &constraints);
        assert_eq!(start.size, Vec2::new(200.0, 200.0), "callback squares the initial size");

        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        sized_frame(&mut ctx, constraints.clone());
        ctx.input_mut().mouse_pos = start.grip() + Vec2::new(100.0, 10.0);
        let dragged = sized_frame(&mut ctx, constraints.clone());
        assert_eq!(dragged.size, Vec2::new(260.0, 260.0), "clamped to max, then squared");

        ctx.input_mut().mouse_pos = start.grip() - Vec2::new(150.0, 150.0);
        let shrunk = sized_frame(&mut ctx, constraints);
        assert_eq!(shrunk.size, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_double_click_on_grip_fits_contents() {
        let mut ctx = test_context();
        let start = on_grip(&mut ctx, &None);
        assert!(start.contents.x < start.size.x && start.contents.y < start.size.y);

        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        sized_frame(&mut ctx, None);
        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        sized_frame(&mut ctx, None);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        let fitted = sized_frame(&mut ctx, None);
        assert_eq!(fitted.size, fitted.contents);
        assert_eq!(fitted.pos, start.pos);
        assert!(!ctx.is_any_item_active(), "double-click releases the grip");
    }

    #[test]
    fn test_border_rects_hug_edges() {
        let r = Rect::from_coords(0.0, 0.0, 100.0, 50.0);
        assert_eq!(border_rect(r, 0, 10.0, 5.0), Rect::from_coords(10.0, 0.0, 90.0, 5.0));
        assert_eq!(border_rect(r, 1, 10.0, 5.0), Rect::from_coords(95.0, 10.0, 100.0, 40.0));
        assert_eq!(border_rect(r, 2, 10.0, 5.0), Rect::from_coords(10.0, 45.0, 90.0, 50.0));
        assert_eq!(border_rect(r, 3, 10.0, 5.0), Rect::from_coords(0.0, 10.0, 5.0, 40.0));
    }

    #[test]
    fn test_zero_thickness_border_is_a_line_inside_the_window() {
        let r = Rect::from_coords(0.0, 0.0, 100.0, 50.0);
        let line = border_rect(r, 1, 0.0, 0.0);
        assert_eq!(line.min.x, 99.0);
        assert_eq!(line.max.x, 99.0);
    }
}
