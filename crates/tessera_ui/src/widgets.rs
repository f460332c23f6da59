//! Render helpers and the minimal item set built on them.
//!
//! Every item follows the same sequence: compute its rect from the
//! cursor, `item_size`, `item_add` (bail out if clipped),
//! `button_behavior`, then draw.

use tessera_core::{Rect, Vec2};
use tessera_draw::Corners;

use crate::config::StyleColor;
use crate::context::Context;
use crate::flags::{ButtonFlags, ItemFlags};
use crate::id::label_display;
use crate::value::{DataOp, DataValue};
use crate::window::Dir;

impl Context {
    /// Filled frame with the style's frame border.
    pub(crate) fn render_frame(&mut self, min: Vec2, max: Vec2, fill: u32, border: bool, rounding: f32) {
        let border_size = self.style.frame_border_size;
        let shadow = self.col(StyleColor::BorderShadow);
        let border_col = self.col(StyleColor::Border);
        let list = &mut self.cw_mut().draw_list;
        list.add_rect_filled(min, max, fill, rounding, Corners::ALL);
        if border && border_size > 0.0 {
            list.add_rect(min + Vec2::ONE, max + Vec2::ONE, shadow, rounding, Corners::ALL, border_size);
            list.add_rect(min, max, border_col, rounding, Corners::ALL, border_size);
        }
    }

    /// Triangle arrow in a font-height square at `min`.
    pub(crate) fn render_arrow(&mut self, min: Vec2, dir: Dir, scale: f32) {
        let h = self.font_size;
        let mut r = h * 0.40 * scale;
        let mut center = min + Vec2::new(h * 0.5, h * 0.5 * scale);
        let (a, b, c) = match dir {
            Dir::Up | Dir::Down => {
                if dir == Dir::Up {
                    r = -r;
                }
                center.y -= r * 0.25;
                (Vec2::new(0.0, 1.0), Vec2::new(-0.866, -0.5), Vec2::new(0.866, -0.5))
            }
            Dir::Left | Dir::Right => {
                if dir == Dir::Left {
                    r = -r;
                }
                center.x -= r * 0.25;
                (Vec2::new(1.0, 0.0), Vec2::new(-0.5, 0.866), Vec2::new(-0.5, -0.866))
            }
        };
        let col = self.col(StyleColor::Text);
        self.cw_mut()
            .draw_list
            .add_triangle_filled(center + a * r, center + b * r, center + c * r, col);
    }

    /// Draws `text` aligned inside `[min, max]`. Glyphs are clipped to
    /// `clip` (default: the target rect) only when the text overflows it.
    pub(crate) fn render_text_clipped(
        &mut self,
        min: Vec2,
        max: Vec2,
        text: &str,
        text_size: Option<Vec2>,
        align: Vec2,
        clip: Option<&Rect>,
    ) {
        let display = label_display(text);
        if display.is_empty() {
            return;
        }
        let text_size = text_size.unwrap_or_else(|| self.calc_text_size(display, false));
        let clip_r = clip.copied().unwrap_or(Rect::new(min, max));
        let mut need_clipping = min.x + text_size.x >= clip_r.max.x || min.y + text_size.y >= clip_r.max.y;
        if clip.is_some() {
            need_clipping |= min.x < clip_r.min.x || min.y < clip_r.min.y;
        }

        let mut pos = min;
        if align.x > 0.0 {
            pos.x = pos.x.max(pos.x + (max.x - pos.x - text_size.x) * align.x);
        }
        if align.y > 0.0 {
            pos.y = pos.y.max(pos.y + (max.y - pos.y - text_size.y) * align.y);
        }
        self.render_text(pos, display, false, need_clipping.then_some(&clip_r));
    }

    /// Clickable frame with a centered label. Returns true when pressed.
    /// Zero size axes fit the label; negative axes extend to the right or
    /// bottom edge minus that amount.
    pub fn button_ex(&mut self, label: &str, size: Vec2, flags: ButtonFlags) -> bool {
        if self.cw().skip_items {
            return false;
        }
        let id = self.get_id(label);
        let label_size = self.calc_text_size(label, true);
        let fp = self.style.frame_padding;

        let mut pos = self.cw().dc.cursor_pos;
        let base_offset = self.cw().dc.current_line_text_base_offset;
        if flags.contains(ButtonFlags::ALIGN_TEXT_BASE_LINE) && fp.y < base_offset {
            pos.y += base_offset - fp.y;
        }
        let size = self.calc_item_size(size, label_size + fp * 2.0);
        let bb = Rect::from_pos_size(pos, size);
        self.item_size(size, fp.y);
        if !self.item_add(bb, id) {
            return false;
        }

        let mut flags = flags;
        if self.cw().dc.item_flags.contains(ItemFlags::BUTTON_REPEAT) {
            flags |= ButtonFlags::REPEAT;
        }
        let (hovered, held, pressed) = self.button_behavior(bb, id, flags);

        let col = self.col(if hovered && held {
            StyleColor::ButtonActive
        } else if hovered {
            StyleColor::ButtonHovered
        } else {
            StyleColor::Button
        });
        self.render_frame(bb.min, bb.max, col, true, self.style.frame_rounding);
        let align = self.style.button_text_align;
        self.render_text_clipped(bb.min + fp, bb.max - fp, label, Some(label_size), align, Some(&bb));
        pressed
    }

    /// Framed button. Returns true when clicked.
    pub fn button(&mut self, label: &str, size: Vec2) -> bool {
        self.button_ex(label, size, ButtonFlags::empty())
    }

    /// Button without vertical frame padding, aligned to surrounding text.
    pub fn small_button(&mut self, label: &str) -> bool {
        let backup = self.style.frame_padding.y;
        self.style.frame_padding.y = 0.0;
        let pressed = self.button_ex(label, Vec2::ZERO, ButtonFlags::ALIGN_TEXT_BASE_LINE);
        self.style.frame_padding.y = backup;
        pressed
    }

    /// Square button showing an arrow.
    pub fn arrow_button(&mut self, str_id: &str, dir: Dir) -> bool {
        if self.cw().skip_items {
            return false;
        }
        let id = self.get_id(str_id);
        let sz = self.frame_height();
        let bb = Rect::from_pos_size(self.cw().dc.cursor_pos, Vec2::splat(sz));
        let fp = self.style.frame_padding;
        self.item_size(bb.size(), fp.y);
        if !self.item_add(bb, id) {
            return false;
        }
        let (hovered, held, pressed) = self.button_behavior(bb, id, ButtonFlags::empty());
        let col = self.col(if hovered && held {
            StyleColor::ButtonActive
        } else if hovered {
            StyleColor::ButtonHovered
        } else {
            StyleColor::Button
        });
        self.render_frame(bb.min, bb.max, col, true, self.style.frame_rounding);
        let inset = Vec2::new((sz - self.font_size - fp.x).max(0.0), (sz - self.font_size - fp.y).max(0.0));
        self.render_arrow(bb.min + inset, dir, 1.0);
        pressed
    }

    /// Interactive area with no visuals. Use `is_item_*` queries on it.
    pub fn invisible_button(&mut self, str_id: &str, size: Vec2) -> bool {
        if self.cw().skip_items {
            return false;
        }
        let id = self.get_id(str_id);
        let size = self.calc_item_size(size, Vec2::ZERO);
        let bb = Rect::from_pos_size(self.cw().dc.cursor_pos, size);
        self.item_size(size, 0.0);
        if !self.item_add(bb, id) {
            return false;
        }
        let (_, _, pressed) = self.button_behavior(bb, id, ButtonFlags::empty());
        pressed
    }

    /// Raw text, no formatting and no `##` processing.
    pub fn text_unformatted(&mut self, text: &str) {
        if self.cw().skip_items {
            return;
        }
        let dc = &self.cw().dc;
        let pos = Vec2::new(dc.cursor_pos.x, dc.cursor_pos.y + dc.current_line_text_base_offset);
        let size = self.calc_text_size(text, false);
        let bb = Rect::from_pos_size(pos, size);
        self.item_size(size, 0.0);
        if !self.item_add(bb, crate::id::Id::NONE) {
            return;
        }
        self.render_text(bb.min, text, false, None);
    }

    /// Value with `-`/`+` buttons that repeat while held. Returns the
    /// stepped (and clamped) value and whether it changed.
    pub fn step_scalar(
        &mut self,
        label: &str,
        value: DataValue,
        step: DataValue,
        range: Option<(DataValue, DataValue)>,
    ) -> (DataValue, bool) {
        if self.cw().skip_items {
            return (value, false);
        }
        let inner_spacing = self.style.item_inner_spacing.x;
        let button_size = Vec2::splat(self.frame_height());
        let mut new_value = value;

        self.push_id(label);
        self.begin_group();
        self.push_button_repeat(true);
        if self.button_ex("-", button_size, ButtonFlags::empty()) {
            new_value = new_value.apply_op(DataOp::Sub, step);
        }
        self.same_line(0.0, inner_spacing);
        if self.button_ex("+", button_size, ButtonFlags::empty()) {
            new_value = new_value.apply_op(DataOp::Add, step);
        }
        self.pop_button_repeat();
        if let Some((min, max)) = range {
            new_value = new_value.clamp(min, max);
        }

        self.same_line(0.0, inner_spacing);
        self.align_text_to_frame_padding();
        self.text_unformatted(&new_value.to_string());
        let display = label_display(label);
        if !display.is_empty() {
            self.same_line(0.0, inner_spacing);
            self.text_unformatted(display);
        }
        self.end_group();
        self.pop_id();

        (new_value, new_value != value)
    }

    /// Lines up the following text with framed items on the same line.
    pub fn align_text_to_frame_padding(&mut self) {
        let fp_y = self.style.frame_padding.y;
        let h = self.frame_height();
        let w = self.cw_mut();
        if w.skip_items {
            return;
        }
        w.dc.current_line_height = w.dc.current_line_height.max(h);
        w.dc.current_line_text_base_offset = w.dc.current_line_text_base_offset.max(fp_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::WindowFlags;
    use crate::input::MouseButton;
    use crate::test_support::{frame, test_context};

    #[test]
    fn test_button_size_fits_label_plus_padding() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            ctx.begin("W", WindowFlags::empty());
            ctx.button("OK", Vec2::ZERO);
            let r = ctx.item_rect();
            let label = ctx.calc_text_size("OK", true);
            let fp = ctx.style().frame_padding;
            assert_eq!(r.size(), label + fp * 2.0);
            ctx.end();
        });
    }

    #[test]
    fn test_hidden_label_suffix_not_measured() {
        let ctx = test_context();
        assert_eq!(ctx.calc_text_size("OK##a", true), ctx.calc_text_size("OK", false));
    }

    fn submit_stepper(ctx: &mut Context) -> (Vec2, (DataValue, bool)) {
        ctx.begin("W", WindowFlags::NO_TITLE_BAR);
        let start = ctx.cursor_screen_pos();
        let result = ctx.step_scalar(
            "n",
            DataValue::I32(9),
            DataValue::I32(5),
            Some((DataValue::I32(0), DataValue::I32(10))),
        );
        ctx.end();
        let fh = ctx.frame_height();
        let spacing = ctx.style().item_inner_spacing.x;
        (start + Vec2::new(fh + spacing + fh * 0.5, fh * 0.5), result)
    }

    #[test]
    fn test_step_scalar_clamps_and_reports_change() {
        let mut ctx = test_context();
        let mut plus = Vec2::ZERO;
        for _ in 0..3 {
            let (center, (v, changed)) = frame(&mut ctx, submit_stepper);
            assert_eq!(v, DataValue::I32(9));
            assert!(!changed);
            plus = center;
        }

        ctx.input_mut().mouse_pos = plus;
        frame(&mut ctx, submit_stepper);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        let (_, (v, changed)) = frame(&mut ctx, submit_stepper);
        assert_eq!(v, DataValue::I32(9));
        assert!(!changed);

        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        let (_, (v, changed)) = frame(&mut ctx, submit_stepper);
        assert_eq!(v, DataValue::I32(10));
        assert!(changed);
    }
}
