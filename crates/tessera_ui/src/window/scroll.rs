//! Scrollbars, scroll targets and mouse-wheel scrolling.

use tessera_core::{Rect, Vec2};
use tessera_draw::Corners;

use super::Window;
use crate::config::{Style, StyleColor};
use crate::context::Context;
use crate::flags::{ButtonFlags, WindowFlags};

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

impl Window {
    /// Scroll for this frame: the pending target if any, clamped to the
    /// scrollable range.
    pub(crate) fn calc_next_scroll(&self, style: &Style) -> Vec2 {
        let mut scroll = self.scroll;
        if self.scroll_target.x < f32::MAX {
            scroll.x = self.scroll_target.x
                - self.scroll_target_center_ratio.x * (self.size_full.x - self.scrollbar_sizes.x);
        }
        if self.scroll_target.y < f32::MAX {
            let ratio = self.scroll_target_center_ratio.y;
            let mut target_y = self.scroll_target.y;
            // Snap to the edges so the padding is reachable.
            if ratio <= 0.0 && target_y <= self.window_padding.y {
                target_y = 0.0;
            }
            if ratio >= 1.0 && target_y >= self.size_contents.y - self.window_padding.y + style.item_spacing.y {
                target_y = self.size_contents.y;
            }
            scroll.y = target_y
                - (1.0 - ratio) * self.title_bar_height
                - ratio * (self.size_full.y - self.scrollbar_sizes.y);
        }
        scroll = scroll.max(Vec2::ZERO);
        if !self.collapsed && !self.skip_items {
            scroll.x = scroll.x.min(self.scroll_max_x());
            scroll.y = scroll.y.min(self.scroll_max_y());
        }
        scroll
    }

    /// Sets the vertical scroll immediately, keeping last frame's content
    /// extent unchanged.
    fn set_scroll_y_now(&mut self, y: f32) {
        self.dc.cursor_max_pos.y += self.scroll.y;
        self.scroll.y = y;
        self.dc.cursor_max_pos.y -= self.scroll.y;
    }

    fn set_scroll_x_now(&mut self, x: f32) {
        self.dc.cursor_max_pos.x += self.scroll.x;
        self.scroll.x = x;
        self.dc.cursor_max_pos.x -= self.scroll.x;
    }
}

impl Context {
    /// Draws and handles the scrollbar of the current window on `axis`.
    pub(crate) fn scrollbar(&mut self, axis: Axis) {
        let horizontal = axis == Axis::X;
        let idx = self.cur();
        let id = self.get_id(if horizontal { "#SCROLLX" } else { "#SCROLLY" });
        let style_size = self.style.scrollbar_size;

        let (window_rect, flags, border, rounding, other_scrollbar) = {
            let w = &self.windows[idx];
            let other = if horizontal { w.scrollbar_y } else { w.scrollbar_x };
            (w.rect(), w.flags, w.window_border_size, w.window_rounding, other)
        };
        let other_w = if other_scrollbar { style_size } else { 0.0 };
        let mut bb = if horizontal {
            Rect::from_coords(
                window_rect.min.x + border,
                window_rect.max.y - style_size,
                window_rect.max.x - other_w - border,
                window_rect.max.y - border,
            )
        } else {
            Rect::from_coords(
                window_rect.max.x - style_size,
                window_rect.min.y + border,
                window_rect.max.x - border,
                window_rect.max.y - other_w - border,
            )
        };
        if !horizontal {
            bb.min.y += self.windows[idx].title_bar_height;
        }
        if bb.width() <= 0.0 || bb.height() <= 0.0 {
            return;
        }

        let mut corners = Corners::empty();
        if horizontal {
            corners |= Corners::BOT_LEFT;
        } else if flags.contains(WindowFlags::NO_TITLE_BAR) {
            corners |= Corners::TOP_RIGHT;
        }
        if !other_scrollbar {
            corners |= Corners::BOT_RIGHT;
        }
        let bg_col = self.col(StyleColor::ScrollbarBg);
        self.windows[idx]
            .draw_list
            .add_rect_filled(bb.min, bb.max, bg_col, rounding, corners);
        let shrink = Vec2::new(
            ((bb.width() - 2.0) * 0.5).trunc().clamp(0.0, 3.0),
            ((bb.height() - 2.0) * 0.5).trunc().clamp(0.0, 3.0),
        );
        bb = bb.expand_xy(-shrink);

        // "v" is the long axis.
        let a = axis.index();
        let scrollbar_size_v = bb.size().axis(a);
        let (scroll_v, avail_v, contents_v) = {
            let w = &self.windows[idx];
            (w.scroll.axis(a), w.size_full.axis(a) - other_w, w.size_contents.axis(a))
        };
        let win_size_v = contents_v.max(avail_v).max(1.0);
        let grab_h_pixels = (scrollbar_size_v * (avail_v / win_size_v))
            .max(self.style.grab_min_size)
            .min(scrollbar_size_v);
        let grab_h_norm = grab_h_pixels / scrollbar_size_v;

        let previously_held = self.active_id == id;
        let (hovered, held, _) = self.button_behavior(bb, id, ButtonFlags::NO_NAV_FOCUS);

        let scroll_max = (contents_v - avail_v).max(1.0);
        let mut scroll_ratio = (scroll_v / scroll_max).clamp(0.0, 1.0);
        let mut grab_v_norm = scroll_ratio * (scrollbar_size_v - grab_h_pixels) / scrollbar_size_v;
        if held && grab_h_norm < 1.0 {
            let scrollbar_pos_v = bb.min.axis(a);
            let mouse_pos_v = self.input.mouse_pos.axis(a);
            let clicked_v_norm = ((mouse_pos_v - scrollbar_pos_v) / scrollbar_size_v).clamp(0.0, 1.0);
            self.set_hovered_id(id);

            let mut seek_absolute = false;
            if !previously_held {
                // Clicking the grab keeps the offset; clicking the track
                // jumps so the grab centers under the mouse.
                *self.scrollbar_click_delta_to_grab_center.axis_mut(a) =
                    if clicked_v_norm >= grab_v_norm && clicked_v_norm <= grab_v_norm + grab_h_norm {
                        clicked_v_norm - grab_v_norm - grab_h_norm * 0.5
                    } else {
                        seek_absolute = true;
                        0.0
                    };
            }

            let delta = self.scrollbar_click_delta_to_grab_center.axis(a);
            let scroll_v_norm = ((clicked_v_norm - delta - grab_h_norm * 0.5) / (1.0 - grab_h_norm)).clamp(0.0, 1.0);
            let new_scroll = (0.5 + scroll_v_norm * scroll_max).trunc();
            *self.windows[idx].scroll.axis_mut(a) = new_scroll;

            scroll_ratio = (new_scroll / scroll_max).clamp(0.0, 1.0);
            grab_v_norm = scroll_ratio * (scrollbar_size_v - grab_h_pixels) / scrollbar_size_v;
            if seek_absolute {
                *self.scrollbar_click_delta_to_grab_center.axis_mut(a) =
                    clicked_v_norm - grab_v_norm - grab_h_norm * 0.5;
            }
        }

        let grab_col = self.col(if held {
            StyleColor::ScrollbarGrabActive
        } else if hovered {
            StyleColor::ScrollbarGrabHovered
        } else {
            StyleColor::ScrollbarGrab
        });
        let grab_rect = if horizontal {
            let x = bb.min.x + (bb.max.x - bb.min.x) * grab_v_norm;
            Rect::from_coords(x, bb.min.y, (x + grab_h_pixels).min(window_rect.max.x), bb.max.y)
        } else {
            let y = bb.min.y + (bb.max.y - bb.min.y) * grab_v_norm;
            Rect::from_coords(bb.min.x, y, bb.max.x, (y + grab_h_pixels).min(window_rect.max.y))
        };
        let grab_rounding = self.style.scrollbar_rounding;
        self.windows[idx]
            .draw_list
            .add_rect_filled(grab_rect.min, grab_rect.max, grab_col, grab_rounding, Corners::ALL);
    }

    /// Scrolls the hovered window (or the nearest ancestor that accepts
    /// wheel scrolling) by this frame's wheel input.
    pub(crate) fn update_mouse_wheel(&mut self) {
        let Some(hovered) = self.hovered_window else { return };
        let (wheel, wheel_h) = (self.input.mouse_wheel, self.input.mouse_wheel_h);
        if self.windows[hovered].collapsed || (wheel == 0.0 && wheel_h == 0.0) {
            return;
        }

        let mut target = hovered;
        loop {
            let w = &self.windows[target];
            let passes_to_parent = w.flags.contains(WindowFlags::CHILD_WINDOW)
                && w.flags.contains(WindowFlags::NO_SCROLL_WITH_MOUSE)
                && !w.flags.intersects(WindowFlags::NO_SCROLLBAR | WindowFlags::NO_INPUTS);
            match (passes_to_parent, w.parent) {
                (true, Some(p)) => target = p,
                _ => break,
            }
        }
        let font_size = self.font_size;
        let ctrl = self.input.modifiers.ctrl;
        let w = &mut self.windows[target];
        if w.flags.intersects(WindowFlags::NO_SCROLL_WITH_MOUSE | WindowFlags::NO_INPUTS) || ctrl {
            return;
        }
        if wheel != 0.0 {
            let amount = (5.0 * font_size)
                .min((w.contents_region_rect.height() + w.window_padding.y * 2.0) * 0.67)
                .trunc();
            let y = w.scroll.y - wheel * amount;
            w.set_scroll_y_now(y);
        }
        if wheel_h != 0.0 {
            let x = w.scroll.x - wheel_h * font_size;
            w.set_scroll_x_now(x);
        }
    }

    /// Horizontal scroll of the current window.
    #[must_use]
    pub fn get_scroll_x(&self) -> f32 {
        self.cw().scroll.x
    }

    /// Vertical scroll of the current window.
    #[must_use]
    pub fn get_scroll_y(&self) -> f32 {
        self.cw().scroll.y
    }

    /// Largest horizontal scroll of the current window.
    #[must_use]
    pub fn get_scroll_max_x(&self) -> f32 {
        self.cw().scroll_max_x()
    }

    /// Largest vertical scroll of the current window.
    #[must_use]
    pub fn get_scroll_max_y(&self) -> f32 {
        self.cw().scroll_max_y()
    }

    /// Scrolls the current window horizontally, applied at its next `begin`.
    pub fn set_scroll_x(&mut self, scroll_x: f32) {
        let w = self.cw_mut();
        w.scroll_target.x = scroll_x;
        w.scroll_target_center_ratio.x = 0.0;
    }

    /// Scrolls the current window vertically, applied at its next `begin`.
    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        let w = self.cw_mut();
        w.scroll_target.y = scroll_y + w.title_bar_height;
        w.scroll_target_center_ratio.y = 0.0;
    }

    /// Scrolls so that window-relative `pos_y` lands at `center_y_ratio`
    /// of the visible height (0 top, 0.5 center, 1 bottom).
    ///
    /// # Panics
    ///
    /// Panics if `center_y_ratio` is outside `0..=1`.
    pub fn set_scroll_from_pos_y(&mut self, pos_y: f32, center_y_ratio: f32) {
        assert!((0.0..=1.0).contains(&center_y_ratio), "center ratio {center_y_ratio} outside 0..=1");
        let w = self.cw_mut();
        w.scroll_target.y = (pos_y + w.scroll.y).trunc();
        w.scroll_target_center_ratio.y = center_y_ratio;
    }

    /// Scrolls so that the last submitted line lands at `center_y_ratio`.
    pub fn set_scroll_here_y(&mut self, center_y_ratio: f32) {
        let spacing_y = self.style.item_spacing.y;
        let w = self.cw();
        let mut target_y = w.dc.cursor_pos_prev_line.y - w.pos.y;
        target_y += w.dc.prev_line_height * center_y_ratio + spacing_y * (center_y_ratio - 0.5) * 2.0;
        self.set_scroll_from_pos_y(target_y, center_y_ratio);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_draw::DrawListSharedData;

    use super::*;
    use crate::flags::Cond;
    use crate::input::MouseButton;
    use crate::test_support::{frame, test_context};

    // Vertical track of a 200x200 untitled window at the origin: one pixel
    // of border and three of inset on each end.
    const TRACK_TOP: f32 = 4.0;
    const TRACK_LEN: f32 = 192.0;
    const SCROLLBAR_X: f32 = 191.0;

    #[derive(Debug, Clone, Copy)]
    struct ScrollState {
        scroll: f32,
        scroll_max: f32,
        grab_len: f32,
    }

    impl ScrollState {
        fn grab_top(&self) -> f32 {
            TRACK_TOP + (TRACK_LEN - self.grab_len) * self.scroll / self.scroll_max
        }

        fn grab_center(&self) -> f32 {
            self.grab_top() + self.grab_len * 0.5
        }
    }

    fn scrolled_frame(ctx: &mut Context) -> ScrollState {
        frame(ctx, |ctx| {
            ctx.set_next_window_pos(Vec2::ZERO, Cond::FIRST_USE_EVER, Vec2::ZERO);
            ctx.set_next_window_size(Vec2::new(200.0, 200.0), Cond::FIRST_USE_EVER);
            ctx.begin("Scroll", WindowFlags::NO_TITLE_BAR);
            ctx.dummy(Vec2::new(50.0, 1000.0));
            let w = ctx.cw();
            assert!(w.scrollbar_y || w.size_contents.y <= 200.0);
            let state = ScrollState {
                scroll: w.scroll.y,
                scroll_max: w.size_contents.y - w.size_full.y,
                grab_len: (TRACK_LEN * w.size_full.y / w.size_contents.y)
                    .max(Style::default().grab_min_size)
                    .min(TRACK_LEN),
            };
            ctx.end();
            state
        })
    }

    /// Window laid out with its scrollbar showing and the mouse at `y` on
    /// the track.
    fn hovering_track(y: f32) -> (Context, ScrollState) {
        let mut ctx = test_context();
        scrolled_frame(&mut ctx);
        ctx.input_mut().mouse_pos = Vec2::new(SCROLLBAR_X, y);
        let state = scrolled_frame(&mut ctx);
        assert!(state.scroll_max > 0.0);
        assert_eq!(state.scroll, 0.0);
        (ctx, state)
    }

    #[test]
    fn test_track_click_centers_grab_under_mouse() {
        let (mut ctx, before) = hovering_track(150.0);
        assert!(before.grab_top() + before.grab_len < 150.0, "click lands below the grab");

        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        let clicked = scrolled_frame(&mut ctx);
        assert!(clicked.scroll > 0.0);
        assert!((clicked.grab_center() - 150.0).abs() <= 1.0, "grab centered at {}", clicked.grab_center());

        ctx.input_mut().mouse_pos.y = 160.0;
        let dragged = scrolled_frame(&mut ctx);
        assert!((dragged.grab_center() - 160.0).abs() <= 1.0);
    }

    #[test]
    fn test_grab_drag_keeps_click_offset() {
        let (mut ctx, before) = hovering_track(20.0);
        assert!(before.grab_top() < 20.0 && 20.0 < before.grab_top() + before.grab_len);

        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        let clicked = scrolled_frame(&mut ctx);
        assert_eq!(clicked.scroll, 0.0, "clicking the grab does not seek");

        ctx.input_mut().mouse_pos.y = 70.0;
        let dragged = scrolled_frame(&mut ctx);
        assert!(dragged.scroll > 0.0);
        assert!(
            (dragged.grab_top() - (before.grab_top() + 50.0)).abs() <= 1.0,
            "grab moved to {}",
            dragged.grab_top()
        );

        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        let released = scrolled_frame(&mut ctx);
        assert_eq!(released.scroll, dragged.scroll);
    }

    fn window() -> Window {
        let mut w = Window::new(0, "S", Arc::new(DrawListSharedData::new()));
        w.size_full = Vec2::new(100.0, 100.0);
        w.size_contents = Vec2::new(100.0, 300.0);
        w.window_padding = Vec2::new(8.0, 8.0);
        w
    }

    #[test]
    fn test_scroll_clamped_to_max() {
        let mut w = window();
        w.scroll_target = Vec2::new(f32::MAX, 1000.0);
        w.scroll_target_center_ratio = Vec2::ZERO;
        let s = w.calc_next_scroll(&Style::default());
        assert_eq!(s.y, 200.0);
        assert_eq!(w.scroll_max_y(), 200.0);
    }

    #[test]
    fn test_scroll_target_near_top_snaps_to_zero() {
        let mut w = window();
        w.scroll = Vec2::new(0.0, 50.0);
        w.scroll_target = Vec2::new(f32::MAX, 4.0);
        w.scroll_target_center_ratio = Vec2::ZERO;
        assert_eq!(w.calc_next_scroll(&Style::default()).y, 0.0);
    }

    #[test]
    fn test_no_target_keeps_scroll() {
        let mut w = window();
        w.scroll = Vec2::new(0.0, 42.0);
        assert_eq!(w.calc_next_scroll(&Style::default()).y, 42.0);
    }

    #[test]
    fn test_immediate_scroll_preserves_content_extent() {
        let mut w = window();
        w.dc.cursor_max_pos = Vec2::new(0.0, 250.0);
        w.set_scroll_y_now(30.0);
        assert_eq!(w.dc.cursor_max_pos.y + w.scroll.y, 250.0);
    }
}
