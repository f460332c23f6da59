//! # Frame Lifecycle
//!
//! ```text
//! new_frame ──► widgets ──► end_frame ──► render ──► DrawData
//!    │                         │
//!    │ age input               │ close implicit window
//!    │ resolve hovered window  │ click-to-focus / move
//!    │ drop dead active id     │ close popups on outside click
//!    │ open "Debug##Default"   │ sort children after parents
//! ```
//!
//! `render` calls `end_frame` itself if the host did not.

use std::sync::Arc;

use tessera_core::Vec2;
use tessera_draw::DrawData;
use tracing::trace;

use crate::context::{Context, FramePhase, InputSource};
use crate::flags::{Cond, WindowFlags};
use crate::id::Id;
use crate::input::{MouseButton, NavInput};
use crate::window::WindowIdx;

/// Name of the window that collects items submitted outside any `begin`.
pub const IMPLICIT_WINDOW_NAME: &str = "Debug##Default";

impl Context {
    /// Starts a frame. Fill [`Context::input_mut`] first.
    ///
    /// # Panics
    ///
    /// Panics if the previous frame was not ended, or if the display size
    /// or delta time is unset.
    pub fn new_frame(&mut self) {
        assert!(
            self.phase != FramePhase::InFrame,
            "new_frame() called twice without end_frame()/render()"
        );
        let display = self.input.display_size;
        assert!(
            display.x >= 0.0 && display.y >= 0.0,
            "input display_size must be set before new_frame()"
        );
        assert!(self.input.delta_time > 0.0, "input delta_time must be positive");

        self.time += f64::from(self.input.delta_time);
        self.frame_count += 1;
        self.drag_drop_expire();
        self.tooltip_override_count = 0;
        self.rebuild_shared_data();

        self.overlay_draw_list.reset_for_new_frame(Arc::clone(&self.shared_data));
        self.overlay_draw_list.push_texture_id(self.font_texture);
        self.overlay_draw_list.push_clip_rect_full_screen();

        // Hover is reclaimed every frame; an active id nobody kept alive is
        // released.
        self.hovered_id_previous_frame = self.hovered_id;
        self.hovered_id = Id::NONE;
        self.hovered_id_allow_overlap = false;
        if self.active_id.is_some()
            && self.active_id_is_alive != self.active_id
            && self.active_id_previous_frame == self.active_id
        {
            trace!(id = %self.active_id, "active id not kept alive");
            self.clear_active_id();
        }
        if self.active_id.is_some() {
            self.active_id_timer += self.input.delta_time;
        }
        self.active_id_previous_frame = self.active_id;
        self.active_id_is_alive = Id::NONE;
        self.active_id_is_just_activated = false;

        self.drag_drop.new_frame();
        self.input.update(&self.io, self.time);
        self.update_nav();

        self.update_moving_window();
        self.update_hovered_window();
        self.update_settings_timer();
        self.update_mouse_wheel();

        for w in &mut self.windows {
            w.was_active = w.active;
            w.active = false;
            w.write_accessed = false;
        }
        if self.nav_window.is_some_and(|w| !self.windows[w].was_active) {
            self.focus_front_most_active_window(None);
        }

        self.window_stack.clear();
        self.begin_popup_stack.clear();
        self.current_window = None;
        self.close_popups_over_window(self.nav_window);

        self.phase = FramePhase::InFrame;
        self.set_next_window_size(Vec2::new(400.0, 400.0), Cond::FIRST_USE_EVER);
        self.begin(IMPLICIT_WINDOW_NAME, WindowFlags::empty());
    }

    /// Routes the `Activate`/`Cancel` nav inputs to the focused item.
    fn update_nav(&mut self) {
        self.nav_activate_id = Id::NONE;
        self.nav_activate_down_id = Id::NONE;
        self.nav_activate_pressed_id = Id::NONE;

        if self.input.is_nav_input_pressed(NavInput::Cancel, false, &self.io) {
            if self.active_id.is_some() {
                self.clear_active_id();
            } else if self.nav_window.is_some_and(|w| self.windows[w].flags.contains(WindowFlags::POPUP))
                && !self.open_popup_stack.is_empty()
            {
                let level = self.open_popup_stack.len() - 1;
                self.close_popup_to_level(level);
            } else {
                self.nav_id = Id::NONE;
            }
            return;
        }

        if self.nav_id.is_none() || (self.active_id.is_some() && self.active_id != self.nav_id) {
            return;
        }
        if self.input.is_nav_input_down(NavInput::Activate) {
            self.nav_activate_down_id = self.nav_id;
        }
        if self.input.is_nav_input_pressed(NavInput::Activate, false, &self.io) {
            self.nav_activate_pressed_id = self.nav_id;
            if self.active_id.is_none() {
                self.nav_activate_id = self.nav_id;
            }
        }
    }

    /// Drags the window being moved, before anything is laid out.
    fn update_moving_window(&mut self) {
        if let Some(moving) = self.moving_window {
            self.keep_alive_id(self.active_id);
            let root = self.windows[moving].root;
            if self.input.is_mouse_down(MouseButton::Left) {
                let pos = self.input.mouse_pos - self.active_id_click_offset;
                let w = &mut self.windows[root];
                if w.pos_float != pos {
                    w.pos_float = pos;
                    if !w.flags.contains(WindowFlags::NO_SAVED_SETTINGS) {
                        self.mark_settings_dirty();
                    }
                }
                self.focus_window(Some(moving));
            } else {
                self.clear_active_id();
                self.moving_window = None;
            }
        } else {
            // Clicking a NO_MOVE window still holds its move id, so the drag
            // does not hover other windows.
            if let Some(w) = self.active_id_window {
                if self.windows[w].move_id == self.active_id {
                    self.keep_alive_id(self.active_id);
                    if !self.input.is_mouse_down(MouseButton::Left) {
                        self.clear_active_id();
                    }
                }
            }
        }
    }

    fn update_hovered_window(&mut self) {
        let hovered = match self.moving_window {
            Some(m) if !self.windows[m].flags.contains(WindowFlags::NO_INPUTS) => Some(m),
            _ => self.find_hovered_window(self.input.mouse_pos),
        };
        self.hovered_window = hovered;
        self.hovered_root_window = hovered.map(|w| self.windows[w].root);

        if let (Some(modal), Some(root)) = (self.front_most_modal(), self.hovered_root_window) {
            if !self.is_window_child_of(root, modal) {
                self.hovered_window = None;
                self.hovered_root_window = None;
            }
        }
    }

    /// Front-most visible window under `pos` that accepts input.
    fn find_hovered_window(&self, pos: Vec2) -> Option<WindowIdx> {
        if !pos.is_valid() {
            return None;
        }
        let pad = self.style.touch_extra_padding;
        self.window_order.iter().rev().copied().find(|&idx| {
            let w = &self.windows[idx];
            w.is_active_and_visible()
                && !w.flags.contains(WindowFlags::NO_INPUTS)
                && w.outer_rect_clipped.expand_xy(pad).contains(pos)
        })
    }

    /// Closes the implicit window, applies click-to-focus and sorts windows.
    /// Called by [`Context::render`] if the host does not call it.
    ///
    /// # Panics
    ///
    /// Panics outside a frame or if a `begin` was not matched by `end`.
    pub fn end_frame(&mut self) {
        assert!(self.phase == FramePhase::InFrame, "end_frame() called outside a frame");
        assert!(
            self.window_stack.len() == 1,
            "end_frame() with {} windows still open: missing end()",
            self.window_stack.len().saturating_sub(1)
        );

        self.drag_drop_end_frame();

        let implicit = self.cur();
        if !self.windows[implicit].write_accessed {
            self.windows[implicit].active = false;
        }
        self.end_window();

        if self.active_id.is_none() && self.hovered_id.is_none() {
            let appearing = self.nav_window.is_some_and(|w| self.windows[w].appearing);
            if !appearing {
                if self.input.is_mouse_clicked(MouseButton::Left, false, &self.io) {
                    self.click_to_focus();
                }
                if self.input.is_mouse_clicked(MouseButton::Right, false, &self.io) {
                    self.right_click_close_popups();
                }
            }
        }

        self.sort_windows();
        self.input.end_frame();
        self.phase = FramePhase::Ended;
    }

    fn click_to_focus(&mut self) {
        match (self.hovered_window, self.hovered_root_window) {
            (Some(hovered), Some(root)) => {
                self.focus_window(Some(hovered));
                let move_id = self.windows[hovered].move_id;
                self.set_active_id(move_id, Some(hovered));
                self.active_id_click_offset = self.input.mouse_pos - self.windows[root].pos;

                let can_move = !self.windows[hovered].flags.contains(WindowFlags::NO_MOVE)
                    && !self.windows[root].flags.contains(WindowFlags::NO_MOVE);
                let on_title = !self.io.config_windows_move_from_title_bar_only
                    || self.windows[root].title_bar_rect().contains(self.input.mouse_pos);
                if can_move && on_title {
                    self.moving_window = Some(hovered);
                }
            }
            _ => {
                if self.nav_window.is_some() && self.front_most_modal().is_none() {
                    self.focus_window(None);
                }
            }
        }
    }

    /// Right-click closes popups above the clicked window without moving
    /// focus. A modal limits how far down this can reach.
    fn right_click_close_popups(&mut self) {
        let modal = self.front_most_modal();
        let mut above_modal = modal.is_none();
        for &idx in self.window_order.iter().rev() {
            if above_modal || Some(idx) == modal {
                break;
            }
            if Some(idx) == self.hovered_window {
                above_modal = true;
            }
        }
        let target = if above_modal { self.hovered_window } else { modal };
        self.close_popups_over_window(target);
    }

    /// Reorders windows so every active child follows its parent.
    fn sort_windows(&mut self) {
        let mut sorted = Vec::with_capacity(self.window_order.len());
        for &idx in &self.window_order {
            let w = &self.windows[idx];
            if w.active && w.flags.contains(WindowFlags::CHILD_WINDOW) {
                continue;
            }
            self.push_sorted(&mut sorted, idx);
        }
        debug_assert_eq!(sorted.len(), self.window_order.len(), "window sort lost a window");
        self.window_order = sorted;
    }

    fn push_sorted(&self, out: &mut Vec<WindowIdx>, idx: WindowIdx) {
        out.push(idx);
        let mut children = self.windows[idx].dc.child_windows.clone();
        children.sort_by_key(|&c| {
            let w = &self.windows[c];
            (
                w.flags.contains(WindowFlags::POPUP),
                w.flags.contains(WindowFlags::TOOLTIP),
                w.begin_order_within_parent,
            )
        });
        for child in children {
            if self.windows[child].active {
                self.push_sorted(out, child);
            }
        }
    }

    /// Ends the frame if needed and gathers every visible draw list, back
    /// to front: windows with their children, then tooltips, then the
    /// overlay list.
    ///
    /// # Panics
    ///
    /// Panics if no frame was started.
    pub fn render(&mut self) -> DrawData<'_> {
        if self.phase == FramePhase::InFrame {
            self.end_frame();
        }
        assert!(self.phase == FramePhase::Ended, "render() called without new_frame()");

        let mut windows = Vec::new();
        let mut tooltips = Vec::new();
        if self.style.alpha > 0.0 {
            for &idx in &self.window_order {
                let w = &self.windows[idx];
                if !w.is_active_and_visible() || w.flags.contains(WindowFlags::CHILD_WINDOW) {
                    continue;
                }
                let layer = if w.flags.contains(WindowFlags::TOOLTIP) {
                    &mut tooltips
                } else {
                    &mut windows
                };
                self.collect_window_lists(layer, idx);
            }
        }
        for &idx in windows.iter().chain(&tooltips) {
            self.windows[idx].draw_list.pop_unused_draw_cmd();
        }
        self.overlay_draw_list.pop_unused_draw_cmd();

        let this = &*self;
        let mut data = DrawData::new(Vec2::ZERO, this.input.display_size, this.input.display_framebuffer_scale);
        for &idx in windows.iter().chain(&tooltips) {
            data.add_list(&this.windows[idx].draw_list);
        }
        data.add_list(&this.overlay_draw_list);
        data.valid = true;
        data
    }

    fn collect_window_lists(&self, out: &mut Vec<WindowIdx>, idx: WindowIdx) {
        out.push(idx);
        for &child in &self.windows[idx].dc.child_windows {
            if self.windows[child].is_active_and_visible() {
                self.collect_window_lists(out, child);
            }
        }
    }

    /// Returns true if the host should keep mouse input away from the
    /// application: the mouse is over a window, an item is held, or a popup
    /// is open.
    #[must_use]
    pub fn want_capture_mouse(&self) -> bool {
        self.hovered_window.is_some() || self.active_id.is_some() || !self.open_popup_stack.is_empty()
    }

    /// Returns true if an item driven by the keyboard is active.
    #[must_use]
    pub fn want_capture_keyboard(&self) -> bool {
        self.active_id.is_some() && self.active_id_source == InputSource::Nav
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{frame, test_context};

    #[test]
    fn test_implicit_window_hidden_when_unused() {
        let mut ctx = test_context();
        frame(&mut ctx, |_| {});
        let debug = ctx.window(IMPLICIT_WINDOW_NAME).map(|w| w.is_active());
        assert_eq!(debug, Some(false));
    }

    #[test]
    fn test_implicit_window_kept_when_written() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| ctx.text_unformatted("hello"));
        assert_eq!(ctx.window(IMPLICIT_WINDOW_NAME).map(|w| w.is_active()), Some(true));
    }

    #[test]
    #[should_panic(expected = "missing end()")]
    fn test_unbalanced_begin_panics_at_end_frame() {
        let mut ctx = test_context();
        ctx.new_frame();
        ctx.begin("Open", WindowFlags::empty());
        ctx.end_frame();
    }

    #[test]
    #[should_panic(expected = "called twice")]
    fn test_double_new_frame_panics() {
        let mut ctx = test_context();
        ctx.new_frame();
        ctx.new_frame();
    }

    #[test]
    fn test_render_orders_children_after_parent() {
        let mut ctx = test_context();
        for frame_no in 0..3 {
            ctx.new_frame();
            ctx.begin("Parent", WindowFlags::empty());
            ctx.text_unformatted("p");
            ctx.begin_child("kid", Vec2::new(100.0, 50.0), true, WindowFlags::empty());
            ctx.text_unformatted("c");
            ctx.end_child();
            ctx.end();
            let data = ctx.render();
            let names: Vec<_> = data.cmd_lists.iter().map(|l| l.owner_name().to_owned()).collect();
            let parent = names.iter().position(|n| n == "Parent");
            let child = names.iter().position(|n| n.starts_with("Parent/kid_"));
            if frame_no == 2 {
                let (p, c) = (parent.expect("parent list"), child.expect("child list"));
                assert!(p < c, "child rendered before its parent: {names:?}");
            }
        }
    }

    #[test]
    fn test_click_on_empty_window_area_focuses_and_moves() {
        let mut ctx = test_context();
        for _ in 0..3 {
            frame(&mut ctx, |ctx| {
                ctx.set_next_window_pos(Vec2::new(100.0, 100.0), Cond::FIRST_USE_EVER, Vec2::ZERO);
                ctx.set_next_window_size(Vec2::new(200.0, 200.0), Cond::FIRST_USE_EVER);
                ctx.begin("A", WindowFlags::empty());
                ctx.end();
            });
        }
        ctx.input_mut().mouse_pos = Vec2::new(150.0, 150.0);
        frame(&mut ctx, |ctx| {
            ctx.begin("A", WindowFlags::empty());
            ctx.end();
        });
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        frame(&mut ctx, |ctx| {
            ctx.begin("A", WindowFlags::empty());
            ctx.end();
        });
        assert_eq!(ctx.focused_window_name(), Some("A"));

        ctx.input_mut().mouse_pos = Vec2::new(170.0, 160.0);
        frame(&mut ctx, |ctx| {
            ctx.begin("A", WindowFlags::empty());
            ctx.end();
        });
        assert_eq!(ctx.window("A").map(|w| w.pos()), Some(Vec2::new(120.0, 110.0)));
    }
}
