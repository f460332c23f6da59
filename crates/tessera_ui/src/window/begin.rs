//! `begin` / `end` and child windows.

use std::sync::Arc;

use tessera_core::{Rect, Vec2};
use tessera_draw::Corners;
use tracing::debug;

use super::{Dir, Window, WindowIdx};
use crate::config::StyleColor;
use crate::context::{Context, FramePhase, WindowStackEntry};
use crate::flags::{Cond, ItemFlags, ItemStatusFlags, WindowFlags};
use crate::id::Id;
use crate::input::MouseButton;

/// Everything `begin` decides before drawing the frame decorations.
struct BeginState {
    just_activated: bool,
    pos_set_by_api: bool,
    size_x_set_by_api: bool,
    size_y_set_by_api: bool,
}

impl Context {
    fn create_window(&mut self, name: &str, flags: WindowFlags) -> WindowIdx {
        let idx = self.windows.len();
        let mut w = Window::new(idx, name, Arc::clone(&self.shared_data));
        w.flags = flags;

        if !flags.contains(WindowFlags::NO_SAVED_SETTINGS) {
            if let Some(saved) = self.settings.find(w.id) {
                w.set_condition_allow_flags(Cond::FIRST_USE_EVER, false);
                w.set_pos(saved.pos);
                if saved.size.x > 0.0 && saved.size.y > 0.0 {
                    w.size_full = saved.size.floor();
                    w.size = w.size_full;
                }
                w.collapsed = saved.collapsed;
            }
        }
        w.dc.cursor_start_pos = w.pos;
        w.dc.cursor_max_pos = w.pos;
        w.size_full_at_last_begin = w.size_full;

        if flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) {
            w.auto_fit_frames = [2, 2];
            w.auto_fit_only_grows = false;
        } else {
            if w.size.x <= 0.0 {
                w.auto_fit_frames[0] = 2;
            }
            if w.size.y <= 0.0 {
                w.auto_fit_frames[1] = 2;
            }
            w.auto_fit_only_grows = w.auto_fit_frames[0] > 0 || w.auto_fit_frames[1] > 0;
        }

        debug!(name, id = %w.id, "window created");
        self.windows_by_id.insert(w.id, idx);
        if flags.contains(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS) {
            self.window_order.insert(0, idx);
        } else {
            self.window_order.push(idx);
        }
        self.windows.push(w);
        idx
    }

    /// Pushes a window onto the stack and starts appending to it.
    ///
    /// Returns `false` when the window is collapsed or fully clipped, in
    /// which case the caller may skip its contents. [`Context::end`] must be
    /// called either way.
    ///
    /// # Panics
    ///
    /// Panics outside `new_frame`/`render`, or if `name` is empty.
    pub fn begin(&mut self, name: &str, flags: WindowFlags) -> bool {
        assert!(!name.is_empty(), "window name cannot be empty");
        assert!(
            self.phase == FramePhase::InFrame,
            "begin('{name}') called outside new_frame()/render()"
        );

        let idx = match self.find_window_by_name(name) {
            Some(idx) => idx,
            None => self.create_window(name, flags),
        };

        let frame = self.frame_count;
        let first_begin = self.windows[idx].last_frame_active != Some(frame);
        let flags = if first_begin {
            let mut f = flags;
            if f.contains(WindowFlags::NO_INPUTS) {
                f |= WindowFlags::NO_MOVE | WindowFlags::NO_RESIZE;
            }
            self.windows[idx].flags = f;
            f
        } else {
            self.windows[idx].flags
        };

        let parent_in_stack = self.window_stack.top().map(|e| e.window);
        let parent = if first_begin {
            if flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::POPUP) {
                parent_in_stack
            } else {
                None
            }
        } else {
            self.windows[idx].parent
        };
        assert!(
            parent.is_some() || !flags.contains(WindowFlags::CHILD_WINDOW),
            "child window '{name}' has no parent"
        );

        let mut just_activated = self.windows[idx].last_frame_active.map_or(true, |f| f + 1 < frame);
        if flags.contains(WindowFlags::POPUP) {
            let level = self.begin_popup_stack.len();
            let popup_ref = match self.open_popup_stack.get_mut(level) {
                Some(r) => r,
                None => panic!("popup window '{name}' begun without a matching open_popup"),
            };
            just_activated |= self.windows[idx].popup_id != popup_ref.popup_id;
            just_activated |= popup_ref.window != Some(idx);
            popup_ref.window = Some(idx);
            let popup_ref = popup_ref.clone();
            self.windows[idx].popup_id = popup_ref.popup_id;
            self.begin_popup_stack.push(popup_ref);
        }

        let just_appearing_after_hidden = self.windows[idx].hidden_frames == 1;
        let appearing = just_activated || just_appearing_after_hidden;
        {
            let w = &mut self.windows[idx];
            w.appearing = appearing;
            if appearing {
                w.set_condition_allow_flags(Cond::APPEARING, true);
            }
        }
        self.current_window = Some(idx);

        let state = self.apply_next_window_data(idx, first_begin, just_activated);
        if appearing {
            self.windows[idx].set_condition_allow_flags(Cond::APPEARING, false);
        }

        if first_begin {
            self.begin_first_of_frame(idx, parent, &state, just_appearing_after_hidden);
        }

        let inner_clip = self.windows[idx].inner_clip_rect;
        self.push_clip_rect(inner_clip.min, inner_clip.max, true);

        let w = &mut self.windows[idx];
        if first_begin {
            w.write_accessed = false;
        }
        w.begin_count += 1;
        self.next_window_data.clear();

        if first_begin {
            if let (true, Some(p)) = (flags.contains(WindowFlags::CHILD_WINDOW), parent) {
                let parent_collapsed = self.windows[p].collapsed;
                let w = &mut self.windows[idx];
                w.collapsed = parent_collapsed;
                if !flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) && w.auto_fit_frames == [0, 0] {
                    w.collapsed |= w.outer_rect_clipped.min.x >= w.outer_rect_clipped.max.x
                        || w.outer_rect_clipped.min.y >= w.outer_rect_clipped.max.y;
                }
                if w.collapsed {
                    w.active = false;
                }
            }
            if self.style.alpha <= 0.0 {
                self.windows[idx].active = false;
            }
        }

        let w = &mut self.windows[idx];
        w.skip_items = (w.collapsed || !w.active) && w.auto_fit_frames == [0, 0];
        let entry = WindowStackEntry {
            window: idx,
            id_mark: w.id_stack.mark(),
            clip_mark: w.draw_list.clip_rect_depth(),
        };
        let visible = !w.skip_items;
        self.window_stack.push(entry);
        visible
    }

    /// Pops the current window.
    ///
    /// # Panics
    ///
    /// Panics without a matching `begin`, or if ids or clip rects pushed
    /// inside the window were not popped.
    pub fn end(&mut self) {
        assert!(self.window_stack.len() > 1, "end() without a matching begin()");
        self.end_window();
    }

    /// Pops the current window, including the implicit one.
    pub(crate) fn end_window(&mut self) {
        let idx = self.cur();
        if self.windows[idx].dc.columns_set.is_some() {
            self.end_columns();
        }

        let entry = self.window_stack.pop();
        debug_assert_eq!(entry.window, idx);
        {
            let w = &self.windows[idx];
            w.id_stack.assert_at(entry.id_mark);
            assert!(
                w.draw_list.clip_rect_depth() == entry.clip_mark,
                "clip rect stack unbalanced in window '{}'",
                w.name
            );
            assert!(
                w.dc.group_stack.is_empty(),
                "begin_group() without end_group() in window '{}'",
                w.name
            );
        }
        self.pop_clip_rect();

        if self.windows[idx].flags.contains(WindowFlags::POPUP) {
            self.begin_popup_stack.pop();
        }
        self.current_window = self.window_stack.top().map(|e| e.window);
    }

    /// Consumes `set_next_window_*` overrides.
    fn apply_next_window_data(&mut self, idx: WindowIdx, first_begin: bool, just_activated: bool) -> BeginState {
        let nd = &self.next_window_data;
        let w = &mut self.windows[idx];
        let mut state = BeginState {
            just_activated,
            pos_set_by_api: false,
            size_x_set_by_api: false,
            size_y_set_by_api: false,
        };

        if !nd.pos_cond.is_empty() {
            state.pos_set_by_api = w.set_window_pos_allow_flags.intersects(nd.pos_cond);
            if state.pos_set_by_api && nd.pos_pivot_val.length_sq() > 0.000_01 {
                // Needs the final size, applied once the window is visible.
                w.set_window_pos_val = nd.pos_val;
                w.set_window_pos_pivot = nd.pos_pivot_val;
                w.set_window_pos_allow_flags &= !(Cond::ONCE | Cond::FIRST_USE_EVER | Cond::APPEARING);
            } else {
                w.set_pos_cond(nd.pos_val, nd.pos_cond);
            }
        }
        if !nd.size_cond.is_empty() {
            let allowed = w.set_window_size_allow_flags.intersects(nd.size_cond);
            state.size_x_set_by_api = allowed && nd.size_val.x > 0.0;
            state.size_y_set_by_api = allowed && nd.size_val.y > 0.0;
            w.set_size_cond(nd.size_val, nd.size_cond);
        }
        if !nd.content_size_cond.is_empty() {
            w.size_contents_explicit = nd.content_size_val;
        } else if first_begin {
            w.size_contents_explicit = Vec2::ZERO;
        }
        if !nd.collapsed_cond.is_empty() {
            w.set_collapsed_cond(nd.collapsed_val, nd.collapsed_cond);
        }
        state
    }

    /// Per-frame window setup: sizing, placement, scrolling, decorations
    /// and the layout cursor.
    #[allow(clippy::too_many_lines)]
    fn begin_first_of_frame(
        &mut self,
        idx: WindowIdx,
        parent: Option<WindowIdx>,
        state: &BeginState,
        just_appearing_after_hidden: bool,
    ) {
        let frame = self.frame_count;
        let flags = self.windows[idx].flags;
        let is_child = flags.contains(WindowFlags::CHILD_WINDOW);
        let is_popup = flags.contains(WindowFlags::POPUP);
        let is_modal = flags.contains(WindowFlags::MODAL);

        let (root, root_non_popup) = match parent {
            Some(p) => {
                let pw = &self.windows[p];
                let root = if is_child { pw.root } else { idx };
                let root_non_popup = if !is_modal && flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::POPUP) {
                    pw.root_non_popup
                } else {
                    idx
                };
                (root, root_non_popup)
            }
            None => (idx, idx),
        };

        let style = &self.style;
        let font_size = self.font_size;
        {
            let w = &mut self.windows[idx];
            w.active = true;
            w.begin_count = 0;
            w.begin_order_within_parent = 0;
            w.last_frame_active = Some(frame);
            w.id_stack.truncate(1);
            w.parent = parent;
            w.root = root;
            w.root_non_popup = root_non_popup;
            w.clip_rect = Rect::from_coords(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX);

            w.window_rounding = if is_child {
                style.child_rounding
            } else if is_popup && !is_modal {
                style.popup_rounding
            } else {
                style.window_rounding
            };
            w.window_border_size = if is_child {
                style.child_border_size
            } else if is_popup && !is_modal {
                style.popup_border_size
            } else {
                style.window_border_size
            };
            w.window_padding = style.window_padding;
            if is_child
                && !flags.intersects(WindowFlags::ALWAYS_USE_WINDOW_PADDING | WindowFlags::POPUP)
                && w.window_border_size == 0.0
            {
                w.window_padding = Vec2::ZERO;
            }
            w.title_bar_height = if flags.contains(WindowFlags::NO_TITLE_BAR) {
                0.0
            } else {
                font_size + style.frame_padding.y * 2.0
            };
        }

        // Title bar double-click collapses.
        if flags.contains(WindowFlags::NO_TITLE_BAR) || flags.contains(WindowFlags::NO_COLLAPSE) {
            self.windows[idx].collapsed = false;
        } else {
            let title = self.windows[idx].title_bar_rect();
            if self.hovered_window == Some(idx)
                && title.contains(self.input.mouse_pos)
                && self.input.is_mouse_double_clicked(MouseButton::Left)
            {
                self.windows[idx].collapse_toggle_wanted = true;
            }
            if self.windows[idx].collapse_toggle_wanted {
                let w = &mut self.windows[idx];
                w.collapsed = !w.collapsed;
                if !flags.contains(WindowFlags::NO_SAVED_SETTINGS) {
                    self.mark_settings_dirty();
                }
                self.focus_window(Some(idx));
            }
        }
        self.windows[idx].collapse_toggle_wanted = false;

        {
            let w = &mut self.windows[idx];
            w.size_contents = w.calc_size_contents();
            if w.hidden_frames > 0 {
                w.hidden_frames -= 1;
            }
            if flags.intersects(WindowFlags::POPUP | WindowFlags::TOOLTIP) && state.just_activated {
                // Hidden for one frame so the auto-fit size is known before
                // the first visible frame.
                w.hidden_frames = 1;
                w.auto_pos_last_dir = None;
                if flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) {
                    if !state.size_x_set_by_api {
                        w.size.x = 0.0;
                        w.size_full.x = 0.0;
                    }
                    if !state.size_y_set_by_api {
                        w.size.y = 0.0;
                        w.size_full.y = 0.0;
                    }
                    w.size_contents = Vec2::ZERO;
                }
            }
        }
        if is_popup && state.just_activated && !state.pos_set_by_api {
            if let Some(r) = self.begin_popup_stack.top() {
                let open_pos = r.open_popup_pos;
                self.windows[idx].set_pos(open_pos);
            }
        }

        // Size.
        let size_contents = self.windows[idx].size_contents;
        let size_auto_fit = self.calc_size_auto_fit(idx, size_contents);
        let mut size_full_modified = Vec2::splat(f32::MAX);
        {
            let w = &mut self.windows[idx];
            if flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) && !w.collapsed {
                if !state.size_x_set_by_api {
                    w.size_full.x = size_auto_fit.x;
                    size_full_modified.x = size_auto_fit.x;
                }
                if !state.size_y_set_by_api {
                    w.size_full.y = size_auto_fit.y;
                    size_full_modified.y = size_auto_fit.y;
                }
            } else if w.auto_fit_frames[0] > 0 || w.auto_fit_frames[1] > 0 {
                if !state.size_x_set_by_api && w.auto_fit_frames[0] > 0 {
                    w.size_full.x = if w.auto_fit_only_grows {
                        w.size_full.x.max(size_auto_fit.x)
                    } else {
                        size_auto_fit.x
                    };
                    size_full_modified.x = w.size_full.x;
                }
                if !state.size_y_set_by_api && w.auto_fit_frames[1] > 0 {
                    w.size_full.y = if w.auto_fit_only_grows {
                        w.size_full.y.max(size_auto_fit.y)
                    } else {
                        size_auto_fit.y
                    };
                    size_full_modified.y = w.size_full.y;
                }
            }
        }
        if !self.windows[idx].collapsed
            && !flags.contains(WindowFlags::NO_SAVED_SETTINGS)
            && size_full_modified.x != f32::MAX
            && !flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE)
        {
            self.mark_settings_dirty();
        }
        let constrained = self.calc_size_after_constraint(idx, self.windows[idx].size_full);
        {
            let w = &mut self.windows[idx];
            w.size_full = constrained;
            w.size = if w.collapsed && !is_child {
                Vec2::new(w.size_full.x, w.title_bar_height)
            } else {
                w.size_full
            };
        }

        // Scrollbars.
        if !self.windows[idx].collapsed {
            let scrollbar_size = self.style.scrollbar_size;
            let w = &mut self.windows[idx];
            let size_x_for_scrollbars = if size_full_modified.x == f32::MAX {
                w.size_full_at_last_begin.x
            } else {
                w.size_full.x
            };
            let size_y_for_scrollbars = if size_full_modified.y == f32::MAX {
                w.size_full_at_last_begin.y
            } else {
                w.size_full.y
            };
            let allowed = !flags.contains(WindowFlags::NO_SCROLLBAR);
            w.scrollbar_y = flags.contains(WindowFlags::ALWAYS_VERTICAL_SCROLLBAR)
                || (w.size_contents.y > size_y_for_scrollbars && allowed);
            w.scrollbar_x = flags.contains(WindowFlags::ALWAYS_HORIZONTAL_SCROLLBAR)
                || (w.size_contents.x > size_x_for_scrollbars - if w.scrollbar_y { scrollbar_size } else { 0.0 }
                    && allowed
                    && flags.contains(WindowFlags::HORIZONTAL_SCROLLBAR));
            if w.scrollbar_x && !w.scrollbar_y {
                w.scrollbar_y = w.size_contents.y > size_y_for_scrollbars - scrollbar_size && allowed;
            }
            w.scrollbar_sizes = Vec2::new(
                if w.scrollbar_y { scrollbar_size } else { 0.0 },
                if w.scrollbar_x { scrollbar_size } else { 0.0 },
            );
        }

        // Position.
        if let (true, Some(p)) = (is_child, parent) {
            let order = self.windows[p].dc.child_windows.len();
            self.windows[p].dc.child_windows.push(idx);
            self.windows[idx].begin_order_within_parent = order;
            if !is_popup && !state.pos_set_by_api {
                let cursor = self.windows[p].dc.cursor_pos;
                self.windows[idx].set_pos(cursor);
            }
        }
        let pos_with_pivot = {
            let w = &self.windows[idx];
            w.set_window_pos_val.is_valid() && w.hidden_frames == 0
        };
        if pos_with_pivot {
            let safe = self.style.display_safe_area_padding;
            let w = &mut self.windows[idx];
            let target = (w.set_window_pos_val - w.size_full.mul_elem(w.set_window_pos_pivot)).max(safe);
            w.set_window_pos_val = Vec2::INVALID;
            w.set_pos(target);
        } else if flags.contains(WindowFlags::CHILD_MENU)
            || (is_popup && !state.pos_set_by_api && just_appearing_after_hidden)
            || (flags.contains(WindowFlags::TOOLTIP) && !state.pos_set_by_api)
        {
            let pos = self.find_best_window_pos_for_popup(idx);
            self.windows[idx].set_pos(pos);
        }

        let display = self.input.display_size;
        if !state.pos_set_by_api && !is_child && display.x > 0.0 && display.y > 0.0 {
            let w = &mut self.windows[idx];
            if w.auto_fit_frames == [0, 0] {
                let padding = self.style.display_window_padding.max(self.style.display_safe_area_padding);
                let clamped = ((w.pos_float + w.size).max(padding) - w.size).min(display - padding);
                w.set_pos(clamped);
            }
        }
        {
            let w = &mut self.windows[idx];
            let pos_float = w.pos_float;
            w.set_pos(pos_float);
            w.item_width_default = if w.size_full.x > 0.0
                && !flags.intersects(WindowFlags::TOOLTIP | WindowFlags::ALWAYS_AUTO_RESIZE)
            {
                (w.size.x * 0.65).trunc()
            } else {
                (font_size * 16.0).trunc()
            };
        }

        // Scrolling.
        {
            let w = &mut self.windows[idx];
            w.scroll = w.calc_next_scroll(&self.style);
            w.scroll_target = Vec2::splat(f32::MAX);
        }

        let want_focus = (state.just_activated
            && !flags.contains(WindowFlags::NO_FOCUS_ON_APPEARING)
            && (!flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::TOOLTIP) || is_popup))
            || !self.next_window_data.focus_cond.is_empty();
        if want_focus {
            self.focus_window(Some(idx));
        }

        let resize = self.update_manual_resize(idx, size_auto_fit);

        // Draw list.
        {
            let shared = Arc::clone(&self.shared_data);
            let texture = self.font_texture;
            let parent_clip = parent.map(|p| self.windows[p].clip_rect);
            let w = &mut self.windows[idx];
            w.draw_list.reset_for_new_frame(shared);
            w.draw_list.push_texture_id(texture);
            match parent_clip {
                Some(clip) if is_child && !is_popup => w.draw_list.push_clip_rect(clip.min, clip.max, true),
                _ => w.draw_list.push_clip_rect(Vec2::ZERO, display, true),
            }
            w.clip_rect = w.draw_list.current_clip_rect();
        }

        if is_modal && self.front_most_modal() == Some(idx) {
            let col = self.style.color_u32(StyleColor::ModalWindowDarkening, 1.0);
            self.windows[idx]
                .draw_list
                .add_rect_filled(Vec2::ZERO, display, col, 0.0, Corners::ALL);
        }

        let title_highlight = want_focus
            || self
                .nav_window
                .is_some_and(|n| self.windows[n].root_non_popup == self.windows[idx].root_non_popup);
        self.render_window_decorations(idx, title_highlight, &resize);

        // Layout.
        {
            let parent_item_flags = parent.map_or(ItemFlags::empty(), |p| self.windows[p].dc.item_flags);
            let w = &mut self.windows[idx];
            w.size_full_at_last_begin = w.size_full;
            let content_w = if w.size_contents_explicit.x == 0.0 {
                w.size.x - w.scrollbar_sizes.x
            } else {
                w.size_contents_explicit.x
            };
            let content_h = if w.size_contents_explicit.y == 0.0 {
                w.size.y - w.scrollbar_sizes.y
            } else {
                w.size_contents_explicit.y
            };
            w.contents_region_rect = Rect::from_coords(
                -w.scroll.x + w.window_padding.x,
                -w.scroll.y + w.window_padding.y + w.title_bar_height,
                -w.scroll.x - w.window_padding.x + content_w,
                -w.scroll.y - w.window_padding.y + content_h,
            );
            w.reset_layout();
            w.dc.item_flags = parent_item_flags;
            for frames in &mut w.auto_fit_frames {
                *frames = frames.saturating_sub(1);
            }
        }

        if !flags.contains(WindowFlags::NO_TITLE_BAR) {
            self.render_title_bar_contents(idx);
        }

        let w = &mut self.windows[idx];
        w.outer_rect_clipped = w.rect();
        w.outer_rect_clipped.clip_with(&w.clip_rect);

        let title = w.title_bar_rect();
        let border = w.window_border_size;
        let inner_top_pad = if flags.contains(WindowFlags::NO_TITLE_BAR) {
            border
        } else {
            self.style.frame_border_size
        };
        w.inner_main_rect = Rect::from_coords(
            title.min.x + border,
            title.max.y + inner_top_pad,
            w.pos.x + w.size.x - w.scrollbar_sizes.x - border,
            w.pos.y + w.size.y - w.scrollbar_sizes.y - border,
        );
        let pad_x = (w.window_padding.x * 0.5 - border).floor().max(0.0);
        w.inner_clip_rect = Rect::from_coords(
            (0.5 + w.inner_main_rect.min.x + pad_x).floor(),
            (0.5 + w.inner_main_rect.min.y).floor(),
            (0.5 + w.inner_main_rect.max.x - pad_x).floor(),
            (0.5 + w.inner_main_rect.max.y).floor(),
        );

        w.dc.last_item_id = w.move_id;
        w.dc.last_item_rect = title;
        w.dc.last_item_status_flags = if title.contains(self.input.mouse_pos) {
            ItemStatusFlags::HOVERED_RECT
        } else {
            ItemStatusFlags::empty()
        };
    }
}

impl Context {
    /// Size that fits `size_contents`, bounded by the display and growing
    /// to make room for scrollbars the fit itself would cause.
    pub(crate) fn calc_size_auto_fit(&self, idx: WindowIdx, size_contents: Vec2) -> Vec2 {
        let w = &self.windows[idx];
        let style = &self.style;
        if w.flags.contains(WindowFlags::TOOLTIP) {
            return size_contents;
        }
        let max = style
            .window_min_size
            .max(self.input.display_size - style.display_safe_area_padding * 2.0);
        let mut fit = size_contents.clamp(style.window_min_size, max);
        let constrained = self.calc_size_after_constraint(idx, fit);
        let scrollbars_allowed = !w.flags.contains(WindowFlags::NO_SCROLLBAR);
        if constrained.x < size_contents.x && scrollbars_allowed && w.flags.contains(WindowFlags::HORIZONTAL_SCROLLBAR) {
            fit.y += style.scrollbar_size;
        }
        if constrained.y < size_contents.y && scrollbars_allowed {
            fit.x += style.scrollbar_size;
        }
        fit
    }

    /// Applies the user size constraint and the minimum window size.
    pub(crate) fn calc_size_after_constraint(&self, idx: WindowIdx, mut new_size: Vec2) -> Vec2 {
        let w = &self.windows[idx];
        let nd = &self.next_window_data;
        if !nd.size_constraint_cond.is_empty() {
            let cr = nd.size_constraint_rect;
            new_size.x = if cr.min.x >= 0.0 && cr.max.x >= 0.0 {
                new_size.x.max(cr.min.x).min(cr.max.x)
            } else {
                w.size_full.x
            };
            new_size.y = if cr.min.y >= 0.0 && cr.max.y >= 0.0 {
                new_size.y.max(cr.min.y).min(cr.max.y)
            } else {
                w.size_full.y
            };
            if let Some(callback) = &nd.size_callback {
                new_size = callback(&super::SizeCallbackData {
                    pos: w.pos,
                    current_size: w.size_full,
                    desired_size: new_size,
                });
            }
        }
        if !w.flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::ALWAYS_AUTO_RESIZE) {
            new_size = new_size.max(self.style.window_min_size);
            new_size.y = new_size.y.max(w.title_bar_height + (w.window_rounding - 1.0).max(0.0));
        }
        new_size
    }

    /// Display rect minus the safe-area padding.
    pub(crate) fn window_allowed_extent_rect(&self) -> Rect {
        let padding = self.style.display_safe_area_padding;
        let screen = Rect::new(Vec2::ZERO, self.input.display_size);
        let shrink_x = if screen.width() > padding.x * 2.0 { -padding.x } else { 0.0 };
        let shrink_y = if screen.height() > padding.y * 2.0 { -padding.y } else { 0.0 };
        screen.expand_xy(Vec2::new(shrink_x, shrink_y))
    }

    /// Places a popup, menu or tooltip next to whatever spawned it without
    /// covering it.
    fn find_best_window_pos_for_popup(&mut self, idx: WindowIdx) -> Vec2 {
        let outer = self.window_allowed_extent_rect();
        let w = &self.windows[idx];
        let (ref_pos, avoid) = if w.flags.contains(WindowFlags::CHILD_MENU) {
            let Some(p) = w.parent else { return w.pos_float };
            let pw = &self.windows[p];
            let overlap = self.style.item_spacing.x;
            let avoid = Rect::from_coords(
                pw.pos.x + overlap,
                -f32::MAX,
                pw.pos.x + pw.size.x - overlap - pw.scrollbar_sizes.x,
                f32::MAX,
            );
            (w.pos_float, avoid)
        } else if w.flags.contains(WindowFlags::POPUP) {
            (w.pos_float, Rect::new(w.pos - Vec2::ONE, w.pos + Vec2::ONE))
        } else if w.flags.contains(WindowFlags::TOOLTIP) {
            let m = self.input.mouse_pos;
            (m, Rect::from_coords(m.x - 16.0, m.y - 8.0, m.x + 24.0, m.y + 24.0))
        } else {
            return w.pos_float;
        };

        let size = w.size;
        let (pos, dir) = find_best_pos_avoiding(ref_pos, size, w.auto_pos_last_dir, &outer, &avoid);
        let is_tooltip = w.flags.contains(WindowFlags::TOOLTIP);
        self.windows[idx].auto_pos_last_dir = dir;
        if is_tooltip && dir.is_none() {
            ref_pos + Vec2::splat(2.0)
        } else {
            pos
        }
    }

    fn render_window_decorations(&mut self, idx: WindowIdx, title_highlight: bool, resize: &super::resize::ResizeResult) {
        let (flags, pos, size, rounding, border, title, title_h) = {
            let w = &self.windows[idx];
            (
                w.flags,
                w.pos,
                w.size,
                w.window_rounding,
                w.window_border_size,
                w.title_bar_rect(),
                w.title_bar_height,
            )
        };

        if self.windows[idx].collapsed {
            let col = self.col(StyleColor::TitleBgCollapsed);
            self.render_frame(title.min, title.max, col, true, rounding);
            return;
        }

        let bg = if flags.intersects(WindowFlags::TOOLTIP | WindowFlags::POPUP) {
            StyleColor::PopupBg
        } else if flags.contains(WindowFlags::CHILD_WINDOW) {
            StyleColor::ChildBg
        } else {
            StyleColor::WindowBg
        };
        let bg_col = self.col(bg);
        let title_col = self.col(if title_highlight {
            StyleColor::TitleBgActive
        } else {
            StyleColor::TitleBg
        });
        let has_title = !flags.contains(WindowFlags::NO_TITLE_BAR);
        {
            let list = &mut self.windows[idx].draw_list;
            let bg_corners = if has_title { Corners::BOT } else { Corners::ALL };
            list.add_rect_filled(pos + Vec2::new(0.0, title_h), pos + size, bg_col, rounding, bg_corners);
            if has_title {
                list.add_rect_filled(title.min, title.max, title_col, rounding, Corners::TOP);
            }
        }

        if self.windows[idx].scrollbar_x {
            self.scrollbar(super::Axis::X);
        }
        if self.windows[idx].scrollbar_y {
            self.scrollbar(super::Axis::Y);
        }

        self.render_resize_grips(idx, resize);

        let border_col = self.col(StyleColor::Border);
        let frame_border = self.style.frame_border_size;
        let list = &mut self.windows[idx].draw_list;
        if border > 0.0 {
            list.add_rect(pos, pos + size, border_col, rounding, Corners::ALL, border);
        }
        if has_title && frame_border > 0.0 {
            list.add_line(
                title.bottom_left() + Vec2::new(border, -1.0),
                title.max + Vec2::new(-border, -1.0),
                border_col,
                frame_border,
            );
        }
        self.render_held_border(idx, resize);
    }

    fn render_title_bar_contents(&mut self, idx: WindowIdx) {
        let (flags, pos, size, collapsed, title, name) = {
            let w = &self.windows[idx];
            (w.flags, w.pos, w.size, w.collapsed, w.title_bar_rect(), w.name.clone())
        };
        let fp = self.style.frame_padding;
        if !flags.contains(WindowFlags::NO_COLLAPSE) {
            let dir = if collapsed { Dir::Right } else { Dir::Down };
            self.render_arrow(pos + fp, dir, 1.0);
        }

        let text_size = self.calc_text_size(&name, true);
        let pad_left = if flags.contains(WindowFlags::NO_COLLAPSE) {
            fp.x
        } else {
            fp.x + self.font_size + self.style.item_inner_spacing.x
        };
        let align = self.style.window_title_align;
        let mut pad_right = fp.x;
        if align.x > 0.0 {
            pad_right += (pad_left - pad_right) * align.x;
        }
        let text_r = Rect::from_coords(title.min.x + pad_left, title.min.y, title.max.x - pad_right, title.max.y);
        let mut clip = text_r;
        clip.max.x = pos.x + size.x - fp.x;
        self.render_text_clipped(text_r.min, text_r.max, &name, Some(text_size), align, Some(&clip));
    }

    /// Starts a child window inside the current one. A non-positive size
    /// axis means "available space minus that much"; exactly zero also
    /// auto-fits that axis to the child's content.
    pub fn begin_child(&mut self, str_id: &str, size: Vec2, border: bool, flags: WindowFlags) -> bool {
        let id = self.get_id(str_id);
        self.begin_child_ex(str_id, id, size, border, flags)
    }

    /// [`Context::begin_child`] keyed by an explicit id.
    pub fn begin_child_id(&mut self, id: Id, size: Vec2, border: bool, flags: WindowFlags) -> bool {
        self.begin_child_ex("", id, size, border, flags)
    }

    fn begin_child_ex(&mut self, name: &str, id: Id, size_arg: Vec2, border: bool, extra_flags: WindowFlags) -> bool {
        let parent = self.cur();
        let flags = WindowFlags::NO_TITLE_BAR
            | WindowFlags::NO_RESIZE
            | WindowFlags::NO_SAVED_SETTINGS
            | WindowFlags::CHILD_WINDOW
            | (self.windows[parent].flags & WindowFlags::NO_MOVE)
            | extra_flags;

        let avail = self.content_region_avail();
        let mut size = size_arg.floor();
        let auto_fit_axes = [size.x == 0.0, size.y == 0.0];
        if size.x <= 0.0 {
            size.x = (avail.x + size.x).max(4.0);
        }
        if size.y <= 0.0 {
            size.y = (avail.y + size.y).max(4.0);
        }
        self.set_next_window_size(size, Cond::ALWAYS);

        let parent_name = &self.windows[parent].name;
        let title = if name.is_empty() {
            format!("{parent_name}/{:08X}", id.0)
        } else {
            format!("{parent_name}/{name}_{:08X}", id.0)
        };

        let backup_border = self.style.child_border_size;
        if !border {
            self.style.child_border_size = 0.0;
        }
        let visible = self.begin(&title, flags);
        self.style.child_border_size = backup_border;

        let child = self.cw_mut();
        child.child_id = id;
        child.auto_fit_child_axes = auto_fit_axes;
        visible
    }

    /// Closes a child window and lays it out as one item in its parent.
    ///
    /// # Panics
    ///
    /// Panics if the current window is not a child window.
    pub fn end_child(&mut self) {
        let w = self.cw();
        assert!(
            w.flags.contains(WindowFlags::CHILD_WINDOW),
            "end_child() called on non-child window '{}'",
            w.name
        );
        if w.begin_count > 1 {
            self.end();
            return;
        }
        let mut size = w.size;
        if w.auto_fit_child_axes[0] {
            size.x = size.x.max(4.0);
        }
        if w.auto_fit_child_axes[1] {
            size.y = size.y.max(4.0);
        }
        self.end();

        let bb = Rect::from_pos_size(self.cw().dc.cursor_pos, size);
        self.item_size(size, 0.0);
        self.item_add(bb, Id::NONE);
    }
}

/// Tries each side of `avoid` in turn, starting with `last_dir`, and
/// returns the first position where `size` fits inside `outer`. Falls back
/// to clamping `ref_pos` into `outer`.
fn find_best_pos_avoiding(
    ref_pos: Vec2,
    size: Vec2,
    last_dir: Option<Dir>,
    outer: &Rect,
    avoid: &Rect,
) -> (Vec2, Option<Dir>) {
    const PREFERRED: [Dir; 4] = [Dir::Right, Dir::Down, Dir::Up, Dir::Left];

    let base = ref_pos.max(outer.min).min(outer.max - size);
    let candidates = last_dir.into_iter().chain(PREFERRED.into_iter().filter(|&d| Some(d) != last_dir));
    for dir in candidates {
        let avail_w = (if dir == Dir::Left { avoid.min.x } else { outer.max.x })
            - (if dir == Dir::Right { avoid.max.x } else { outer.min.x });
        let avail_h = (if dir == Dir::Up { avoid.min.y } else { outer.max.y })
            - (if dir == Dir::Down { avoid.max.y } else { outer.min.y });
        if avail_w < size.x || avail_h < size.y {
            continue;
        }
        let x = match dir {
            Dir::Left => avoid.min.x - size.x,
            Dir::Right => avoid.max.x,
            _ => base.x,
        };
        let y = match dir {
            Dir::Up => avoid.min.y - size.y,
            Dir::Down => avoid.max.y,
            _ => base.y,
        };
        return (Vec2::new(x, y), Some(dir));
    }

    let pos = Vec2::new(
        ((ref_pos.x + size.x).min(outer.max.x) - size.x).max(outer.min.x),
        ((ref_pos.y + size.y).min(outer.max.y) - size.y).max(outer.min.y),
    );
    (pos, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_goes_right_of_avoid_rect_when_room() {
        let outer = Rect::from_coords(0.0, 0.0, 800.0, 600.0);
        let avoid = Rect::from_coords(99.0, 99.0, 101.0, 101.0);
        let (pos, dir) = find_best_pos_avoiding(Vec2::new(100.0, 100.0), Vec2::new(50.0, 50.0), None, &outer, &avoid);
        assert_eq!(dir, Some(Dir::Right));
        assert_eq!(pos, Vec2::new(101.0, 100.0));
    }

    #[test]
    fn test_popup_flips_left_at_right_edge() {
        let outer = Rect::from_coords(0.0, 0.0, 800.0, 600.0);
        // Full-height avoid band leaves only the left side.
        let avoid = Rect::from_coords(700.0, -f32::MAX, 790.0, f32::MAX);
        let (pos, dir) = find_best_pos_avoiding(Vec2::new(700.0, 10.0), Vec2::new(80.0, 40.0), None, &outer, &avoid);
        assert_eq!(dir, Some(Dir::Left));
        assert_eq!(pos.x, 620.0);
    }

    #[test]
    fn test_last_direction_is_tried_first() {
        let outer = Rect::from_coords(0.0, 0.0, 800.0, 600.0);
        let avoid = Rect::from_coords(399.0, 299.0, 401.0, 301.0);
        let (_, dir) = find_best_pos_avoiding(Vec2::new(400.0, 300.0), Vec2::splat(20.0), Some(Dir::Up), &outer, &avoid);
        assert_eq!(dir, Some(Dir::Up));
    }

    #[test]
    fn test_no_room_clamps_into_outer() {
        let outer = Rect::from_coords(0.0, 0.0, 100.0, 100.0);
        let avoid = Rect::from_coords(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX);
        let (pos, dir) = find_best_pos_avoiding(Vec2::new(90.0, 90.0), Vec2::splat(30.0), None, &outer, &avoid);
        assert_eq!(dir, None);
        assert_eq!(pos, Vec2::new(70.0, 70.0));
    }
}
