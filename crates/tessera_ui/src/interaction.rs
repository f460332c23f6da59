//! # Interaction State Machine
//!
//! Three identities drive every widget:
//!
//! - `hovered_id`: claimed by the first item under the mouse this frame.
//! - `active_id`: the item being held. It stays active while its source
//!   (mouse button or `Activate` nav input) is down, wherever the cursor
//!   goes, and is dropped the frame after nobody keeps it alive.
//! - `nav_id`: the item with keyboard focus; follows clicks.
//!
//! All setters are last-writer-wins and idempotent.

use tessera_core::{Rect, Vec2};
use tracing::trace;

use crate::context::{Context, InputSource};
use crate::flags::{ButtonFlags, FocusedFlags, HoveredFlags, ItemFlags, ItemStatusFlags, WindowFlags};
use crate::id::Id;
use crate::input::{MouseButton, NavInput};
use crate::window::WindowIdx;

impl Context {
    /// Makes `id` the active item, owned by `window`.
    pub(crate) fn set_active_id(&mut self, id: Id, window: Option<WindowIdx>) {
        self.active_id_is_just_activated = self.active_id != id;
        if self.active_id_is_just_activated {
            self.active_id_timer = 0.0;
            trace!(from = %self.active_id, to = %id, "active id changed");
        }
        self.active_id = id;
        self.active_id_allow_overlap = false;
        self.active_id_window = window;
        if id.is_some() {
            self.active_id_is_alive = id;
            self.active_id_source = if self.nav_activate_id == id {
                InputSource::Nav
            } else {
                InputSource::Mouse
            };
        } else {
            self.active_id_source = InputSource::None;
        }
    }

    /// Drops the active item.
    pub(crate) fn clear_active_id(&mut self) {
        self.set_active_id(Id::NONE, None);
    }

    /// Keeps `id` active through this frame's aging.
    pub(crate) fn keep_alive_id(&mut self, id: Id) {
        if self.active_id == id {
            self.active_id_is_alive = id;
        }
    }

    pub(crate) fn set_hovered_id(&mut self, id: Id) {
        self.hovered_id = id;
        self.hovered_id_allow_overlap = false;
    }

    /// Moves keyboard focus to `id` and remembers it for `window`.
    pub(crate) fn set_focus_id(&mut self, id: Id, window: WindowIdx) {
        self.nav_id = id;
        self.windows[window].nav_last_id = id;
    }

    /// Returns true if the mouse is inside `r`, clipped to the current
    /// window and grown by the touch padding.
    pub(crate) fn is_mouse_hovering_rect_clipped(&self, r: &Rect) -> bool {
        let mut clipped = *r;
        clipped.clip_with(&self.cw().clip_rect);
        clipped
            .expand_xy(self.style.touch_extra_padding)
            .contains(self.input.mouse_pos)
    }

    /// Returns true if the mouse is inside `r` (unclipped).
    #[must_use]
    pub fn is_mouse_hovering_rect(&self, min: Vec2, max: Vec2) -> bool {
        Rect::new(min, max)
            .expand_xy(self.style.touch_extra_padding)
            .contains(self.input.mouse_pos)
    }

    /// Returns false when a focused modal, or popup without
    /// `ALLOW_WHEN_BLOCKED_BY_POPUP`, belongs to another root.
    pub(crate) fn is_window_content_hoverable(&self, window: WindowIdx, flags: HoveredFlags) -> bool {
        let Some(nav) = self.nav_window else { return true };
        let focused_root = self.windows[nav].root;
        let fr = &self.windows[focused_root];
        if fr.was_active && focused_root != self.windows[window].root {
            if fr.flags.contains(WindowFlags::MODAL) {
                return false;
            }
            if fr.flags.contains(WindowFlags::POPUP) && !flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_POPUP) {
                return false;
            }
        }
        true
    }

    /// Claims `hovered_id` for `id` if it is under the mouse and nothing
    /// else owns the mouse.
    pub(crate) fn item_hoverable(&mut self, bb: &Rect, id: Id) -> bool {
        if id.is_none() {
            return false;
        }
        if self.hovered_id.is_some() && self.hovered_id != id && !self.hovered_id_allow_overlap {
            return false;
        }
        let window = self.cur();
        if self.hovered_window != Some(window) {
            return false;
        }
        if self.active_id.is_some() && self.active_id != id && !self.active_id_allow_overlap {
            return false;
        }
        if !self.is_mouse_hovering_rect_clipped(bb) {
            return false;
        }
        if !self.is_window_content_hoverable(window, HoveredFlags::empty()) {
            return false;
        }
        if self.windows[window].dc.item_flags.contains(ItemFlags::DISABLED) {
            return false;
        }
        self.set_hovered_id(id);
        true
    }

    /// Returns true if `bb` is outside the clip rect and `id` is not
    /// active.
    pub(crate) fn is_clipped_ex(&self, bb: &Rect, id: Id) -> bool {
        !bb.overlaps(&self.cw().clip_rect) && (id.is_none() || id != self.active_id)
    }

    /// Registers the last item. Returns false if it is clipped, in which
    /// case the caller should skip drawing and interaction.
    pub fn item_add(&mut self, bb: Rect, id: Id) -> bool {
        if id.is_some() {
            self.keep_alive_id(id);
        }
        let clipped = self.is_clipped_ex(&bb, id);
        let hovered_rect = self.is_mouse_hovering_rect_clipped(&bb);
        let dc = &mut self.cw_write().dc;
        dc.last_item_id = id;
        dc.last_item_rect = bb;
        dc.last_item_status_flags = ItemStatusFlags::empty();
        if clipped {
            return false;
        }
        if hovered_rect {
            dc.last_item_status_flags |= ItemStatusFlags::HOVERED_RECT;
        }
        true
    }

    /// The press/hold/release state machine shared by every clickable
    /// item. Returns `(hovered, held, pressed)`.
    #[allow(clippy::too_many_lines)]
    pub fn button_behavior(&mut self, bb: Rect, id: Id, flags: ButtonFlags) -> (bool, bool, bool) {
        let window = self.cur();
        let mut flags = flags;
        if flags.contains(ButtonFlags::DISABLED) {
            if self.active_id == id {
                self.clear_active_id();
            }
            return (false, false, false);
        }
        if !flags.intersects(
            ButtonFlags::PRESS_ON_CLICK_RELEASE
                | ButtonFlags::PRESS_ON_CLICK
                | ButtonFlags::PRESS_ON_RELEASE
                | ButtonFlags::PRESS_ON_DOUBLE_CLICK,
        ) {
            flags |= ButtonFlags::PRESS_ON_CLICK_RELEASE;
        }

        let flatten = flags.contains(ButtonFlags::FLATTEN_CHILDREN) && self.hovered_root_window == Some(window);
        let backup_hovered_window = self.hovered_window;
        if flatten {
            self.hovered_window = Some(window);
        }
        let mut pressed = false;
        let mut hovered = self.item_hoverable(&bb, id);
        if hovered
            && self.drag_drop.active
            && self.drag_drop.payload.source_id == id
            && !self.drag_drop.source_flags.contains(crate::flags::DragDropFlags::SOURCE_NO_DISABLE_HOVER)
        {
            hovered = false;
        }
        if flatten {
            self.hovered_window = backup_hovered_window;
        }
        if hovered
            && flags.contains(ButtonFlags::ALLOW_ITEM_OVERLAP)
            && self.hovered_id_previous_frame != id
            && self.hovered_id_previous_frame.is_some()
        {
            hovered = false;
        }

        let repeat_delay = self.io.key_repeat_delay;
        if hovered && (!flags.contains(ButtonFlags::NO_KEY_MODIFIERS) || !self.input.modifiers.any()) {
            let clicked = self.input.is_mouse_clicked(MouseButton::Left, false, &self.io);
            let focus_on_click = !flags.contains(ButtonFlags::NO_NAV_FOCUS);
            if flags.contains(ButtonFlags::PRESS_ON_CLICK_RELEASE) && clicked {
                self.set_active_id(id, Some(window));
                if focus_on_click {
                    self.set_focus_id(id, window);
                }
                self.focus_window(Some(window));
            }
            if (flags.contains(ButtonFlags::PRESS_ON_CLICK) && clicked)
                || (flags.contains(ButtonFlags::PRESS_ON_DOUBLE_CLICK)
                    && self.input.is_mouse_double_clicked(MouseButton::Left))
            {
                pressed = true;
                if flags.contains(ButtonFlags::NO_HOLDING) {
                    self.clear_active_id();
                } else {
                    self.set_active_id(id, Some(window));
                }
                if focus_on_click {
                    self.set_focus_id(id, window);
                }
                self.focus_window(Some(window));
            }
            if flags.contains(ButtonFlags::PRESS_ON_RELEASE) && self.input.is_mouse_released(MouseButton::Left) {
                // Repeat takes over from the release press.
                if !(flags.contains(ButtonFlags::REPEAT)
                    && self.input.mouse_down_duration_prev[MouseButton::Left.index()] >= repeat_delay)
                {
                    pressed = true;
                }
                self.clear_active_id();
            }
            if flags.contains(ButtonFlags::REPEAT)
                && self.active_id == id
                && self.input.mouse_down_duration(MouseButton::Left) > 0.0
                && self.input.is_mouse_clicked(MouseButton::Left, true, &self.io)
            {
                pressed = true;
            }
        }

        if self.nav_activate_down_id == id {
            let by_code = self.nav_activate_id == id;
            let by_input = if flags.contains(ButtonFlags::REPEAT) {
                self.input.is_nav_input_pressed(NavInput::Activate, true, &self.io)
            } else {
                self.nav_activate_pressed_id == id
            };
            if by_code || by_input {
                pressed = true;
            }
            if by_code || by_input || self.active_id == id {
                self.nav_activate_id = id;
                self.set_active_id(id, Some(window));
                if !flags.contains(ButtonFlags::NO_NAV_FOCUS) {
                    self.set_focus_id(id, window);
                }
            }
        }

        let mut held = false;
        if self.active_id == id {
            match self.active_id_source {
                InputSource::Mouse => {
                    if self.active_id_is_just_activated {
                        self.active_id_click_offset = self.input.mouse_pos - bb.min;
                    }
                    if self.input.is_mouse_down(MouseButton::Left) {
                        held = true;
                    } else {
                        if hovered
                            && flags.contains(ButtonFlags::PRESS_ON_CLICK_RELEASE)
                            && !(flags.contains(ButtonFlags::REPEAT)
                                && self.input.mouse_down_duration_prev[MouseButton::Left.index()] >= repeat_delay)
                            && !self.drag_drop.active
                        {
                            pressed = true;
                        }
                        self.clear_active_id();
                    }
                }
                InputSource::Nav => {
                    if self.nav_activate_down_id == id {
                        held = true;
                    } else {
                        self.clear_active_id();
                    }
                }
                InputSource::None => {}
            }
        }
        if self.active_id == id {
            self.keep_alive_id(id);
        }

        (hovered, held, pressed)
    }

    // ---------------------------------------------------------------------
    // Item queries
    // ---------------------------------------------------------------------

    /// Returns true if the last item is hovered and usable.
    #[must_use]
    pub fn is_item_hovered(&self, flags: HoveredFlags) -> bool {
        let window = self.cur();
        let w = &self.windows[window];
        if !w.dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT) {
            return false;
        }
        if self.hovered_root_window != Some(w.root) && !flags.contains(HoveredFlags::ALLOW_WHEN_OVERLAPPED) {
            return false;
        }
        if !flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM)
            && self.active_id.is_some()
            && self.active_id != w.dc.last_item_id
            && !self.active_id_allow_overlap
            && self.active_id != w.move_id
        {
            return false;
        }
        if !self.is_window_content_hoverable(window, flags) {
            return false;
        }
        if w.dc.item_flags.contains(ItemFlags::DISABLED) {
            return false;
        }
        // The title bar is the first item; once real items were submitted
        // it no longer stands in for them.
        !(w.dc.last_item_id == w.move_id && w.write_accessed)
    }

    /// Returns true if the last item is the active one.
    #[must_use]
    pub fn is_item_active(&self) -> bool {
        self.active_id.is_some() && self.cw().dc.last_item_id == self.active_id
    }

    /// Returns true if the last item has keyboard focus.
    #[must_use]
    pub fn is_item_focused(&self) -> bool {
        self.nav_id.is_some() && self.nav_window == self.current_window && self.nav_id == self.cw().dc.last_item_id
    }

    /// Returns true if the last item is hovered and `button` was clicked.
    #[must_use]
    pub fn is_item_clicked(&self, button: MouseButton) -> bool {
        self.is_mouse_clicked(button, false) && self.is_item_hovered(HoveredFlags::empty())
    }

    /// Returns true if the last item overlaps the clip rect.
    #[must_use]
    pub fn is_item_visible(&self) -> bool {
        let w = self.cw();
        w.clip_rect.overlaps(&w.dc.last_item_rect)
    }

    /// Returns true if any item is hovered now or was last frame.
    #[must_use]
    pub fn is_any_item_hovered(&self) -> bool {
        self.hovered_id.is_some() || self.hovered_id_previous_frame.is_some()
    }

    /// Returns true if any item is active.
    #[must_use]
    pub fn is_any_item_active(&self) -> bool {
        self.active_id.is_some()
    }

    /// Lets later items overlap the last one.
    pub fn set_item_allow_overlap(&mut self) {
        let last = self.cw().dc.last_item_id;
        if self.hovered_id == last {
            self.hovered_id_allow_overlap = true;
        }
        if self.active_id == last {
            self.active_id_allow_overlap = true;
        }
    }

    /// Rectangle of the last item.
    #[must_use]
    pub fn item_rect(&self) -> Rect {
        self.cw().dc.last_item_rect
    }

    /// Id of the last item.
    #[must_use]
    pub fn last_item_id(&self) -> Id {
        self.cw().dc.last_item_id
    }

    // ---------------------------------------------------------------------
    // Window queries
    // ---------------------------------------------------------------------

    /// Returns true if `window` is `parent` or nested inside it.
    pub(crate) fn is_window_child_of(&self, window: WindowIdx, parent: WindowIdx) -> bool {
        if self.windows[window].root == parent {
            return true;
        }
        let mut cursor = Some(window);
        while let Some(w) = cursor {
            if w == parent {
                return true;
            }
            cursor = self.windows[w].parent;
        }
        false
    }

    /// Returns true if the current window (per `flags`) is hovered and not
    /// blocked.
    #[must_use]
    pub fn is_window_hovered(&self, flags: HoveredFlags) -> bool {
        let Some(hovered) = self.hovered_window else { return false };
        if !flags.contains(HoveredFlags::ANY_WINDOW) {
            let cur = self.cur();
            let root = self.windows[cur].root;
            let ok = match (
                flags.contains(HoveredFlags::ROOT_WINDOW),
                flags.contains(HoveredFlags::CHILD_WINDOWS),
            ) {
                (true, true) => self.hovered_root_window == Some(root),
                (true, false) => hovered == root,
                (false, true) => self.is_window_child_of(hovered, cur),
                (false, false) => hovered == cur,
            };
            if !ok {
                return false;
            }
        }
        if !self.is_window_content_hoverable(hovered, flags) {
            return false;
        }
        flags.contains(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM)
            || self.active_id.is_none()
            || self.active_id_allow_overlap
            || self.active_id == self.windows[hovered].move_id
    }

    /// Returns true if the current window (per `flags`) has focus.
    #[must_use]
    pub fn is_window_focused(&self, flags: FocusedFlags) -> bool {
        if flags.contains(FocusedFlags::ANY_WINDOW) {
            return self.nav_window.is_some();
        }
        let cur = self.cur();
        let Some(nav) = self.nav_window else { return false };
        match (
            flags.contains(FocusedFlags::ROOT_WINDOW),
            flags.contains(FocusedFlags::CHILD_WINDOWS),
        ) {
            (true, true) => self.windows[nav].root == self.windows[cur].root,
            (true, false) => nav == self.windows[cur].root,
            (false, true) => self.is_window_child_of(nav, cur),
            (false, false) => nav == cur,
        }
    }

    /// Returns true if the current window was just shown.
    #[must_use]
    pub fn is_window_appearing(&self) -> bool {
        self.cw().appearing
    }

    /// Returns true if the current window is collapsed.
    #[must_use]
    pub fn is_window_collapsed(&self) -> bool {
        self.cw().collapsed
    }

    /// Position of the current window.
    #[must_use]
    pub fn window_pos(&self) -> Vec2 {
        self.cw().pos
    }

    /// Size of the current window.
    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        self.cw().size
    }
}
