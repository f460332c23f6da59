//! # Popups and Tooltips
//!
//! Popups are windows that exist only while their entry in the open-popup
//! stack exists. `open_popup` records the request; `begin_popup` each frame
//! shows the window for as long as the entry survives. An entry is dropped
//! by `close_current_popup`, by a click outside, or when a different popup
//! is opened at the same level.
//!
//! Menu-level popups share one window per depth (`##Menu_00`, `##Menu_01`,
//! ...). When the popup at a depth changes, the recycled window is hidden
//! for one frame while its new size is measured.

use tessera_core::Vec2;
use tracing::debug;

use crate::context::Context;
use crate::flags::{Cond, HoveredFlags, WindowFlags};
use crate::id::Id;
use crate::input::MouseButton;
use crate::window::WindowIdx;

/// One level of the popup stack.
#[derive(Debug, Clone)]
pub(crate) struct PopupRef {
    /// Id passed to `open_popup`.
    pub popup_id: Id,
    /// The window showing the popup, once it has been begun.
    pub window: Option<WindowIdx>,
    /// Window that was current when the popup was opened.
    pub parent_window: WindowIdx,
    pub open_frame_count: u64,
    /// Top of the parent's id stack when opened.
    pub open_parent_id: Id,
    /// Where the popup first appears.
    pub open_popup_pos: Vec2,
    pub open_mouse_pos: Vec2,
}

const POPUP_FLAGS: WindowFlags = WindowFlags::ALWAYS_AUTO_RESIZE
    .union(WindowFlags::NO_TITLE_BAR)
    .union(WindowFlags::NO_SAVED_SETTINGS);

const TOOLTIP_FLAGS: WindowFlags = WindowFlags::TOOLTIP
    .union(WindowFlags::NO_INPUTS)
    .union(WindowFlags::NO_TITLE_BAR)
    .union(WindowFlags::NO_MOVE)
    .union(WindowFlags::NO_RESIZE)
    .union(WindowFlags::NO_SAVED_SETTINGS)
    .union(WindowFlags::ALWAYS_AUTO_RESIZE);

impl Context {
    /// Marks the popup `str_id` of the current window as open.
    pub fn open_popup(&mut self, str_id: &str) {
        let id = self.get_id(str_id);
        self.open_popup_ex(id);
    }

    /// Opens popup `id` at the current popup depth, closing any deeper
    /// popups. Re-opening the same popup every frame keeps it open.
    pub fn open_popup_ex(&mut self, id: Id) {
        let parent = self.cur();
        let level = self.begin_popup_stack.len();
        let popup = PopupRef {
            popup_id: id,
            window: None,
            parent_window: parent,
            open_frame_count: self.frame_count,
            open_parent_id: self.windows[parent].id_stack.top().copied().unwrap_or(Id::NONE),
            open_popup_pos: self.input.mouse_pos,
            open_mouse_pos: self.input.mouse_pos,
        };
        if self.open_popup_stack.len() <= level {
            debug!(popup = %id, level, "popup opened");
            self.open_popup_stack.push(popup);
            return;
        }
        let frame = self.frame_count;
        let Some(existing) = self.open_popup_stack.get_mut(level) else { return };
        if existing.popup_id == id && existing.open_frame_count + 1 == frame {
            existing.open_frame_count = frame;
        } else {
            debug!(popup = %id, level, replaced = %existing.popup_id, "popup opened");
            self.open_popup_stack.truncate(level);
            self.open_popup_stack.push(popup);
        }
    }

    /// Returns true if popup `str_id` of the current window is open at the
    /// current depth.
    #[must_use]
    pub fn is_popup_open(&self, str_id: &str) -> bool {
        self.is_popup_open_id(self.get_id(str_id))
    }

    /// [`Context::is_popup_open`] by id.
    #[must_use]
    pub fn is_popup_open_id(&self, id: Id) -> bool {
        self.open_popup_stack
            .get(self.begin_popup_stack.len())
            .is_some_and(|p| p.popup_id == id)
    }

    fn begin_popup_ex(&mut self, id: Id, flags: WindowFlags) -> bool {
        if !self.is_popup_open_id(id) {
            self.next_window_data.clear();
            return false;
        }
        let name = if flags.contains(WindowFlags::CHILD_MENU) {
            format!("##Menu_{:02}", self.begin_popup_stack.len())
        } else {
            format!("##Popup_{:08x}", id.0)
        };
        let open = self.begin(&name, flags | WindowFlags::POPUP);
        if !open {
            self.end_popup();
        }
        open
    }

    /// Shows popup `str_id` if it is open. Call [`Context::end_popup`]
    /// only when this returns true.
    pub fn begin_popup(&mut self, str_id: &str, flags: WindowFlags) -> bool {
        if self.open_popup_stack.len() <= self.begin_popup_stack.len() {
            self.next_window_data.clear();
            return false;
        }
        let id = self.get_id(str_id);
        self.begin_popup_ex(id, flags | POPUP_FLAGS)
    }

    /// Shows a menu-level popup. All menus at one depth share a window.
    pub fn begin_menu_popup(&mut self, id: Id, flags: WindowFlags) -> bool {
        self.begin_popup_ex(id, flags | POPUP_FLAGS | WindowFlags::CHILD_MENU)
    }

    /// Opens popup `str_id` when the last item is right-released (or
    /// `button`), then shows it like [`Context::begin_popup`].
    pub fn begin_popup_context_item(&mut self, str_id: Option<&str>, button: MouseButton) -> bool {
        let id = match str_id {
            Some(s) => self.get_id(s),
            None => self.cw().dc.last_item_id,
        };
        assert!(id.is_some(), "begin_popup_context_item() on an item without id needs a str_id");
        if self.is_mouse_released(button) && self.is_item_hovered(HoveredFlags::ALLOW_WHEN_BLOCKED_BY_POPUP) {
            self.open_popup_ex(id);
        }
        self.begin_popup_ex(id, POPUP_FLAGS)
    }

    /// Shows modal popup `name` if it is open. Modals dim everything behind
    /// them and block input to other windows. Centered on the display the
    /// first time unless a position was queued.
    pub fn begin_popup_modal(&mut self, name: &str, flags: WindowFlags) -> bool {
        let id = self.get_id(name);
        if !self.is_popup_open_id(id) {
            self.next_window_data.clear();
            return false;
        }
        if self.next_window_data.pos_cond.is_empty() {
            self.set_next_window_pos(self.input.display_size * 0.5, Cond::APPEARING, Vec2::splat(0.5));
        }
        let open = self.begin(
            name,
            flags | WindowFlags::POPUP | WindowFlags::MODAL | WindowFlags::NO_COLLAPSE | WindowFlags::NO_SAVED_SETTINGS,
        );
        if !open {
            self.end_popup();
        }
        open
    }

    /// Closes a popup window begun by `begin_popup*`.
    ///
    /// # Panics
    ///
    /// Panics if the current window is not a popup.
    pub fn end_popup(&mut self) {
        assert!(
            self.cw().flags.contains(WindowFlags::POPUP),
            "end_popup() called on non-popup window '{}'",
            self.cw().name
        );
        assert!(!self.begin_popup_stack.is_empty(), "end_popup() without begin_popup()");
        self.end();
    }

    /// Closes the popup being submitted, and the menus it belongs to.
    pub fn close_current_popup(&mut self) {
        let Some(mut level) = self.begin_popup_stack.len().checked_sub(1) else { return };
        let same = match (self.begin_popup_stack.get(level), self.open_popup_stack.get(level)) {
            (Some(b), Some(o)) => b.popup_id == o.popup_id,
            _ => false,
        };
        if !same {
            return;
        }
        while level > 0
            && self.open_popup_stack.as_slice()[level]
                .window
                .is_some_and(|w| self.windows[w].flags.contains(WindowFlags::CHILD_MENU))
        {
            level -= 1;
        }
        self.close_popup_to_level(level);
    }

    /// Truncates the open stack to `remaining` entries and focuses what is
    /// left underneath.
    pub(crate) fn close_popup_to_level(&mut self, remaining: usize) {
        let stack = self.open_popup_stack.as_slice();
        if remaining >= stack.len() {
            return;
        }
        let focus = if remaining > 0 {
            stack[remaining - 1].window
        } else {
            Some(stack[0].parent_window)
        };
        debug!(remaining, closed = stack.len() - remaining, "popups closed");
        self.focus_window(focus);
        self.open_popup_stack.truncate(remaining);
    }

    /// Closes every popup that is not an ancestor of `ref_window`.
    pub(crate) fn close_popups_over_window(&mut self, ref_window: Option<WindowIdx>) {
        let stack = self.open_popup_stack.as_slice();
        if stack.is_empty() {
            return;
        }
        let mut n = 0;
        if let Some(ref_window) = ref_window {
            let ref_root = self.windows[ref_window].root;
            while n < stack.len() {
                let Some(popup) = stack[n].window else {
                    n += 1;
                    continue;
                };
                if self.windows[popup].flags.contains(WindowFlags::CHILD_WINDOW) {
                    n += 1;
                    continue;
                }
                let has_focus = stack[n..]
                    .iter()
                    .any(|p| p.window.is_some_and(|w| self.windows[w].root == ref_root));
                if !has_focus {
                    break;
                }
                n += 1;
            }
        }
        if n < stack.len() {
            self.close_popup_to_level(n);
        }
    }

    /// The top-most open modal popup window.
    pub(crate) fn front_most_modal(&self) -> Option<WindowIdx> {
        self.open_popup_stack
            .iter()
            .rev()
            .filter_map(|p| p.window)
            .find(|&w| self.windows[w].flags.contains(WindowFlags::MODAL))
    }

    // ---------------------------------------------------------------------
    // Tooltips
    // ---------------------------------------------------------------------

    fn begin_tooltip_ex(&mut self, extra_flags: WindowFlags, override_previous: bool) {
        let mut name = format!("##Tooltip_{:02}", self.tooltip_override_count);
        if override_previous {
            if let Some(idx) = self.find_window_by_name(&name) {
                if self.windows[idx].active {
                    // Window content cannot be reset, so a fresh window
                    // replaces the visible one.
                    self.windows[idx].hidden_frames = 1;
                    self.tooltip_override_count += 1;
                    name = format!("##Tooltip_{:02}", self.tooltip_override_count);
                }
            }
        }
        self.begin(&name, TOOLTIP_FLAGS | extra_flags);
    }

    /// Starts a tooltip window at the mouse. Always pair with
    /// [`Context::end_tooltip`].
    pub fn begin_tooltip(&mut self) {
        self.begin_tooltip_ex(WindowFlags::empty(), false);
    }

    /// Closes a tooltip window.
    ///
    /// # Panics
    ///
    /// Panics if the current window is not a tooltip.
    pub fn end_tooltip(&mut self) {
        assert!(
            self.cw().flags.contains(WindowFlags::TOOLTIP),
            "end_tooltip() called on non-tooltip window '{}'",
            self.cw().name
        );
        self.end();
    }

    /// Shows a text-only tooltip, replacing any tooltip submitted earlier
    /// this frame.
    pub fn set_tooltip(&mut self, text: &str) {
        self.begin_tooltip_ex(WindowFlags::empty(), true);
        self.text_unformatted(text);
        self.end_tooltip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{frame, test_context};

    #[test]
    fn test_popup_open_and_close() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            ctx.begin("Host", WindowFlags::empty());
            assert!(!ctx.is_popup_open("menu"));
            assert!(!ctx.begin_popup("menu", WindowFlags::empty()));
            ctx.open_popup("menu");
            assert!(ctx.is_popup_open("menu"));
            ctx.end();
        });
        frame(&mut ctx, |ctx| {
            ctx.begin("Host", WindowFlags::empty());
            assert!(ctx.begin_popup("menu", WindowFlags::empty()));
            ctx.close_current_popup();
            ctx.end_popup();
            ctx.end();
        });
        frame(&mut ctx, |ctx| {
            ctx.begin("Host", WindowFlags::empty());
            assert!(!ctx.begin_popup("menu", WindowFlags::empty()));
            ctx.end();
        });
    }

    #[test]
    fn test_reopen_same_popup_each_frame_keeps_entry() {
        let mut ctx = test_context();
        for _ in 0..3 {
            frame(&mut ctx, |ctx| {
                ctx.begin("Host", WindowFlags::empty());
                ctx.open_popup("p");
                ctx.end();
            });
        }
        assert_eq!(ctx.open_popup_stack.len(), 1);
    }

    #[test]
    fn test_different_popup_replaces_level() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            ctx.begin("Host", WindowFlags::empty());
            ctx.open_popup("a");
            ctx.open_popup("b");
            assert!(!ctx.is_popup_open("a"));
            assert!(ctx.is_popup_open("b"));
            ctx.end();
        });
        assert_eq!(ctx.open_popup_stack.len(), 1);
    }

    #[test]
    fn test_modal_is_front_most() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            ctx.begin("Host", WindowFlags::empty());
            ctx.open_popup("Confirm");
            ctx.end();
        });
        frame(&mut ctx, |ctx| {
            ctx.begin("Host", WindowFlags::empty());
            assert!(ctx.begin_popup_modal("Confirm", WindowFlags::empty()));
            assert!(ctx.front_most_modal().is_some());
            ctx.end_popup();
            ctx.end();
        });
    }

    #[test]
    fn test_set_tooltip_overrides_previous() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            ctx.set_tooltip("one");
            ctx.set_tooltip("two");
        });
        assert!(ctx.window("##Tooltip_00").is_some());
        assert!(ctx.window("##Tooltip_01").is_some());
    }
}
