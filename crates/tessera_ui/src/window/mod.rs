//! # Window Manager
//!
//! A [`Window`] is created lazily by the first `begin(name)` and lives in the
//! context's registry for the rest of the session. Every frame it is marked
//! inactive; calling `begin` again revives it and recomputes, in order:
//!
//! ```text
//! appearing? → next-window overrides → auto-fit → scrollbars
//!            → position clamp → rects and clip → decorations
//! ```
//!
//! Per-frame layout state (cursor, line height, indent, stacks) lives in
//! [`WindowTempData`] and is rebuilt on the first `begin` of each frame.

mod begin;
mod resize;
mod scroll;

use std::sync::Arc;

use tessera_core::{Rect, Stack, Vec2};
use tessera_draw::{DrawList, DrawListSharedData};

use crate::columns::ColumnsSet;
use crate::flags::{Cond, ItemFlags, ItemStatusFlags, WindowFlags};
use crate::id::{Id, IdKey};

pub use scroll::Axis;

/// Index of a window in the context's registry. Stable for the lifetime of
/// the context.
pub(crate) type WindowIdx = usize;

/// Cardinal direction, for arrows and popup placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
}

/// Values saved by `begin_group` and restored by `end_group`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GroupData {
    pub backup_cursor_pos: Vec2,
    pub backup_cursor_max_pos: Vec2,
    pub backup_indent: f32,
    pub backup_group_offset: f32,
    pub backup_current_line_height: f32,
    pub backup_current_line_text_base_offset: f32,
    pub backup_active_id_is_alive: bool,
    pub advance_cursor: bool,
}

/// Layout state rebuilt on the first `begin` of every frame.
#[derive(Debug, Clone)]
pub(crate) struct WindowTempData {
    pub cursor_pos: Vec2,
    pub cursor_pos_prev_line: Vec2,
    pub cursor_start_pos: Vec2,
    pub cursor_max_pos: Vec2,
    pub current_line_height: f32,
    pub current_line_text_base_offset: f32,
    pub prev_line_height: f32,
    pub prev_line_text_base_offset: f32,
    pub last_item_id: Id,
    pub last_item_status_flags: ItemStatusFlags,
    pub last_item_rect: Rect,
    pub child_windows: Vec<WindowIdx>,
    pub item_flags: ItemFlags,
    pub item_width: f32,
    pub item_flags_stack: Stack<ItemFlags>,
    pub item_width_stack: Stack<f32>,
    pub group_stack: Stack<GroupData>,
    pub indent: f32,
    pub group_offset: f32,
    pub columns_offset: f32,
    pub columns_set: Option<usize>,
}

impl WindowTempData {
    fn new(pos: Vec2) -> Self {
        Self {
            cursor_pos: pos,
            cursor_pos_prev_line: pos,
            cursor_start_pos: pos,
            cursor_max_pos: pos,
            current_line_height: 0.0,
            current_line_text_base_offset: 0.0,
            prev_line_height: 0.0,
            prev_line_text_base_offset: 0.0,
            last_item_id: Id::NONE,
            last_item_status_flags: ItemStatusFlags::empty(),
            last_item_rect: Rect::ZERO,
            child_windows: Vec::new(),
            item_flags: ItemFlags::empty(),
            item_width: 0.0,
            item_flags_stack: Stack::new("item flags"),
            item_width_stack: Stack::new("item width"),
            group_stack: Stack::new("group"),
            indent: 0.0,
            group_offset: 0.0,
            columns_offset: 0.0,
            columns_set: None,
        }
    }
}

/// Inputs to a user size constraint.
#[derive(Debug, Clone, Copy)]
pub struct SizeCallbackData {
    /// Window position.
    pub pos: Vec2,
    /// Size before this frame's resize.
    pub current_size: Vec2,
    /// Size after min/max constraints; the callback returns the final size.
    pub desired_size: Vec2,
}

/// User size constraint, called once per resize step.
pub type SizeCallback = Arc<dyn Fn(&SizeCallbackData) -> Vec2 + Send + Sync>;

/// Overrides queued by `set_next_window_*` and consumed by the next `begin`.
/// An empty `Cond` means "not set".
#[derive(Default, Clone)]
pub(crate) struct NextWindowData {
    pub pos_cond: Cond,
    pub pos_val: Vec2,
    pub pos_pivot_val: Vec2,
    pub size_cond: Cond,
    pub size_val: Vec2,
    pub content_size_cond: Cond,
    pub content_size_val: Vec2,
    pub collapsed_cond: Cond,
    pub collapsed_val: bool,
    pub size_constraint_cond: Cond,
    pub size_constraint_rect: Rect,
    pub size_callback: Option<SizeCallback>,
    pub focus_cond: Cond,
}

impl NextWindowData {
    pub fn clear(&mut self) {
        self.pos_cond = Cond::empty();
        self.size_cond = Cond::empty();
        self.content_size_cond = Cond::empty();
        self.collapsed_cond = Cond::empty();
        self.size_constraint_cond = Cond::empty();
        self.size_callback = None;
        self.focus_cond = Cond::empty();
    }
}

impl std::fmt::Debug for NextWindowData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextWindowData")
            .field("pos_cond", &self.pos_cond)
            .field("size_cond", &self.size_cond)
            .field("collapsed_cond", &self.collapsed_cond)
            .field("size_constraint_cond", &self.size_constraint_cond)
            .field("has_size_callback", &self.size_callback.is_some())
            .finish_non_exhaustive()
    }
}

/// One top-level, child, popup or tooltip surface.
#[derive(Debug)]
pub struct Window {
    pub(crate) name: String,
    pub(crate) id: Id,
    pub(crate) flags: WindowFlags,
    pub(crate) pos_float: Vec2,
    pub(crate) pos: Vec2,
    pub(crate) size: Vec2,
    pub(crate) size_full: Vec2,
    pub(crate) size_full_at_last_begin: Vec2,
    pub(crate) size_contents: Vec2,
    pub(crate) size_contents_explicit: Vec2,
    pub(crate) contents_region_rect: Rect,
    pub(crate) window_padding: Vec2,
    pub(crate) window_rounding: f32,
    pub(crate) window_border_size: f32,
    pub(crate) title_bar_height: f32,
    pub(crate) move_id: Id,
    pub(crate) child_id: Id,
    pub(crate) scroll: Vec2,
    pub(crate) scroll_target: Vec2,
    pub(crate) scroll_target_center_ratio: Vec2,
    pub(crate) scrollbar_x: bool,
    pub(crate) scrollbar_y: bool,
    pub(crate) scrollbar_sizes: Vec2,
    pub(crate) active: bool,
    pub(crate) was_active: bool,
    pub(crate) write_accessed: bool,
    pub(crate) collapsed: bool,
    pub(crate) collapse_toggle_wanted: bool,
    pub(crate) skip_items: bool,
    pub(crate) appearing: bool,
    pub(crate) hidden_frames: u32,
    pub(crate) begin_count: u32,
    pub(crate) begin_order_within_parent: usize,
    pub(crate) popup_id: Id,
    pub(crate) auto_pos_last_dir: Option<Dir>,
    pub(crate) auto_fit_frames: [u32; 2],
    pub(crate) auto_fit_only_grows: bool,
    pub(crate) auto_fit_child_axes: [bool; 2],
    pub(crate) set_window_pos_allow_flags: Cond,
    pub(crate) set_window_size_allow_flags: Cond,
    pub(crate) set_window_collapsed_allow_flags: Cond,
    pub(crate) set_window_pos_val: Vec2,
    pub(crate) set_window_pos_pivot: Vec2,
    pub(crate) last_frame_active: Option<u64>,
    pub(crate) item_width_default: f32,
    pub(crate) dc: WindowTempData,
    pub(crate) id_stack: Stack<Id>,
    pub(crate) clip_rect: Rect,
    pub(crate) outer_rect_clipped: Rect,
    pub(crate) inner_main_rect: Rect,
    pub(crate) inner_clip_rect: Rect,
    pub(crate) draw_list: DrawList,
    pub(crate) parent: Option<WindowIdx>,
    pub(crate) root: WindowIdx,
    pub(crate) root_non_popup: WindowIdx,
    pub(crate) nav_last_id: Id,
    pub(crate) columns_storage: Vec<ColumnsSet>,
}

impl Window {
    pub(crate) fn new(idx: WindowIdx, name: &str, shared: Arc<DrawListSharedData>) -> Self {
        let id = Id::from_name(name);
        let mut id_stack = Stack::with_capacity("id", 16);
        id_stack.push(id);
        let pos = Vec2::new(60.0, 60.0);
        Self {
            name: name.to_owned(),
            id,
            flags: WindowFlags::empty(),
            pos_float: pos,
            pos,
            size: Vec2::ZERO,
            size_full: Vec2::ZERO,
            size_full_at_last_begin: Vec2::ZERO,
            size_contents: Vec2::ZERO,
            size_contents_explicit: Vec2::ZERO,
            contents_region_rect: Rect::ZERO,
            window_padding: Vec2::ZERO,
            window_rounding: 0.0,
            window_border_size: 0.0,
            title_bar_height: 0.0,
            move_id: Id::hash_str(id, "#MOVE"),
            child_id: Id::NONE,
            scroll: Vec2::ZERO,
            scroll_target: Vec2::splat(f32::MAX),
            scroll_target_center_ratio: Vec2::splat(0.5),
            scrollbar_x: false,
            scrollbar_y: false,
            scrollbar_sizes: Vec2::ZERO,
            active: false,
            was_active: false,
            write_accessed: false,
            collapsed: false,
            collapse_toggle_wanted: false,
            skip_items: false,
            appearing: false,
            hidden_frames: 0,
            begin_count: 0,
            begin_order_within_parent: 0,
            popup_id: Id::NONE,
            auto_pos_last_dir: None,
            auto_fit_frames: [0, 0],
            auto_fit_only_grows: false,
            auto_fit_child_axes: [false, false],
            set_window_pos_allow_flags: Cond::ALL,
            set_window_size_allow_flags: Cond::ALL,
            set_window_collapsed_allow_flags: Cond::ALL,
            set_window_pos_val: Vec2::INVALID,
            set_window_pos_pivot: Vec2::INVALID,
            last_frame_active: None,
            item_width_default: 0.0,
            dc: WindowTempData::new(pos),
            id_stack,
            clip_rect: Rect::from_coords(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX),
            outer_rect_clipped: Rect::ZERO,
            inner_main_rect: Rect::ZERO,
            inner_clip_rect: Rect::ZERO,
            draw_list: DrawList::with_owner(shared, name),
            parent: None,
            root: idx,
            root_non_popup: idx,
            nav_last_id: Id::NONE,
            columns_storage: Vec::new(),
        }
    }

    /// Window name as passed to `begin`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Window identity (hash of the name).
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Flags latched by the first `begin` of the frame.
    #[must_use]
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Top-left corner.
    #[must_use]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Current size (title bar only when collapsed).
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Size when not collapsed.
    #[must_use]
    pub fn size_full(&self) -> Vec2 {
        self.size_full
    }

    /// Content size measured last frame, including padding.
    #[must_use]
    pub fn size_contents(&self) -> Vec2 {
        self.size_contents
    }

    /// Scroll offset.
    #[must_use]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Returns true if the window was submitted this frame.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if the window is collapsed to its title bar.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Returns true while the window is hidden for measuring.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden_frames > 0
    }

    /// Returns true if the window is submitted and drawn this frame.
    #[must_use]
    pub fn is_active_and_visible(&self) -> bool {
        self.active && self.hidden_frames == 0
    }

    /// Draw list holding this window's geometry.
    #[must_use]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Outer rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Title bar rectangle (empty height without a title bar).
    #[must_use]
    pub fn title_bar_rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::new(self.size_full.x, self.title_bar_height))
    }

    /// Inner clip rectangle computed by the last `begin`.
    #[must_use]
    pub fn inner_clip_rect(&self) -> Rect {
        self.inner_clip_rect
    }

    /// Hashes `key` against the top of this window's id stack.
    #[must_use]
    pub fn get_id<'a>(&self, key: impl Into<IdKey<'a>>) -> Id {
        key.into().hash(self.id_stack.top_or(self.id))
    }

    /// Throwaway identity derived from a rectangle relative to the window.
    pub(crate) fn id_from_rect(&self, r: &Rect) -> Id {
        #[allow(clippy::cast_possible_truncation)]
        let rel = [
            (r.min.x - self.pos.x) as i32,
            (r.min.y - self.pos.y) as i32,
            (r.max.x - self.pos.x) as i32,
            (r.max.y - self.pos.y) as i32,
        ];
        let mut bytes = [0u8; 16];
        for (chunk, v) in bytes.chunks_exact_mut(4).zip(rel) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        Id::hash_bytes(self.id_stack.top_or(self.id), &bytes)
    }

    /// Largest horizontal scroll.
    #[must_use]
    pub fn scroll_max_x(&self) -> f32 {
        (self.size_contents.x - (self.size_full.x - self.scrollbar_sizes.x)).max(0.0)
    }

    /// Largest vertical scroll.
    #[must_use]
    pub fn scroll_max_y(&self) -> f32 {
        (self.size_contents.y - (self.size_full.y - self.scrollbar_sizes.y)).max(0.0)
    }

    /// Content size taken from explicit values or last frame's cursor
    /// extent, plus padding.
    pub(crate) fn calc_size_contents(&self) -> Vec2 {
        let w = if self.size_contents_explicit.x != 0.0 {
            self.size_contents_explicit.x
        } else {
            self.dc.cursor_max_pos.x - self.pos.x + self.scroll.x
        };
        let h = if self.size_contents_explicit.y != 0.0 {
            self.size_contents_explicit.y
        } else {
            self.dc.cursor_max_pos.y - self.pos.y + self.scroll.y
        };
        Vec2::new(w.trunc(), h.trunc()) + self.window_padding
    }

    /// Moves the window, shifting its cursors so content submitted this
    /// frame follows.
    pub(crate) fn set_pos(&mut self, pos: Vec2) {
        let old = self.pos;
        self.pos_float = pos;
        self.pos = pos.floor();
        let delta = self.pos - old;
        self.dc.cursor_pos += delta;
        self.dc.cursor_max_pos += delta;
    }

    /// Applies `pos` if `cond` is allowed, consuming the one-shot conditions.
    pub(crate) fn set_pos_cond(&mut self, pos: Vec2, cond: Cond) {
        if !cond.is_empty() && !self.set_window_pos_allow_flags.intersects(cond) {
            return;
        }
        self.set_window_pos_allow_flags &= !(Cond::ONCE | Cond::FIRST_USE_EVER | Cond::APPEARING);
        self.set_window_pos_val = Vec2::INVALID;
        self.set_pos(pos);
    }

    /// Applies `size` if `cond` is allowed. A non-positive axis re-enables
    /// auto-fit on that axis.
    pub(crate) fn set_size_cond(&mut self, size: Vec2, cond: Cond) {
        if !cond.is_empty() && !self.set_window_size_allow_flags.intersects(cond) {
            return;
        }
        self.set_window_size_allow_flags &= !(Cond::ONCE | Cond::FIRST_USE_EVER | Cond::APPEARING);
        if size.x > 0.0 {
            self.auto_fit_frames[0] = 0;
            self.size_full.x = size.x;
        } else {
            self.auto_fit_frames[0] = 2;
            self.auto_fit_only_grows = false;
        }
        if size.y > 0.0 {
            self.auto_fit_frames[1] = 0;
            self.size_full.y = size.y;
        } else {
            self.auto_fit_frames[1] = 2;
            self.auto_fit_only_grows = false;
        }
    }

    /// Applies `collapsed` if `cond` is allowed.
    pub(crate) fn set_collapsed_cond(&mut self, collapsed: bool, cond: Cond) {
        if !cond.is_empty() && !self.set_window_collapsed_allow_flags.intersects(cond) {
            return;
        }
        self.set_window_collapsed_allow_flags &= !(Cond::ONCE | Cond::FIRST_USE_EVER | Cond::APPEARING);
        self.collapsed = collapsed;
    }

    /// Enables or disables `APPEARING` on every setter at once.
    pub(crate) fn set_condition_allow_flags(&mut self, flags: Cond, enabled: bool) {
        for allow in [
            &mut self.set_window_pos_allow_flags,
            &mut self.set_window_size_allow_flags,
            &mut self.set_window_collapsed_allow_flags,
        ] {
            allow.set(flags, enabled);
        }
    }

    /// Start of the current frame's layout, after padding and title bar.
    pub(crate) fn reset_layout(&mut self) {
        let dc = &mut self.dc;
        dc.indent = self.window_padding.x - self.scroll.x;
        dc.group_offset = 0.0;
        dc.columns_offset = 0.0;
        dc.cursor_start_pos = self.pos
            + Vec2::new(
                dc.indent + dc.columns_offset,
                self.title_bar_height + self.window_padding.y - self.scroll.y,
            );
        dc.cursor_pos = dc.cursor_start_pos;
        dc.cursor_pos_prev_line = dc.cursor_pos;
        dc.cursor_max_pos = dc.cursor_start_pos;
        dc.current_line_height = 0.0;
        dc.prev_line_height = 0.0;
        dc.current_line_text_base_offset = 0.0;
        dc.prev_line_text_base_offset = 0.0;
        dc.child_windows.clear();
        dc.item_width = self.item_width_default;
        dc.item_width_stack.clear();
        dc.item_flags_stack.clear();
        dc.group_stack.clear();
        dc.columns_set = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        Window::new(0, "Test", Arc::new(DrawListSharedData::new()))
    }

    #[test]
    fn test_new_window_defaults() {
        let w = window();
        assert_eq!(w.pos(), Vec2::new(60.0, 60.0));
        assert_eq!(w.id(), Id::from_name("Test"));
        assert_eq!(w.id_stack.len(), 1);
        assert!(w.move_id.is_some());
        assert_ne!(w.move_id, w.id);
    }

    #[test]
    fn test_ids_depend_on_stack() {
        let mut w = window();
        let a = w.get_id("ok");
        w.id_stack.push(w.get_id(3));
        let b = w.get_id("ok");
        assert_ne!(a, b);
        w.id_stack.pop();
        assert_eq!(w.get_id("ok"), a);
    }

    #[test]
    fn test_once_condition_applies_once() {
        let mut w = window();
        w.set_pos_cond(Vec2::new(10.0, 10.0), Cond::ONCE);
        w.set_pos_cond(Vec2::new(99.0, 99.0), Cond::ONCE);
        assert_eq!(w.pos(), Vec2::new(10.0, 10.0));

        w.set_pos_cond(Vec2::new(5.5, 5.5), Cond::ALWAYS);
        assert_eq!(w.pos(), Vec2::new(5.0, 5.0));
        assert_eq!(w.pos_float, Vec2::new(5.5, 5.5));
    }

    #[test]
    fn test_appearing_condition_gated_by_allow_flags() {
        let mut w = window();
        w.set_condition_allow_flags(Cond::APPEARING, false);
        w.set_size_cond(Vec2::new(100.0, 50.0), Cond::APPEARING);
        assert_eq!(w.size_full, Vec2::ZERO);

        w.set_condition_allow_flags(Cond::APPEARING, true);
        w.set_size_cond(Vec2::new(100.0, 50.0), Cond::APPEARING);
        assert_eq!(w.size_full, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_zero_size_enables_auto_fit() {
        let mut w = window();
        w.set_size_cond(Vec2::new(0.0, 40.0), Cond::ALWAYS);
        assert_eq!(w.auto_fit_frames, [2, 0]);
        assert!(!w.auto_fit_only_grows);
    }

    #[test]
    fn test_set_pos_moves_cursor() {
        let mut w = window();
        w.dc.cursor_pos = Vec2::new(70.0, 80.0);
        w.set_pos(Vec2::new(0.0, 0.0));
        assert_eq!(w.dc.cursor_pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_rect_id_is_position_relative() {
        let w = window();
        let r = Rect::from_coords(70.0, 70.0, 80.0, 80.0);
        let other = Rect::from_coords(71.0, 70.0, 80.0, 80.0);
        assert_eq!(w.id_from_rect(&r), w.id_from_rect(&r));
        assert_ne!(w.id_from_rect(&r), w.id_from_rect(&other));
    }
}
