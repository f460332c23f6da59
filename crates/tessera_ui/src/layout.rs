//! Cursor-driven layout.
//!
//! Every item reports its size with [`Context::item_size`], which moves the
//! cursor to the start of the next line and grows the window's measured
//! content. `same_line` rewinds to the end of the previous item instead.

use tessera_core::{Rect, Vec2};

use crate::context::Context;
use crate::flags::ItemFlags;
use crate::id::Id;
use crate::window::GroupData;

impl Context {
    /// Advances the cursor past an item of `size`. `text_offset_y` aligns
    /// text baselines of items sharing a line.
    pub fn item_size(&mut self, size: Vec2, text_offset_y: f32) {
        let spacing_y = self.style.item_spacing.y;
        let w = self.cw_write();
        if w.skip_items {
            return;
        }
        let pos = w.pos;
        let dc = &mut w.dc;
        let line_height = dc.current_line_height.max(size.y);
        let text_base_offset = dc.current_line_text_base_offset.max(text_offset_y);
        dc.cursor_pos_prev_line = Vec2::new(dc.cursor_pos.x + size.x, dc.cursor_pos.y);
        dc.cursor_pos = Vec2::new(
            (pos.x + dc.indent + dc.columns_offset).trunc(),
            (dc.cursor_pos.y + line_height + spacing_y).trunc(),
        );
        dc.cursor_max_pos.x = dc.cursor_max_pos.x.max(dc.cursor_pos_prev_line.x);
        dc.cursor_max_pos.y = dc.cursor_max_pos.y.max(dc.cursor_pos.y - spacing_y);
        dc.prev_line_height = line_height;
        dc.prev_line_text_base_offset = text_base_offset;
        dc.current_line_height = 0.0;
        dc.current_line_text_base_offset = 0.0;
    }

    /// [`Context::item_size`] for a rectangle.
    pub fn item_size_rect(&mut self, bb: &Rect, text_offset_y: f32) {
        self.item_size(bb.size(), text_offset_y);
    }

    /// Places the next item on the same line as the previous one.
    ///
    /// `pos_x == 0.0` continues right after the previous item with
    /// `spacing` (negative: the style's item spacing). Otherwise `pos_x` is
    /// an offset from the window's left edge.
    pub fn same_line(&mut self, pos_x: f32, spacing: f32) {
        let style_spacing = self.style.item_spacing.x;
        let w = self.cw_write();
        if w.skip_items {
            return;
        }
        let (pos, scroll) = (w.pos, w.scroll);
        let dc = &mut w.dc;
        if pos_x == 0.0 {
            let spacing = if spacing < 0.0 { style_spacing } else { spacing };
            dc.cursor_pos.x = dc.cursor_pos_prev_line.x + spacing;
        } else {
            let spacing = spacing.max(0.0);
            dc.cursor_pos.x = pos.x - scroll.x + pos_x + spacing + dc.group_offset + dc.columns_offset;
        }
        dc.cursor_pos.y = dc.cursor_pos_prev_line.y;
        dc.current_line_height = dc.prev_line_height;
        dc.current_line_text_base_offset = dc.prev_line_text_base_offset;
    }

    /// Ends the current line. An empty line is one font height tall.
    pub fn new_line(&mut self) {
        let w = self.cw();
        if w.skip_items {
            return;
        }
        if w.dc.current_line_height > 0.0 {
            self.item_size(Vec2::ZERO, 0.0);
        } else {
            self.item_size(Vec2::new(0.0, self.font_size), 0.0);
        }
    }

    /// Adds vertical item spacing.
    pub fn spacing(&mut self) {
        if self.cw().skip_items {
            return;
        }
        self.item_size(Vec2::ZERO, 0.0);
    }

    /// Reserves `size` without drawing anything.
    pub fn dummy(&mut self, size: Vec2) {
        if self.cw().skip_items {
            return;
        }
        let bb = Rect::from_pos_size(self.cw().dc.cursor_pos, size);
        self.item_size(size, 0.0);
        self.item_add(bb, Id::NONE);
    }

    /// Moves the left margin right by `width` (zero: the style's indent).
    pub fn indent(&mut self, width: f32) {
        let width = if width == 0.0 { self.style.indent_spacing } else { width };
        self.shift_indent(width);
    }

    /// Moves the left margin left by `width` (zero: the style's indent).
    pub fn unindent(&mut self, width: f32) {
        let width = if width == 0.0 { self.style.indent_spacing } else { width };
        self.shift_indent(-width);
    }

    fn shift_indent(&mut self, delta: f32) {
        let w = self.cw_write();
        w.dc.indent += delta;
        w.dc.cursor_pos.x = w.pos.x + w.dc.indent + w.dc.columns_offset;
    }

    /// Starts a group: items until `end_group` are laid out as one item.
    pub fn begin_group(&mut self) {
        let alive = self.active_id_is_alive.is_some();
        let w = self.cw_write();
        let pos_x = w.pos.x;
        let dc = &mut w.dc;
        dc.group_stack.push(GroupData {
            backup_cursor_pos: dc.cursor_pos,
            backup_cursor_max_pos: dc.cursor_max_pos,
            backup_indent: dc.indent,
            backup_group_offset: dc.group_offset,
            backup_current_line_height: dc.current_line_height,
            backup_current_line_text_base_offset: dc.current_line_text_base_offset,
            backup_active_id_is_alive: alive,
            advance_cursor: true,
        });
        dc.group_offset = dc.cursor_pos.x - pos_x - dc.columns_offset;
        dc.indent = dc.group_offset;
        dc.cursor_max_pos = dc.cursor_pos;
        dc.current_line_height = 0.0;
    }

    /// Closes a group and submits its bounding box as the last item.
    ///
    /// # Panics
    ///
    /// Panics if no group is open.
    pub fn end_group(&mut self) {
        let idx = self.cur();
        let group = self.windows[idx].dc.group_stack.pop();
        let bb = {
            let dc = &mut self.windows[idx].dc;
            let bb = Rect::new(group.backup_cursor_pos, dc.cursor_max_pos.max(group.backup_cursor_pos));
            dc.cursor_pos = group.backup_cursor_pos;
            dc.cursor_max_pos = group.backup_cursor_max_pos.max(dc.cursor_max_pos);
            dc.current_line_height = group.backup_current_line_height;
            dc.current_line_text_base_offset = group.backup_current_line_text_base_offset;
            dc.indent = group.backup_indent;
            dc.group_offset = group.backup_group_offset;
            if group.advance_cursor {
                dc.current_line_text_base_offset =
                    dc.prev_line_text_base_offset.max(group.backup_current_line_text_base_offset);
            }
            bb
        };
        if group.advance_cursor {
            self.item_size(bb.size(), group.backup_current_line_text_base_offset);
            self.item_add(bb, Id::NONE);
        }

        // An item activated inside the group makes the whole group active.
        let activated_within = !group.backup_active_id_is_alive
            && self.active_id_is_alive.is_some()
            && self.active_id.is_some()
            && self.active_id_window.map(|w| self.windows[w].root) == Some(self.windows[idx].root);
        let dc = &mut self.windows[idx].dc;
        if activated_within {
            dc.last_item_id = self.active_id;
        }
        dc.last_item_rect = bb;
    }

    /// Sets the width of following items. Zero restores the default;
    /// negative values align to the right edge.
    pub fn push_item_width(&mut self, width: f32) {
        let w = self.cw_mut();
        let previous = w.dc.item_width;
        w.dc.item_width_stack.push(previous);
        w.dc.item_width = if width == 0.0 { w.item_width_default } else { width };
    }

    /// Restores the item width before the matching `push_item_width`.
    pub fn pop_item_width(&mut self) {
        let dc = &mut self.cw_mut().dc;
        dc.item_width = dc.item_width_stack.pop();
    }

    /// Width of the next item, resolving negative widths against the
    /// available region.
    #[must_use]
    pub fn calc_item_width(&self) -> f32 {
        let mut width = self.cw().dc.item_width;
        if width < 0.0 {
            width = (self.content_region_avail().x + width).max(1.0);
        }
        width.trunc()
    }

    /// Turns `flag` on or off for following items.
    pub fn push_item_flag(&mut self, flag: ItemFlags, enabled: bool) {
        let dc = &mut self.cw_mut().dc;
        let previous = dc.item_flags;
        dc.item_flags_stack.push(previous);
        dc.item_flags.set(flag, enabled);
    }

    /// Restores the item flags before the matching `push_item_flag`.
    pub fn pop_item_flag(&mut self) {
        let dc = &mut self.cw_mut().dc;
        dc.item_flags = dc.item_flags_stack.pop();
    }

    /// Makes following buttons fire repeatedly while held.
    pub fn push_button_repeat(&mut self, repeat: bool) {
        self.push_item_flag(ItemFlags::BUTTON_REPEAT, repeat);
    }

    /// Pops [`Context::push_button_repeat`].
    pub fn pop_button_repeat(&mut self) {
        self.pop_item_flag();
    }

    /// Resolves a requested item size: zero axes take `default`, negative
    /// axes are measured back from the content region's right/bottom edge.
    #[must_use]
    pub fn calc_item_size(&self, size: Vec2, default: Vec2) -> Vec2 {
        let mut size = size;
        let region_max = if size.x < 0.0 || size.y < 0.0 {
            self.cw().pos + self.content_region_max()
        } else {
            Vec2::ZERO
        };
        let cursor = self.cw().dc.cursor_pos;
        if size.x == 0.0 {
            size.x = default.x;
        } else if size.x < 0.0 {
            size.x = (4.0f32).max(region_max.x - cursor.x + size.x);
        }
        if size.y == 0.0 {
            size.y = default.y;
        } else if size.y < 0.0 {
            size.y = (4.0f32).max(region_max.y - cursor.y + size.y);
        }
        size
    }

    /// Bottom-right of the content region, relative to the window. Inside
    /// columns the x extent is the current column's right edge.
    #[must_use]
    pub fn content_region_max(&self) -> Vec2 {
        let w = self.cw();
        let mut max = w.contents_region_rect.max;
        if let Some(set) = w.dc.columns_set {
            let columns = &w.columns_storage[set];
            max.x = columns.offset_of(columns.current + 1) - w.window_padding.x;
        }
        max
    }

    /// Space left between the cursor and the content region's edge.
    #[must_use]
    pub fn content_region_avail(&self) -> Vec2 {
        let w = self.cw();
        self.content_region_max() - (w.dc.cursor_pos - w.pos)
    }

    /// Top-left of the content region, relative to the window.
    #[must_use]
    pub fn window_content_region_min(&self) -> Vec2 {
        self.cw().contents_region_rect.min
    }

    /// Bottom-right of the content region, relative to the window.
    #[must_use]
    pub fn window_content_region_max(&self) -> Vec2 {
        self.cw().contents_region_rect.max
    }

    /// Width of the content region.
    #[must_use]
    pub fn window_content_region_width(&self) -> f32 {
        self.cw().contents_region_rect.width()
    }

    /// Cursor position relative to the window.
    #[must_use]
    pub fn cursor_pos(&self) -> Vec2 {
        let w = self.cw();
        w.dc.cursor_pos - w.pos + w.scroll
    }

    /// Moves the cursor, relative to the window.
    pub fn set_cursor_pos(&mut self, local: Vec2) {
        let w = self.cw_write();
        w.dc.cursor_pos = w.pos - w.scroll + local;
        w.dc.cursor_max_pos = w.dc.cursor_max_pos.max(w.dc.cursor_pos);
    }

    /// Cursor position in screen space.
    #[must_use]
    pub fn cursor_screen_pos(&self) -> Vec2 {
        self.cw().dc.cursor_pos
    }

    /// Moves the cursor, in screen space.
    pub fn set_cursor_screen_pos(&mut self, pos: Vec2) {
        let w = self.cw_write();
        w.dc.cursor_pos = pos;
        w.dc.cursor_max_pos = w.dc.cursor_max_pos.max(pos);
    }

    /// Cursor position where the window's content starts.
    #[must_use]
    pub fn cursor_start_pos(&self) -> Vec2 {
        let w = self.cw();
        w.dc.cursor_start_pos - w.pos
    }

    /// Height of one line of text.
    #[must_use]
    pub fn text_line_height(&self) -> f32 {
        self.font_size
    }

    /// Height of one line of text plus item spacing.
    #[must_use]
    pub fn text_line_height_with_spacing(&self) -> f32 {
        self.font_size + self.style.item_spacing.y
    }

    /// Height of a framed item (button).
    #[must_use]
    pub fn frame_height(&self) -> f32 {
        self.font_size + self.style.frame_padding.y * 2.0
    }

    /// Height of a framed item plus item spacing.
    #[must_use]
    pub fn frame_height_with_spacing(&self) -> f32 {
        self.frame_height() + self.style.item_spacing.y
    }
}
