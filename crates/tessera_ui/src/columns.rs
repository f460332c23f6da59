//! Side-by-side columns.
//!
//! Each column draws into its own draw-list channel so items from every
//! column batch together on merge. Column borders are `button_behavior`
//! instances and can be dragged. Offsets are stored normalized to the
//! column set's horizontal range so they survive window resizes.

use tessera_core::{Rect, Vec2};

use crate::config::StyleColor;
use crate::context::Context;
use crate::flags::{ButtonFlags, ColumnsFlags, WindowFlags};
use crate::id::{Id, IdKey};

/// Half-width of the draggable strip around a column border.
const COLUMN_BORDER_HALF_WIDTH: f32 = 4.0;

/// Seed pushed on the id stack while hashing a column set's id.
const COLUMNS_ID_SEED: i32 = 0x1122_3347;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ColumnData {
    /// Left edge, normalized to `[min_x, max_x]`.
    pub offset_norm: f32,
    pub offset_norm_before_resize: f32,
    pub clip_rect: Rect,
}

/// Persistent state of one column set, stored on its window.
#[derive(Debug, Clone)]
pub(crate) struct ColumnsSet {
    pub id: Id,
    pub flags: ColumnsFlags,
    pub is_being_resized: bool,
    pub current: usize,
    pub count: usize,
    pub min_x: f32,
    pub max_x: f32,
    pub line_min_y: f32,
    pub line_max_y: f32,
    pub start_pos_y: f32,
    pub start_max_pos_x: f32,
    /// `count + 1` entries; the last one is the right edge.
    pub columns: Vec<ColumnData>,
}

impl ColumnsSet {
    fn new(id: Id) -> Self {
        Self {
            id,
            flags: ColumnsFlags::empty(),
            is_being_resized: false,
            current: 0,
            count: 1,
            min_x: 0.0,
            max_x: 0.0,
            line_min_y: 0.0,
            line_max_y: 0.0,
            start_pos_y: 0.0,
            start_max_pos_x: 0.0,
            columns: Vec::new(),
        }
    }

    /// Left edge of column `n`, relative to the window.
    pub fn offset_of(&self, n: usize) -> f32 {
        let t = self.columns[n].offset_norm;
        self.min_x + (self.max_x - self.min_x) * t
    }

    fn width_of(&self, n: usize, before_resize: bool) -> f32 {
        let norm = if before_resize {
            self.columns[n + 1].offset_norm_before_resize - self.columns[n].offset_norm_before_resize
        } else {
            self.columns[n + 1].offset_norm - self.columns[n].offset_norm
        };
        norm * (self.max_x - self.min_x)
    }

    fn pixels_to_norm(&self, offset: f32) -> f32 {
        offset / (self.max_x - self.min_x)
    }
}

impl Context {
    fn columns_id(&mut self, str_id: &str, count: usize) -> Id {
        let seed = if str_id.is_empty() {
            COLUMNS_ID_SEED.wrapping_add(i32::try_from(count).unwrap_or(i32::MAX))
        } else {
            COLUMNS_ID_SEED
        };
        self.push_id(IdKey::Int(i64::from(seed)));
        let id = self.get_id(if str_id.is_empty() { "columns" } else { str_id });
        self.pop_id();
        id
    }

    /// Starts a column set of `count > 1` columns.
    ///
    /// # Panics
    ///
    /// Panics if `count < 2` or a column set is already open.
    pub fn begin_columns(&mut self, str_id: &str, count: usize, flags: ColumnsFlags) {
        assert!(count > 1, "begin_columns() needs at least 2 columns, got {count}");
        assert!(self.cw().dc.columns_set.is_none(), "nested begin_columns() in one window");

        let id = self.columns_id(str_id, count);
        let idx = self.cur();
        let (item_spacing_x, scrollbar_size) = (self.style.item_spacing.x, self.style.scrollbar_size);
        let w = &mut self.windows[idx];
        let set_idx = match w.columns_storage.iter().position(|c| c.id == id) {
            Some(i) => i,
            None => {
                w.columns_storage.push(ColumnsSet::new(id));
                w.columns_storage.len() - 1
            }
        };
        w.dc.columns_set = Some(set_idx);

        let content_width = if w.size_contents_explicit.x != 0.0 {
            w.size_contents_explicit.x
        } else {
            w.size.x - w.scrollbar_sizes.x
        };
        let scrollbar_reserve = if w.flags.contains(WindowFlags::NO_SCROLLBAR) { 0.0 } else { scrollbar_size };
        let (indent, cursor_y, cursor_max_x, pos, clip) =
            (w.dc.indent, w.dc.cursor_pos.y, w.dc.cursor_max_pos.x, w.pos, w.clip_rect);

        let set = &mut w.columns_storage[set_idx];
        set.current = 0;
        set.count = count;
        set.flags = flags;
        set.min_x = indent - item_spacing_x;
        set.max_x = content_width - w.scroll.x - scrollbar_reserve;
        set.start_pos_y = cursor_y;
        set.start_max_pos_x = cursor_max_x;
        set.line_min_y = cursor_y;
        set.line_max_y = cursor_y;
        if set.columns.len() != count + 1 {
            #[allow(clippy::cast_precision_loss)]
            let columns = (0..=count)
                .map(|n| ColumnData {
                    offset_norm: n as f32 / count as f32,
                    ..ColumnData::default()
                })
                .collect();
            set.columns = columns;
        }
        for n in 0..count {
            let x1 = (0.5 + pos.x + set.offset_of(n) - 1.0).floor();
            let x2 = (0.5 + pos.x + set.offset_of(n + 1) - 1.0).floor();
            let mut r = Rect::from_coords(x1, -f32::MAX, x2, f32::MAX);
            r.clip_with(&clip);
            set.columns[n].clip_rect = r;
        }

        w.dc.columns_offset = 0.0;
        w.dc.cursor_pos.x = (pos.x + indent).trunc();
        w.draw_list.channels_split(count);
        self.push_column_clip_rect();
        let width = self.column_width(None);
        self.push_item_width(width * 0.65);
    }

    fn push_column_clip_rect(&mut self) {
        let w = self.cw();
        let Some(set) = w.dc.columns_set else { return };
        let set = &w.columns_storage[set];
        let r = set.columns[set.current].clip_rect;
        self.push_clip_rect(r.min, r.max, false);
    }

    /// Moves to the next column, wrapping to a new row after the last.
    pub fn next_column(&mut self) {
        let idx = self.cur();
        let w = &self.windows[idx];
        if w.skip_items {
            return;
        }
        let Some(set_idx) = w.dc.columns_set else { return };
        self.pop_item_width();
        self.pop_clip_rect();

        let spacing_x = self.style.item_spacing.x;
        let w = &mut self.windows[idx];
        let set = &mut w.columns_storage[set_idx];
        set.line_max_y = set.line_max_y.max(w.dc.cursor_pos.y);
        set.current += 1;
        if set.current < set.count {
            w.dc.columns_offset = set.offset_of(set.current) - w.dc.indent + spacing_x;
            w.draw_list.channels_set_current(set.current);
        } else {
            w.dc.columns_offset = 0.0;
            w.draw_list.channels_set_current(0);
            set.current = 0;
            set.line_min_y = set.line_max_y;
        }
        w.dc.cursor_pos.x = (w.pos.x + w.dc.indent + w.dc.columns_offset).trunc();
        w.dc.cursor_pos.y = set.line_min_y;
        w.dc.current_line_height = 0.0;
        w.dc.current_line_text_base_offset = 0.0;

        self.push_column_clip_rect();
        let width = self.column_width(None);
        self.push_item_width(width * 0.65);
    }

    /// Closes the open column set, merging channels and handling border
    /// drags.
    ///
    /// # Panics
    ///
    /// Panics if no column set is open.
    pub fn end_columns(&mut self) {
        let idx = self.cur();
        let Some(set_idx) = self.windows[idx].dc.columns_set else {
            panic!("end_columns() without begin_columns()");
        };
        self.pop_item_width();
        self.pop_clip_rect();

        let (flags, count, start_y, y2) = {
            let w = &mut self.windows[idx];
            w.draw_list.channels_merge();
            let set = &mut w.columns_storage[set_idx];
            set.line_max_y = set.line_max_y.max(w.dc.cursor_pos.y);
            w.dc.cursor_pos.y = set.line_max_y;
            if !set.flags.contains(ColumnsFlags::GROW_PARENT_CONTENTS_SIZE) {
                w.dc.cursor_max_pos.x = set.start_max_pos_x;
            }
            (set.flags, set.count, set.start_pos_y, w.dc.cursor_pos.y)
        };

        let mut is_being_resized = false;
        if !flags.contains(ColumnsFlags::NO_BORDER) && !self.windows[idx].skip_items {
            let mut dragging = None;
            for n in 1..count {
                let (x, column_id, clip) = {
                    let w = &self.windows[idx];
                    let set = &w.columns_storage[set_idx];
                    (w.pos.x + set.offset_of(n), set.id.offset(u32::try_from(n).unwrap_or(u32::MAX)), w.clip_rect)
                };
                let rect = Rect::from_coords(
                    x - COLUMN_BORDER_HALF_WIDTH,
                    start_y,
                    x + COLUMN_BORDER_HALF_WIDTH,
                    y2,
                );
                self.keep_alive_id(column_id);
                if self.is_clipped_ex(&rect, column_id) {
                    continue;
                }
                let (mut hovered, mut held) = (false, false);
                if !flags.contains(ColumnsFlags::NO_RESIZE) {
                    (hovered, held, _) = self.button_behavior(rect, column_id, ButtonFlags::empty());
                    if held {
                        dragging = Some(n);
                    }
                }
                let col = self.col(if held {
                    StyleColor::SeparatorActive
                } else if hovered {
                    StyleColor::SeparatorHovered
                } else {
                    StyleColor::Separator
                });
                let xi = x.trunc();
                self.windows[idx].draw_list.add_line(
                    Vec2::new(xi, (start_y + 1.0).max(clip.min.y)),
                    Vec2::new(xi, y2.min(clip.max.y)),
                    col,
                    1.0,
                );
            }

            if let Some(n) = dragging {
                let set = &mut self.windows[idx].columns_storage[set_idx];
                if !set.is_being_resized {
                    for c in &mut set.columns {
                        c.offset_norm_before_resize = c.offset_norm;
                    }
                }
                set.is_being_resized = true;
                is_being_resized = true;
                let x = self.dragged_column_offset(n);
                self.set_column_offset(Some(n), x);
            }
        }

        let w = &mut self.windows[idx];
        w.columns_storage[set_idx].is_being_resized = is_being_resized;
        w.dc.columns_set = None;
        w.dc.columns_offset = 0.0;
        w.dc.cursor_pos.x = (w.pos.x + w.dc.indent).trunc();
    }

    fn dragged_column_offset(&self, n: usize) -> f32 {
        let w = self.cw();
        let Some(set_idx) = w.dc.columns_set else { return 0.0 };
        let set = &w.columns_storage[set_idx];
        let mut x = self.input.mouse_pos.x - self.active_id_click_offset.x + COLUMN_BORDER_HALF_WIDTH - w.pos.x;
        x = x.max(set.offset_of(n - 1) + self.style.columns_min_spacing);
        if set.flags.contains(ColumnsFlags::NO_PRESERVE_WIDTHS) {
            x = x.min(set.offset_of(n + 1) - self.style.columns_min_spacing);
        }
        x
    }

    /// Switches the number of columns. Calling it again with the same
    /// count and border setting is a no-op; a count of 1 closes the set.
    pub fn columns(&mut self, count: usize, id: &str, border: bool) {
        let flags = if border { ColumnsFlags::empty() } else { ColumnsFlags::NO_BORDER };
        let w = self.cw();
        if let Some(set) = w.dc.columns_set {
            let set = &w.columns_storage[set];
            if set.count == count && set.flags == flags {
                return;
            }
            self.end_columns();
        }
        if count != 1 {
            self.begin_columns(id, count, flags);
        }
    }

    /// Index of the current column (0 outside columns).
    #[must_use]
    pub fn column_index(&self) -> usize {
        let w = self.cw();
        w.dc.columns_set.map_or(0, |s| w.columns_storage[s].current)
    }

    /// Number of columns (1 outside columns).
    #[must_use]
    pub fn columns_count(&self) -> usize {
        let w = self.cw();
        w.dc.columns_set.map_or(1, |s| w.columns_storage[s].count)
    }

    /// Left edge of column `n` (default: current), relative to the window.
    #[must_use]
    pub fn column_offset(&self, n: Option<usize>) -> f32 {
        let w = self.cw();
        let Some(set_idx) = w.dc.columns_set else { return 0.0 };
        let set = &w.columns_storage[set_idx];
        set.offset_of(n.unwrap_or(set.current))
    }

    /// Width of column `n` (default: current). Outside columns, the
    /// content region width.
    #[must_use]
    pub fn column_width(&self, n: Option<usize>) -> f32 {
        let w = self.cw();
        let Some(set_idx) = w.dc.columns_set else {
            return self.content_region_max().x;
        };
        let set = &w.columns_storage[set_idx];
        set.width_of(n.unwrap_or(set.current), false)
    }

    /// Moves the left edge of column `n` (default: current). Unless the set
    /// has `NO_PRESERVE_WIDTHS`, the column keeps its width and pushes the
    /// ones to its right.
    pub fn set_column_offset(&mut self, n: Option<usize>, offset: f32) {
        let min_spacing = self.style.columns_min_spacing;
        let w = self.cw_mut();
        let Some(set_idx) = w.dc.columns_set else { return };
        let set = &mut w.columns_storage[set_idx];
        let mut n = n.unwrap_or(set.current);
        let mut offset = offset;
        loop {
            let preserve = !set.flags.contains(ColumnsFlags::NO_PRESERVE_WIDTHS) && n + 1 < set.count;
            let width = if preserve { set.width_of(n, set.is_being_resized) } else { 0.0 };
            if !set.flags.contains(ColumnsFlags::NO_FORCE_WITHIN_WINDOW) {
                #[allow(clippy::cast_precision_loss)]
                let remaining = (set.count - n) as f32;
                offset = offset.min(set.max_x - min_spacing * remaining);
            }
            set.columns[n].offset_norm = set.pixels_to_norm(offset - set.min_x);
            if !preserve {
                break;
            }
            n += 1;
            offset += min_spacing.max(width);
        }
    }

    /// Sets the width of column `n` (default: current).
    pub fn set_column_width(&mut self, n: Option<usize>, width: f32) {
        let n = n.unwrap_or_else(|| self.column_index());
        let offset = self.column_offset(Some(n));
        self.set_column_offset(Some(n + 1), offset + width);
    }
}
