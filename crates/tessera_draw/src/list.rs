//! The draw list: command, index and vertex buffers for one window or layer.
//!
//! Geometry is appended in two steps. [`DrawList::prim_reserve`] grows the
//! buffers and the current command's element count; the caller then writes
//! exactly that many indices and vertices through the `prim_write_*`
//! methods. The write cursors must land on the buffer ends before the next
//! reservation, which is checked on every reserve in debug builds.

use std::sync::Arc;

use bitflags::bitflags;
use tessera_core::color::{self, PackedColor};
use tessera_core::{Rect, Stack, Vec2};

use crate::channels::ChannelSplitter;
use crate::cmd::{DrawCallback, DrawCmd};
use crate::shared::DrawListSharedData;
use crate::vertex::{DrawIdx, DrawVert, TextureId};

bitflags! {
    /// Per-list tessellation switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawListFlags: u8 {
        /// Feather stroked lines with a transparent one-pixel fringe.
        const ANTI_ALIASED_LINES = 1 << 0;
        /// Feather filled shapes with a transparent one-pixel fringe.
        const ANTI_ALIASED_FILL = 1 << 1;
    }
}

bitflags! {
    /// Which corners of a rectangle get rounded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Corners: u8 {
        /// Top-left corner.
        const TOP_LEFT = 1 << 0;
        /// Top-right corner.
        const TOP_RIGHT = 1 << 1;
        /// Bottom-left corner.
        const BOT_LEFT = 1 << 2;
        /// Bottom-right corner.
        const BOT_RIGHT = 1 << 3;
        /// Both top corners.
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        /// Both bottom corners.
        const BOT = Self::BOT_LEFT.bits() | Self::BOT_RIGHT.bits();
        /// Both left corners.
        const LEFT = Self::TOP_LEFT.bits() | Self::BOT_LEFT.bits();
        /// Both right corners.
        const RIGHT = Self::TOP_RIGHT.bits() | Self::BOT_RIGHT.bits();
        /// Every corner.
        const ALL = 0xF;
    }
}

impl Default for Corners {
    fn default() -> Self {
        Self::ALL
    }
}

/// Append-only geometry buffer.
#[derive(Debug, Clone)]
pub struct DrawList {
    /// Draw commands, in submission order.
    pub cmd_buffer: Vec<DrawCmd>,
    /// Indices into `vtx_buffer`, three per triangle.
    pub idx_buffer: Vec<DrawIdx>,
    /// Vertices.
    pub vtx_buffer: Vec<DrawVert>,
    /// Tessellation switches, reset from the shared data every frame.
    pub flags: DrawListFlags,

    pub(crate) shared: Arc<DrawListSharedData>,
    pub(crate) owner_name: String,
    pub(crate) vtx_current_idx: u32,
    pub(crate) vtx_write: usize,
    pub(crate) idx_write: usize,
    pub(crate) clip_rect_stack: Stack<Rect>,
    pub(crate) texture_id_stack: Stack<TextureId>,
    pub(crate) path: Vec<Vec2>,
    pub(crate) scratch: Vec<Vec2>,
    pub(crate) splitter: ChannelSplitter,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(shared: Arc<DrawListSharedData>) -> Self {
        let mut list = Self {
            cmd_buffer: Vec::with_capacity(64),
            idx_buffer: Vec::with_capacity(4096),
            vtx_buffer: Vec::with_capacity(4096),
            flags: shared.initial_flags,
            shared,
            owner_name: String::new(),
            vtx_current_idx: 0,
            vtx_write: 0,
            idx_write: 0,
            clip_rect_stack: Stack::with_capacity("clip rect", 16),
            texture_id_stack: Stack::with_capacity("texture id", 4),
            path: Vec::with_capacity(64),
            scratch: Vec::new(),
            splitter: ChannelSplitter::new(),
        };
        list.add_draw_cmd();
        list
    }

    /// Creates an empty list tagged with an owner name for diagnostics.
    #[must_use]
    pub fn with_owner(shared: Arc<DrawListSharedData>, owner_name: impl Into<String>) -> Self {
        let mut list = Self::new(shared);
        list.owner_name = owner_name.into();
        list
    }

    /// Name of the window or layer that owns this list.
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Shared tessellation data.
    #[must_use]
    pub fn shared_data(&self) -> &Arc<DrawListSharedData> {
        &self.shared
    }

    /// Clears all geometry and stacks, keeping allocations, and adopts new
    /// shared data. Leaves one empty command in place.
    pub fn reset_for_new_frame(&mut self, shared: Arc<DrawListSharedData>) {
        debug_assert!(
            self.splitter.count() <= 1,
            "draw list '{}' reset with channels still split",
            self.owner_name
        );
        self.flags = shared.initial_flags;
        self.shared = shared;
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
        self.vtx_buffer.clear();
        self.vtx_current_idx = 0;
        self.vtx_write = 0;
        self.idx_write = 0;
        self.clip_rect_stack.clear();
        self.texture_id_stack.clear();
        self.path.clear();
        self.splitter.clear();
        self.add_draw_cmd();
    }

    /// Releases buffer memory.
    pub fn clear_free_memory(&mut self) {
        let shared = Arc::clone(&self.shared);
        self.reset_for_new_frame(shared);
        self.cmd_buffer.shrink_to_fit();
        self.idx_buffer.shrink_to_fit();
        self.vtx_buffer.shrink_to_fit();
        self.path.shrink_to_fit();
        self.scratch = Vec::new();
        self.splitter.clear_free_memory();
    }

    /// Number of vertices written so far. Always equals `vtx_buffer.len()`
    /// between primitives.
    #[inline]
    #[must_use]
    pub fn vtx_current_idx(&self) -> u32 {
        self.vtx_current_idx
    }

    // ---------------------------------------------------------------------
    // Clip rect / texture stacks
    // ---------------------------------------------------------------------

    /// Current clip rectangle.
    #[inline]
    #[must_use]
    pub fn current_clip_rect(&self) -> Rect {
        self.clip_rect_stack.top_or(self.shared.clip_rect_fullscreen)
    }

    /// Current texture.
    #[inline]
    #[must_use]
    pub fn current_texture_id(&self) -> TextureId {
        self.texture_id_stack.top_or(TextureId::default())
    }

    /// Depth of the clip rect stack.
    #[must_use]
    pub fn clip_rect_depth(&self) -> usize {
        self.clip_rect_stack.len()
    }

    /// Depth of the texture stack.
    #[must_use]
    pub fn texture_depth(&self) -> usize {
        self.texture_id_stack.len()
    }

    /// Pushes a clip rectangle, optionally intersected with the current one.
    pub fn push_clip_rect(&mut self, min: Vec2, max: Vec2, intersect_with_current: bool) {
        let mut cr = Rect::new(min, max);
        if intersect_with_current {
            let current = self.current_clip_rect();
            cr.min = cr.min.max(current.min);
            cr.max = cr.max.min(current.max);
        }
        cr.max = cr.max.max(cr.min);
        self.clip_rect_stack.push(cr);
        self.update_clip_rect();
    }

    /// Pushes the full-screen clip rect.
    pub fn push_clip_rect_full_screen(&mut self) {
        let full = self.shared.clip_rect_fullscreen;
        self.push_clip_rect(full.min, full.max, false);
    }

    /// Pops the current clip rectangle.
    ///
    /// # Panics
    ///
    /// Panics if nothing is pushed.
    pub fn pop_clip_rect(&mut self) {
        self.clip_rect_stack.pop();
        self.update_clip_rect();
    }

    /// Pushes a texture.
    pub fn push_texture_id(&mut self, texture_id: TextureId) {
        self.texture_id_stack.push(texture_id);
        self.update_texture_id();
    }

    /// Pops the current texture.
    ///
    /// # Panics
    ///
    /// Panics if nothing is pushed.
    pub fn pop_texture_id(&mut self) {
        self.texture_id_stack.pop();
        self.update_texture_id();
    }

    /// Starts a new command with the current clip rect and texture.
    pub fn add_draw_cmd(&mut self) {
        let clip_rect = self.current_clip_rect();
        debug_assert!(
            clip_rect.min.x <= clip_rect.max.x && clip_rect.min.y <= clip_rect.max.y,
            "inverted clip rect {clip_rect:?}"
        );
        let texture_id = self.current_texture_id();
        self.cmd_buffer.push(DrawCmd::new(clip_rect, texture_id));
    }

    /// Inserts a renderer callback, followed by a fresh command so later
    /// geometry is not attached to it.
    pub fn add_callback(&mut self, callback: DrawCallback) {
        let needs_new = self
            .cmd_buffer
            .last()
            .map_or(true, |cmd| cmd.elem_count != 0 || cmd.callback.is_some());
        if needs_new {
            self.add_draw_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.callback = Some(callback);
        }
        self.add_draw_cmd();
    }

    /// Re-targets the open command at the current clip rect, merging with the
    /// previous command when it already has the same state.
    pub(crate) fn update_clip_rect(&mut self) {
        let clip_rect = self.current_clip_rect();
        let texture_id = self.current_texture_id();
        let Some(curr) = self.cmd_buffer.last() else {
            self.add_draw_cmd();
            return;
        };
        if (curr.elem_count != 0 && curr.clip_rect != clip_rect) || curr.callback.is_some() {
            self.add_draw_cmd();
            return;
        }

        let len = self.cmd_buffer.len();
        let prev_matches = len > 1 && self.cmd_buffer[len - 2].accepts(&clip_rect, texture_id);
        if curr.elem_count == 0 && prev_matches {
            self.cmd_buffer.pop();
        } else if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.clip_rect = clip_rect;
        }
    }

    /// Same as [`Self::update_clip_rect`] for the texture.
    pub(crate) fn update_texture_id(&mut self) {
        let clip_rect = self.current_clip_rect();
        let texture_id = self.current_texture_id();
        let Some(curr) = self.cmd_buffer.last() else {
            self.add_draw_cmd();
            return;
        };
        if (curr.elem_count != 0 && curr.texture_id != texture_id) || curr.callback.is_some() {
            self.add_draw_cmd();
            return;
        }

        let len = self.cmd_buffer.len();
        let prev_matches = len > 1 && self.cmd_buffer[len - 2].accepts(&clip_rect, texture_id);
        if curr.elem_count == 0 && prev_matches {
            self.cmd_buffer.pop();
        } else if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.texture_id = texture_id;
        }
    }

    /// Drops a trailing command that received no geometry.
    pub fn pop_unused_draw_cmd(&mut self) {
        if let Some(last) = self.cmd_buffer.last() {
            if last.elem_count == 0 && last.callback.is_none() {
                self.cmd_buffer.pop();
            }
        }
    }

    // ---------------------------------------------------------------------
    // Primitive reservation and writes
    // ---------------------------------------------------------------------

    /// Reserves room for `idx_count` indices and `vtx_count` vertices and
    /// charges the indices to the current command.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the previous reservation was not fully
    /// written.
    pub fn prim_reserve(&mut self, idx_count: usize, vtx_count: usize) {
        debug_assert_eq!(
            self.vtx_write,
            self.vtx_buffer.len(),
            "vertex reserve/write mismatch in draw list '{}'",
            self.owner_name
        );
        debug_assert_eq!(
            self.idx_write,
            self.idx_buffer.len(),
            "index reserve/write mismatch in draw list '{}'",
            self.owner_name
        );

        if self.cmd_buffer.is_empty() {
            self.add_draw_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.elem_count += u32::try_from(idx_count).unwrap_or(u32::MAX);
        }

        let vtx_old = self.vtx_buffer.len();
        self.vtx_buffer.resize(vtx_old + vtx_count, DrawVert::default());
        self.vtx_write = vtx_old;

        let idx_old = self.idx_buffer.len();
        self.idx_buffer.resize(idx_old + idx_count, 0);
        self.idx_write = idx_old;
    }

    /// Writes one vertex without advancing the vertex index counter.
    #[inline]
    pub(crate) fn write_vtx(&mut self, pos: Vec2, uv: Vec2, col: PackedColor) {
        self.vtx_buffer[self.vtx_write] = DrawVert::new(pos, uv, col);
        self.vtx_write += 1;
    }

    /// Writes one vertex and advances the vertex index counter.
    #[inline]
    pub fn prim_write_vtx(&mut self, pos: Vec2, uv: Vec2, col: PackedColor) {
        self.write_vtx(pos, uv, col);
        self.vtx_current_idx += 1;
    }

    /// Writes one index.
    #[inline]
    pub fn prim_write_idx(&mut self, idx: DrawIdx) {
        self.idx_buffer[self.idx_write] = idx;
        self.idx_write += 1;
    }

    /// Writes one triangle's worth of indices.
    #[inline]
    pub(crate) fn write_tri(&mut self, a: DrawIdx, b: DrawIdx, c: DrawIdx) {
        self.prim_write_idx(a);
        self.prim_write_idx(b);
        self.prim_write_idx(c);
    }

    /// Writes an index referencing the next vertex, then the vertex.
    #[inline]
    pub fn prim_vtx(&mut self, pos: Vec2, uv: Vec2, col: PackedColor) {
        self.prim_write_idx(self.vtx_current_idx);
        self.prim_write_vtx(pos, uv, col);
    }

    /// Axis-aligned quad with the white-pixel UV. Requires a prior
    /// `prim_reserve(6, 4)`.
    pub fn prim_rect(&mut self, a: Vec2, c: Vec2, col: PackedColor) {
        let uv = self.shared.tex_uv_white_pixel;
        self.prim_rect_uv(a, c, uv, uv, col);
    }

    /// Axis-aligned textured quad. Requires a prior `prim_reserve(6, 4)`.
    pub fn prim_rect_uv(&mut self, a: Vec2, c: Vec2, uv_a: Vec2, uv_c: Vec2, col: PackedColor) {
        let b = Vec2::new(c.x, a.y);
        let d = Vec2::new(a.x, c.y);
        let uv_b = Vec2::new(uv_c.x, uv_a.y);
        let uv_d = Vec2::new(uv_a.x, uv_c.y);
        self.prim_quad_uv(a, b, c, d, uv_a, uv_b, uv_c, uv_d, col);
    }

    /// Arbitrary textured quad. Requires a prior `prim_reserve(6, 4)`.
    #[allow(clippy::too_many_arguments)]
    pub fn prim_quad_uv(
        &mut self,
        a: Vec2,
        b: Vec2,
        c: Vec2,
        d: Vec2,
        uv_a: Vec2,
        uv_b: Vec2,
        uv_c: Vec2,
        uv_d: Vec2,
        col: PackedColor,
    ) {
        let idx = self.vtx_current_idx;
        self.write_tri(idx, idx + 1, idx + 2);
        self.write_tri(idx, idx + 2, idx + 3);
        self.write_vtx(a, uv_a, col);
        self.write_vtx(b, uv_b, col);
        self.write_vtx(c, uv_c, col);
        self.write_vtx(d, uv_d, col);
        self.vtx_current_idx += 4;
    }

    /// Returns true if the buffers satisfy their structural invariants:
    /// cursors at the buffer ends, the vertex counter matching the vertex
    /// count, and (when not split) command element counts summing to the
    /// index count.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let cursors = self.vtx_write == self.vtx_buffer.len()
            && self.idx_write == self.idx_buffer.len()
            && self.vtx_current_idx as usize == self.vtx_buffer.len();
        if !cursors {
            return false;
        }
        if self.splitter.count() > 1 {
            return true;
        }
        let elems: u64 = self.cmd_buffer.iter().map(|c| u64::from(c.elem_count)).sum();
        elems == self.idx_buffer.len() as u64
    }

    /// Sum of `elem_count` over all commands.
    #[must_use]
    pub fn total_elem_count(&self) -> usize {
        self.cmd_buffer.iter().map(|c| c.elem_count as usize).sum()
    }

    /// Returns true if `col` would produce no visible pixels.
    #[inline]
    pub(crate) fn skip_color(col: PackedColor) -> bool {
        color::is_invisible(col)
    }
}
