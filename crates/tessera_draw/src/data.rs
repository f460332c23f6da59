//! Per-frame render output.

use tessera_core::{Rect, Vec2};

use crate::cmd::DrawCmd;
use crate::list::DrawList;

/// Everything a backend needs to draw one frame.
///
/// Lists are borrowed from their owners, so the data cannot outlive the next
/// frame's mutation of those lists.
#[derive(Debug, Clone)]
pub struct DrawData<'a> {
    /// False until the producer has finished assembling the frame.
    pub valid: bool,
    /// Lists to draw, back to front.
    pub cmd_lists: Vec<&'a DrawList>,
    /// Sum of vertex counts over `cmd_lists`.
    pub total_vtx_count: usize,
    /// Sum of index counts over `cmd_lists`.
    pub total_idx_count: usize,
    /// Top-left of the display in clip-rect coordinates.
    pub display_pos: Vec2,
    /// Display size in clip-rect coordinates.
    pub display_size: Vec2,
    /// Pixels per display unit.
    pub framebuffer_scale: Vec2,
}

impl<'a> DrawData<'a> {
    /// Creates empty, invalid draw data for a display.
    #[must_use]
    pub fn new(display_pos: Vec2, display_size: Vec2, framebuffer_scale: Vec2) -> Self {
        Self {
            valid: false,
            cmd_lists: Vec::new(),
            total_vtx_count: 0,
            total_idx_count: 0,
            display_pos,
            display_size,
            framebuffer_scale,
        }
    }

    /// Appends a list. Lists without geometry or callbacks are skipped.
    pub fn add_list(&mut self, list: &'a DrawList) {
        let has_callback = list.cmd_buffer.iter().any(|c| c.callback.is_some());
        if list.cmd_buffer.is_empty() || (list.vtx_buffer.is_empty() && !has_callback) {
            return;
        }
        debug_assert!(
            list.invariants_hold(),
            "draw list '{}' submitted with broken buffer invariants",
            list.owner_name()
        );
        self.total_vtx_count += list.vtx_buffer.len();
        self.total_idx_count += list.idx_buffer.len();
        self.cmd_lists.push(list);
    }

    /// Number of lists.
    #[must_use]
    pub fn cmd_lists_count(&self) -> usize {
        self.cmd_lists.len()
    }

    /// Every command in draw order, paired with its list.
    pub fn commands(&self) -> impl Iterator<Item = (&'a DrawList, &'a DrawCmd)> + '_ {
        self.cmd_lists
            .iter()
            .flat_map(|&list| list.cmd_buffer.iter().map(move |cmd| (list, cmd)))
    }

    /// Converts a command's clip rect into framebuffer pixels.
    #[must_use]
    pub fn framebuffer_clip_rect(&self, cmd: &DrawCmd) -> Rect {
        let s = self.framebuffer_scale;
        Rect::new(
            (cmd.clip_rect.min - self.display_pos).mul_elem(s),
            (cmd.clip_rect.max - self.display_pos).mul_elem(s),
        )
    }
}
