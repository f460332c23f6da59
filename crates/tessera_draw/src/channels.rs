//! Channel splitting: out-of-order submission into parallel z-groups.
//!
//! Channel 0 always lives in the list's own buffers. Switching channel swaps
//! the list's live command/index buffers with the stored ones; merging
//! appends channels 1..n after channel 0. Vertices are never split, only
//! the index and command streams.

use std::mem;

use crate::cmd::DrawCmd;
use crate::list::DrawList;
use crate::vertex::DrawIdx;

/// Stored command/index streams of one channel.
#[derive(Debug, Clone, Default)]
pub(crate) struct DrawChannel {
    cmd_buffer: Vec<DrawCmd>,
    idx_buffer: Vec<DrawIdx>,
}

/// Channel bookkeeping owned by a [`DrawList`].
#[derive(Debug, Clone)]
pub(crate) struct ChannelSplitter {
    current: usize,
    count: usize,
    channels: Vec<DrawChannel>,
}

impl ChannelSplitter {
    pub(crate) fn new() -> Self {
        Self {
            current: 0,
            count: 1,
            channels: Vec::new(),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn clear(&mut self) {
        self.current = 0;
        self.count = 1;
    }

    pub(crate) fn clear_free_memory(&mut self) {
        self.clear();
        self.channels = Vec::new();
    }
}

impl DrawList {
    /// Number of active channels (1 when not split).
    #[must_use]
    pub fn channels_count(&self) -> usize {
        self.splitter.count
    }

    /// Index of the channel receiving geometry.
    #[must_use]
    pub fn channels_current(&self) -> usize {
        self.splitter.current
    }

    /// Splits the list into `count` channels. Channel 0 keeps what has
    /// already been submitted.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero or the list is already split.
    pub fn channels_split(&mut self, count: usize) {
        assert!(count >= 1, "channels_split() needs at least one channel");
        assert!(
            self.splitter.current == 0 && self.splitter.count <= 1,
            "nested channels_split on draw list '{}'",
            self.owner_name
        );
        let clip_rect = self.current_clip_rect();
        let texture_id = self.current_texture_id();

        if self.splitter.channels.len() < count {
            self.splitter.channels.resize_with(count, DrawChannel::default);
        }
        self.splitter.count = count;

        // Slot 0 is a placeholder; its content lives in the list buffers.
        self.splitter.channels[0] = DrawChannel::default();
        for ch in self.splitter.channels.iter_mut().take(count).skip(1) {
            ch.cmd_buffer.clear();
            ch.idx_buffer.clear();
            ch.cmd_buffer.push(DrawCmd::new(clip_rect, texture_id));
        }
    }

    /// Routes subsequent geometry into channel `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn channels_set_current(&mut self, idx: usize) {
        assert!(
            idx < self.splitter.count,
            "channel {idx} out of range (count {})",
            self.splitter.count
        );
        if self.splitter.current == idx {
            return;
        }
        let current = self.splitter.current;
        let stored = &mut self.splitter.channels[current];
        mem::swap(&mut stored.cmd_buffer, &mut self.cmd_buffer);
        mem::swap(&mut stored.idx_buffer, &mut self.idx_buffer);

        self.splitter.current = idx;
        let next = &mut self.splitter.channels[idx];
        mem::swap(&mut next.cmd_buffer, &mut self.cmd_buffer);
        mem::swap(&mut next.idx_buffer, &mut self.idx_buffer);
        self.idx_write = self.idx_buffer.len();
    }

    /// Flattens all channels back into the list in channel order.
    pub fn channels_merge(&mut self) {
        if self.splitter.count <= 1 {
            return;
        }
        self.channels_set_current(0);
        if self.cmd_buffer.last().is_some_and(|c| c.elem_count == 0 && c.callback.is_none()) {
            self.cmd_buffer.pop();
        }

        let count = self.splitter.count;
        for i in 1..count {
            let ch = &mut self.splitter.channels[i];
            if ch.cmd_buffer.last().is_some_and(|c| c.elem_count == 0 && c.callback.is_none()) {
                ch.cmd_buffer.pop();
            }
            self.cmd_buffer.append(&mut ch.cmd_buffer);
            self.idx_buffer.append(&mut ch.idx_buffer);
        }
        self.idx_write = self.idx_buffer.len();
        self.splitter.count = 1;

        // Re-open a command for whatever is drawn next, without producing an
        // extra draw call when the last merged command already matches.
        self.update_clip_rect();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_core::color::pack_rgba;
    use tessera_core::Vec2;

    use crate::list::DrawList;
    use crate::shared::DrawListSharedData;

    fn rect(list: &mut DrawList, x: f32) {
        list.prim_reserve(6, 4);
        list.prim_rect(Vec2::new(x, 0.0), Vec2::new(x + 1.0, 1.0), pack_rgba(255, 255, 255, 255));
    }

    #[test]
    fn test_merge_orders_by_channel() {
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));
        list.channels_split(3);

        list.channels_set_current(2);
        rect(&mut list, 20.0);
        list.channels_set_current(0);
        rect(&mut list, 0.0);
        list.channels_set_current(1);
        list.push_clip_rect(Vec2::ZERO, Vec2::new(50.0, 50.0), false);
        rect(&mut list, 10.0);
        list.pop_clip_rect();
        list.channels_merge();

        assert_eq!(list.channels_count(), 1);
        assert_eq!(list.vtx_buffer.len(), 12);
        assert_eq!(list.idx_buffer.len(), 18);
        assert_eq!(list.total_elem_count(), 18);

        // Channel 0's quad (vertices 4..8) comes first in index order.
        assert_eq!(list.idx_buffer[0], 4);
        // Then channel 1 (vertices 8..12), then channel 2 (vertices 0..4).
        assert_eq!(list.idx_buffer[6], 8);
        assert_eq!(list.idx_buffer[12], 0);
        assert!(list.invariants_hold());
    }

    #[test]
    fn test_empty_channels_leave_no_commands() {
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));
        rect(&mut list, 0.0);
        list.channels_split(4);
        list.channels_merge();

        assert_eq!(list.cmd_buffer.iter().filter(|c| c.elem_count > 0).count(), 1);
        assert_eq!(list.total_elem_count(), 6);
    }

    #[test]
    #[should_panic(expected = "nested channels_split")]
    fn test_nested_split_panics() {
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));
        list.channels_split(2);
        list.channels_set_current(1);
        list.channels_split(2);
    }

    #[test]
    #[should_panic(expected = "needs at least one channel")]
    fn test_split_into_zero_channels_panics() {
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));
        list.channels_split(0);
    }
}
