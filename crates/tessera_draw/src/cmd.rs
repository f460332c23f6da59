//! Draw commands: one GPU draw call each.

use std::fmt;
use std::sync::Arc;

use tessera_core::Rect;

use crate::list::DrawList;
use crate::vertex::TextureId;

/// User callback invoked by the renderer in place of an indexed draw.
#[derive(Clone)]
pub struct DrawCallback(Arc<dyn Fn(&DrawList, &DrawCmd) + Send + Sync>);

impl DrawCallback {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&DrawList, &DrawCmd) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the callback.
    pub fn call(&self, list: &DrawList, cmd: &DrawCmd) {
        (self.0)(list, cmd);
    }
}

impl fmt::Debug for DrawCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DrawCallback(..)")
    }
}

/// A batch of indices sharing one clip rectangle and texture.
#[derive(Debug, Clone)]
pub struct DrawCmd {
    /// Number of indices (multiple of 3) consumed from the list's index
    /// buffer, starting where the previous command ended.
    pub elem_count: u32,
    /// Clip rectangle in display coordinates.
    pub clip_rect: Rect,
    /// Texture to bind.
    pub texture_id: TextureId,
    /// If set, the renderer calls this instead of drawing.
    pub callback: Option<DrawCallback>,
}

impl DrawCmd {
    /// Creates an empty command.
    #[must_use]
    pub fn new(clip_rect: Rect, texture_id: TextureId) -> Self {
        Self {
            elem_count: 0,
            clip_rect,
            texture_id,
            callback: None,
        }
    }

    /// Returns true if geometry emitted now could be appended to this
    /// command without changing its state.
    #[inline]
    #[must_use]
    pub fn accepts(&self, clip_rect: &Rect, texture_id: TextureId) -> bool {
        self.callback.is_none() && self.clip_rect == *clip_rect && self.texture_id == texture_id
    }
}
