//! GPU-facing vertex layout.

use tessera_core::color::PackedColor;
use tessera_core::Vec2;

/// Index type. 32-bit so a single list never needs to be split at 64k
/// vertices.
pub type DrawIdx = u32;

/// Opaque texture handle owned by the renderer backend.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextureId(pub u64);

impl TextureId {
    /// Creates a texture id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Vertex for UI rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVert {
    /// Position (x, y) in display coordinates.
    pub pos: [f32; 2],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Packed color, `0xAABBGGRR`.
    pub col: PackedColor,
}

impl DrawVert {
    /// Creates a new vertex.
    #[inline]
    #[must_use]
    pub fn new(pos: Vec2, uv: Vec2, col: PackedColor) -> Self {
        Self {
            pos: [pos.x, pos.y],
            uv: [uv.x, uv.y],
            col,
        }
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pos[0], self.pos[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<DrawVert>(), 20);
        let verts = [DrawVert::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 0xFFFF_FFFF); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 40);
    }
}
