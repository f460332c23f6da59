//! RGBA colors.
//!
//! Style tables hold [`Color`] (four floats); vertices carry a
//! [`PackedColor`] with red in the low byte and alpha in the high byte,
//! which is what a renderer binds as a normalized `u8x4` attribute.

use serde::{Deserialize, Serialize};

/// A vertex color packed as `0xAABBGGRR`.
pub type PackedColor = u32;

/// Bit offset of the red channel in a [`PackedColor`].
pub const COL32_R_SHIFT: u32 = 0;
/// Bit offset of the green channel in a [`PackedColor`].
pub const COL32_G_SHIFT: u32 = 8;
/// Bit offset of the blue channel in a [`PackedColor`].
pub const COL32_B_SHIFT: u32 = 16;
/// Bit offset of the alpha channel in a [`PackedColor`].
pub const COL32_A_SHIFT: u32 = 24;
/// Mask selecting the alpha channel of a [`PackedColor`].
pub const COL32_A_MASK: u32 = 0xFF00_0000;

/// Packs four 8-bit channels.
#[inline]
#[must_use]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> PackedColor {
    ((a as u32) << COL32_A_SHIFT)
        | ((b as u32) << COL32_B_SHIFT)
        | ((g as u32) << COL32_G_SHIFT)
        | ((r as u32) << COL32_R_SHIFT)
}

/// Opaque white, packed.
pub const COL32_WHITE: PackedColor = pack_rgba(255, 255, 255, 255);
/// Opaque black, packed.
pub const COL32_BLACK: PackedColor = pack_rgba(0, 0, 0, 255);

/// Returns the packed color with its alpha channel cleared.
#[inline]
#[must_use]
pub const fn transparent(col: PackedColor) -> PackedColor {
    col & !COL32_A_MASK
}

/// Returns true if the packed color is fully transparent.
#[inline]
#[must_use]
pub const fn is_invisible(col: PackedColor) -> bool {
    col & COL32_A_MASK == 0
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value `0xRRGGBBAA`.
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Unpacks a vertex color.
    #[must_use]
    pub fn from_packed(col: PackedColor) -> Self {
        let s = 1.0 / 255.0;
        Self::rgba(
            ((col >> COL32_R_SHIFT) & 0xFF) as f32 * s,
            ((col >> COL32_G_SHIFT) & 0xFF) as f32 * s,
            ((col >> COL32_B_SHIFT) & 0xFF) as f32 * s,
            ((col >> COL32_A_SHIFT) & 0xFF) as f32 * s,
        )
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Packs to a vertex color, saturating each channel to `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_packed(self) -> PackedColor {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        pack_rgba(q(self.r), q(self.g), q(self.b), q(self.a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(v: [f32; 4]) -> Self {
        Self::rgba(v[0], v[1], v[2], v[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_rgba(0x11, 0x22, 0x33, 0x44), 0x4433_2211);
        assert_eq!(Color::WHITE.to_packed(), COL32_WHITE);
        assert_eq!(Color::BLACK.to_packed(), COL32_BLACK);
    }

    #[test]
    fn test_packed_alpha_helpers() {
        let col = pack_rgba(10, 20, 30, 200);
        assert!(!is_invisible(col));
        assert!(is_invisible(transparent(col)));
        assert_eq!(transparent(col) & 0x00FF_FFFF, col & 0x00FF_FFFF);
    }

    #[test]
    fn test_unpack_roundtrip_is_close() {
        let c = Color::rgba(0.25, 0.5, 0.75, 1.0);
        let back = Color::from_packed(c.to_packed());
        assert!((back.g - 0.5).abs() < 1.0 / 255.0);
    }
}
