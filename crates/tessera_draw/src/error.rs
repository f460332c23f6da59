//! # Draw Error Types
//!
//! Only the font atlas build can fail at runtime; everything else in the
//! draw list is either infallible or a caller bug caught by assertions.

use thiserror::Error;

/// Errors that can occur while building a font atlas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// A glyph bitmap's pixel buffer does not match its declared size.
    #[error("bad glyph data for {codepoint:?} in font '{font}': expected {expected} bytes, got {actual}")]
    BadGlyphData {
        /// Font name.
        font: String,
        /// Offending glyph.
        codepoint: char,
        /// `width * height`.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// A font was configured with a non-positive pixel size.
    #[error("invalid pixel size for font '{0}'")]
    InvalidFontSize(String),

    /// A single glyph is wider than the atlas texture.
    #[error("glyph {codepoint:?} is {width}px wide, atlas is {tex_width}px")]
    GlyphTooWide {
        /// Offending glyph.
        codepoint: char,
        /// Glyph width including padding.
        width: u32,
        /// Atlas texture width.
        tex_width: u32,
    },

    /// Packed glyphs do not fit in the maximum texture height.
    #[error("atlas packing overflow: need {required}px of height, limit is {max}px")]
    PackingOverflow {
        /// Height the packer needed.
        required: u32,
        /// Configured limit.
        max: u32,
    },
}

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;
