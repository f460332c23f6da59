//! Font atlas packing, glyph lookup and text mesh emission.
//!
//! Rasterization is the host's job: it hands in one alpha bitmap per glyph
//! ([`GlyphBitmap`]) and the atlas packs them into a single texture with a
//! white texel reserved for solid fills. After [`FontAtlas::build`] each
//! [`Font`] maps codepoints to quads and UVs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tessera_core::color::PackedColor;
use tessera_core::{Rect, Vec2};

use crate::error::{AtlasError, AtlasResult};
use crate::list::DrawList;
use crate::vertex::TextureId;

/// Atlas shared between a host and the contexts that render with it.
pub type SharedFontAtlas = Arc<RwLock<FontAtlas>>;

/// Index of a font inside its atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontIndex(pub usize);

/// Alpha bitmap and metrics of one glyph, supplied by the host rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    /// Codepoint.
    pub codepoint: char,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Offset from the pen position (top of the line) to the bitmap's
    /// top-left corner.
    pub offset: Vec2,
    /// Horizontal pen advance.
    pub advance_x: f32,
    /// `width * height` coverage values, row-major.
    pub pixels: Vec<u8>,
}

/// A font to be packed.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Name for diagnostics.
    pub name: String,
    /// Height of a line at scale 1.
    pub size_pixels: f32,
    /// Glyph used for missing codepoints.
    pub fallback_char: char,
    /// Glyph bitmaps.
    pub glyphs: Vec<GlyphBitmap>,
}

impl FontConfig {
    /// Creates an empty font configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, size_pixels: f32) -> Self {
        Self {
            name: name.into(),
            size_pixels,
            fallback_char: '?',
            glyphs: Vec::new(),
        }
    }

    /// Adds a glyph.
    #[must_use]
    pub fn with_glyph(mut self, glyph: GlyphBitmap) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Placeholder font drawing every printable ASCII character as an
    /// outlined box. Lets the engine run and measure text without a
    /// rasterizer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn box_glyphs(size_pixels: f32) -> Self {
        let w = (size_pixels * 0.5).round().max(1.0) as u32;
        let h = (size_pixels * 0.7).round().max(1.0) as u32;
        let top = ((size_pixels - h as f32) * 0.5).floor();

        let mut config = Self::new("box", size_pixels);
        for code in 0x20u8..=0x7E {
            let codepoint = char::from(code);
            let (width, height, pixels) = if codepoint == ' ' {
                (0, 0, Vec::new())
            } else {
                let mut pixels = vec![0u8; (w * h) as usize];
                for y in 0..h {
                    for x in 0..w {
                        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                            pixels[(y * w + x) as usize] = 0xFF;
                        }
                    }
                }
                (w, h, pixels)
            };
            config.glyphs.push(GlyphBitmap {
                codepoint,
                width,
                height,
                offset: Vec2::new(0.0, top),
                advance_x: (w + 1) as f32,
                pixels,
            });
        }
        config
    }
}

/// A packed glyph: quad relative to the pen position, plus UVs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Codepoint.
    pub codepoint: char,
    /// Horizontal pen advance at the font's native size.
    pub advance_x: f32,
    /// Left edge of the quad.
    pub x0: f32,
    /// Top edge of the quad.
    pub y0: f32,
    /// Right edge of the quad.
    pub x1: f32,
    /// Bottom edge of the quad.
    pub y1: f32,
    /// Left texture coordinate.
    pub u0: f32,
    /// Top texture coordinate.
    pub v0: f32,
    /// Right texture coordinate.
    pub u1: f32,
    /// Bottom texture coordinate.
    pub v1: f32,
}

impl Glyph {
    /// Returns true if the glyph has no pixels (e.g. a space).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// A font ready for measurement and rendering.
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    font_size: f32,
    glyphs: Vec<Glyph>,
    lookup: HashMap<char, usize>,
    fallback: Option<usize>,
    texture_id: TextureId,
}

impl Font {
    /// Font name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native line height in pixels.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Texture holding this font's glyphs.
    #[must_use]
    pub fn texture_id(&self) -> TextureId {
        self.texture_id
    }

    /// Number of glyphs.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Looks up a glyph without substituting the fallback.
    #[must_use]
    pub fn find_glyph_no_fallback(&self, c: char) -> Option<&Glyph> {
        self.lookup.get(&c).map(|&i| &self.glyphs[i])
    }

    /// Looks up a glyph, substituting the fallback glyph for missing ones.
    #[must_use]
    pub fn find_glyph(&self, c: char) -> Option<&Glyph> {
        self.find_glyph_no_fallback(c)
            .or_else(|| self.fallback.map(|i| &self.glyphs[i]))
    }

    /// Pen advance for `c` at native size.
    #[must_use]
    pub fn char_advance(&self, c: char) -> f32 {
        self.find_glyph(c).map_or(0.0, |g| g.advance_x)
    }

    /// Size of `text` rendered at `size` pixels. Width is the longest line;
    /// height is the number of lines times `size`.
    #[must_use]
    pub fn calc_text_size(&self, size: f32, text: &str) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }
        let scale = size / self.font_size;
        let mut max_width = 0.0f32;
        let mut line_width = 0.0f32;
        let mut lines = 1u32;
        for c in text.chars() {
            match c {
                '\n' => {
                    max_width = max_width.max(line_width);
                    line_width = 0.0;
                    lines += 1;
                }
                '\r' => {}
                _ => line_width += self.char_advance(c) * scale,
            }
        }
        max_width = max_width.max(line_width);
        #[allow(clippy::cast_precision_loss)]
        Vec2::new(max_width, lines as f32 * size)
    }

    /// Emits textured quads for `text` into `list`. Glyphs outside
    /// `clip_rect` are culled.
    pub fn render_text(&self, list: &mut DrawList, size: f32, pos: Vec2, col: PackedColor, clip_rect: &Rect, text: &str) {
        let scale = size / self.font_size;
        let visible = |x: f32, y: f32, g: &Glyph| {
            !g.is_blank()
                && x + g.x0 * scale <= clip_rect.max.x
                && x + g.x1 * scale >= clip_rect.min.x
                && y + g.y0 * scale <= clip_rect.max.y
                && y + g.y1 * scale >= clip_rect.min.y
        };

        let mut quad_count = 0usize;
        self.walk(text, pos, size, scale, |x, y, g| {
            if visible(x, y, g) {
                quad_count += 1;
            }
        });
        if quad_count == 0 {
            return;
        }

        list.prim_reserve(quad_count * 6, quad_count * 4);
        self.walk(text, pos, size, scale, |x, y, g| {
            if visible(x, y, g) {
                list.prim_rect_uv(
                    Vec2::new(x + g.x0 * scale, y + g.y0 * scale),
                    Vec2::new(x + g.x1 * scale, y + g.y1 * scale),
                    Vec2::new(g.u0, g.v0),
                    Vec2::new(g.u1, g.v1),
                    col,
                );
            }
        });
    }

    /// Visits every glyph with its pen position.
    fn walk(&self, text: &str, pos: Vec2, line_height: f32, scale: f32, mut f: impl FnMut(f32, f32, &Glyph)) {
        let mut x = pos.x;
        let mut y = pos.y;
        for c in text.chars() {
            match c {
                '\n' => {
                    x = pos.x;
                    y += line_height;
                }
                '\r' => {}
                _ => {
                    if let Some(g) = self.find_glyph(c) {
                        f(x, y, g);
                        x += g.advance_x * scale;
                    }
                }
            }
        }
    }
}

/// Placement of one rectangle in the atlas.
#[derive(Debug, Clone, Copy)]
struct PackRect {
    w: u32,
    h: u32,
    x: u32,
    y: u32,
    codepoint: char,
}

/// Packs fonts into one alpha8 texture.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    /// Renderer handle for the texture, set by the host after upload.
    pub texture_id: TextureId,
    /// Texture width to pack into.
    pub tex_desired_width: u32,
    /// Maximum texture height before packing fails.
    pub tex_max_height: u32,
    /// Empty pixels between packed glyphs.
    pub tex_glyph_padding: u32,

    configs: Vec<FontConfig>,
    fonts: Vec<Font>,
    tex_width: u32,
    tex_height: u32,
    tex_pixels_alpha8: Vec<u8>,
    tex_uv_white_pixel: Vec2,
    built: bool,
}

impl FontAtlas {
    /// Size of the white block reserved for solid fills.
    const WHITE_BLOCK: u32 = 2;

    /// Creates an empty atlas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            texture_id: TextureId::default(),
            tex_desired_width: 512,
            tex_max_height: 4096,
            tex_glyph_padding: 1,
            configs: Vec::new(),
            fonts: Vec::new(),
            tex_width: 0,
            tex_height: 0,
            tex_pixels_alpha8: Vec::new(),
            tex_uv_white_pixel: Vec2::ZERO,
            built: false,
        }
    }

    /// Wraps the atlas for sharing.
    #[must_use]
    pub fn into_shared(self) -> SharedFontAtlas {
        Arc::new(RwLock::new(self))
    }

    /// Queues a font for the next build.
    pub fn add_font(&mut self, config: FontConfig) -> FontIndex {
        self.configs.push(config);
        self.built = false;
        FontIndex(self.configs.len() - 1)
    }

    /// Number of fonts queued.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.configs.len()
    }

    /// Returns true once [`Self::build`] has succeeded for the current
    /// font set.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Returns a built font.
    #[must_use]
    pub fn font(&self, index: FontIndex) -> Option<&Font> {
        if self.built {
            self.fonts.get(index.0)
        } else {
            None
        }
    }

    /// UV of a white texel.
    #[must_use]
    pub fn tex_uv_white_pixel(&self) -> Vec2 {
        self.tex_uv_white_pixel
    }

    /// Texture size in pixels.
    #[must_use]
    pub fn tex_size(&self) -> (u32, u32) {
        (self.tex_width, self.tex_height)
    }

    /// Alpha8 pixels, `width * height` bytes.
    #[must_use]
    pub fn tex_data_alpha8(&self) -> &[u8] {
        &self.tex_pixels_alpha8
    }

    /// RGBA32 pixels (white with alpha coverage), for backends without an
    /// alpha-only format.
    #[must_use]
    pub fn tex_data_rgba32(&self) -> Vec<u8> {
        self.tex_pixels_alpha8
            .iter()
            .flat_map(|&a| [0xFF, 0xFF, 0xFF, a])
            .collect()
    }

    /// Drops fonts and texture data.
    pub fn clear(&mut self) {
        self.configs.clear();
        self.fonts.clear();
        self.tex_pixels_alpha8.clear();
        self.tex_width = 0;
        self.tex_height = 0;
        self.built = false;
    }

    /// Packs every queued font into the texture.
    ///
    /// # Errors
    ///
    /// Returns an error if a glyph bitmap is malformed, a glyph does not fit
    /// the texture width, or the packed height exceeds `tex_max_height`.
    /// The atlas is left unbuilt on failure.
    pub fn build(&mut self) -> AtlasResult<()> {
        self.built = false;
        self.validate()?;

        let pad = self.tex_glyph_padding;
        let width = self.tex_desired_width;

        // Slot 0 is the white block; glyphs follow in font order.
        let mut rects = Vec::with_capacity(1 + self.configs.iter().map(|c| c.glyphs.len()).sum::<usize>());
        rects.push(PackRect {
            w: Self::WHITE_BLOCK,
            h: Self::WHITE_BLOCK,
            x: 0,
            y: 0,
            codepoint: '\0',
        });
        for cfg in &self.configs {
            for g in &cfg.glyphs {
                rects.push(PackRect {
                    w: g.width,
                    h: g.height,
                    x: 0,
                    y: 0,
                    codepoint: g.codepoint,
                });
            }
        }

        let used_height = shelf_pack(&mut rects, width, pad)?;
        let height = used_height.next_power_of_two();
        if height > self.tex_max_height {
            return Err(AtlasError::PackingOverflow {
                required: used_height,
                max: self.tex_max_height,
            });
        }

        self.tex_width = width;
        self.tex_height = height;
        self.tex_pixels_alpha8.clear();
        self.tex_pixels_alpha8.resize((width * height) as usize, 0);

        let white = rects[0];
        for y in white.y..white.y + white.h {
            let row = (y * width) as usize;
            for x in white.x..white.x + white.w {
                self.tex_pixels_alpha8[row + x as usize] = 0xFF;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let uv_scale = Vec2::new(1.0 / width as f32, 1.0 / height as f32);
        #[allow(clippy::cast_precision_loss)]
        {
            self.tex_uv_white_pixel = Vec2::new((white.x as f32 + 0.5) * uv_scale.x, (white.y as f32 + 0.5) * uv_scale.y);
        }

        let mut fonts = Vec::with_capacity(self.configs.len());
        let mut slot = 1;
        for cfg in &self.configs {
            let mut font = Font {
                name: cfg.name.clone(),
                font_size: cfg.size_pixels,
                glyphs: Vec::with_capacity(cfg.glyphs.len()),
                lookup: HashMap::with_capacity(cfg.glyphs.len()),
                fallback: None,
                texture_id: self.texture_id,
            };
            for g in &cfg.glyphs {
                let r = rects[slot];
                slot += 1;
                for row in 0..g.height {
                    let src = (row * g.width) as usize;
                    let dst = ((r.y + row) * width + r.x) as usize;
                    self.tex_pixels_alpha8[dst..dst + g.width as usize]
                        .copy_from_slice(&g.pixels[src..src + g.width as usize]);
                }
                #[allow(clippy::cast_precision_loss)]
                let glyph = Glyph {
                    codepoint: g.codepoint,
                    advance_x: g.advance_x,
                    x0: g.offset.x,
                    y0: g.offset.y,
                    x1: g.offset.x + g.width as f32,
                    y1: g.offset.y + g.height as f32,
                    u0: r.x as f32 * uv_scale.x,
                    v0: r.y as f32 * uv_scale.y,
                    u1: (r.x + r.w) as f32 * uv_scale.x,
                    v1: (r.y + r.h) as f32 * uv_scale.y,
                };
                font.lookup.insert(g.codepoint, font.glyphs.len());
                font.glyphs.push(glyph);
            }
            font.fallback = font.lookup.get(&cfg.fallback_char).copied();
            if font.fallback.is_none() {
                tracing::warn!(
                    "font '{}' has no fallback glyph {:?}; missing glyphs will not render",
                    cfg.name,
                    cfg.fallback_char
                );
            }
            fonts.push(font);
        }

        self.fonts = fonts;
        self.built = true;
        tracing::debug!(
            "font atlas built: {} fonts, {}x{} texture",
            self.fonts.len(),
            self.tex_width,
            self.tex_height
        );
        Ok(())
    }

    /// Updates the texture handle on the atlas and every built font.
    pub fn set_texture_id(&mut self, texture_id: TextureId) {
        self.texture_id = texture_id;
        for font in &mut self.fonts {
            font.texture_id = texture_id;
        }
    }

    fn validate(&self) -> AtlasResult<()> {
        for cfg in &self.configs {
            if cfg.size_pixels <= 0.0 {
                return Err(AtlasError::InvalidFontSize(cfg.name.clone()));
            }
            for g in &cfg.glyphs {
                let expected = (g.width * g.height) as usize;
                if g.pixels.len() != expected {
                    return Err(AtlasError::BadGlyphData {
                        font: cfg.name.clone(),
                        codepoint: g.codepoint,
                        expected,
                        actual: g.pixels.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}

/// Shelf packer: tallest rectangles first, left to right, new shelf when a
/// row is full. Returns the used height.
fn shelf_pack(rects: &mut [PackRect], width: u32, pad: u32) -> AtlasResult<u32> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| rects[b].h.cmp(&rects[a].h));

    let mut x = pad;
    let mut y = pad;
    let mut shelf_h = 0;
    for i in order {
        let r = &mut rects[i];
        if r.w + 2 * pad > width {
            return Err(AtlasError::GlyphTooWide {
                codepoint: r.codepoint,
                width: r.w + 2 * pad,
                tex_width: width,
            });
        }
        if x + r.w + pad > width {
            x = pad;
            y += shelf_h + pad;
            shelf_h = 0;
        }
        r.x = x;
        r.y = y;
        x += r.w + pad;
        shelf_h = shelf_h.max(r.h);
    }
    Ok(y + shelf_h + pad)
}

#[cfg(test)]
mod tests {
    use tessera_core::color::COL32_WHITE;

    use super::*;
    use crate::shared::DrawListSharedData;

    fn built_box_atlas() -> (FontAtlas, FontIndex) {
        let mut atlas = FontAtlas::new();
        let idx = atlas.add_font(FontConfig::box_glyphs(16.0));
        atlas.build().unwrap();
        (atlas, idx)
    }

    #[test]
    fn test_box_font_builds() {
        let (atlas, idx) = built_box_atlas();
        let font = atlas.font(idx).unwrap();

        assert_eq!(font.glyph_count(), 95);
        assert!(font.find_glyph_no_fallback('A').is_some());
        let (w, h) = atlas.tex_size();
        assert_eq!(atlas.tex_data_alpha8().len(), (w * h) as usize);
        assert!(h.is_power_of_two());
    }

    #[test]
    fn test_white_pixel_is_opaque() {
        let (atlas, _) = built_box_atlas();
        let (w, h) = atlas.tex_size();
        let uv = atlas.tex_uv_white_pixel();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let (px, py) = ((uv.x * w as f32) as u32, (uv.y * h as f32) as u32);
        assert_eq!(atlas.tex_data_alpha8()[(py * w + px) as usize], 0xFF);
    }

    #[test]
    fn test_missing_glyph_uses_fallback() {
        let (atlas, idx) = built_box_atlas();
        let font = atlas.font(idx).unwrap();

        assert!(font.find_glyph_no_fallback('é').is_none());
        assert_eq!(font.find_glyph('é').unwrap().codepoint, '?');
    }

    #[test]
    fn test_text_size_counts_lines() {
        let (atlas, idx) = built_box_atlas();
        let font = atlas.font(idx).unwrap();
        let adv = font.char_advance('a');

        let size = font.calc_text_size(16.0, "ab\nabcd");
        assert!((size.x - adv * 4.0).abs() < 1e-4);
        assert!((size.y - 32.0).abs() < 1e-4);
        assert_eq!(font.calc_text_size(16.0, ""), Vec2::ZERO);
    }

    #[test]
    fn test_bad_glyph_data_is_reported() {
        let mut atlas = FontAtlas::new();
        atlas.add_font(FontConfig::new("broken", 12.0).with_glyph(GlyphBitmap {
            codepoint: 'x',
            width: 4,
            height: 4,
            offset: Vec2::ZERO,
            advance_x: 5.0,
            pixels: vec![0; 3],
        }));

        let err = atlas.build().unwrap_err();
        assert!(matches!(err, AtlasError::BadGlyphData { codepoint: 'x', expected: 16, actual: 3, .. }));
        assert!(!atlas.is_built());
    }

    #[test]
    fn test_packing_overflow_is_reported() {
        let mut atlas = FontAtlas::new();
        atlas.tex_desired_width = 64;
        atlas.tex_max_height = 64;
        atlas.add_font(FontConfig::box_glyphs(40.0));

        assert!(matches!(atlas.build(), Err(AtlasError::PackingOverflow { max: 64, .. })));
    }

    #[test]
    fn test_render_text_emits_quads_for_visible_glyphs() {
        let (atlas, idx) = built_box_atlas();
        let font = atlas.font(idx).unwrap();
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));

        list.add_text(font, 16.0, Vec2::new(10.0, 10.0), COL32_WHITE, "a b");

        // The space is blank, so two quads.
        assert_eq!(list.vtx_buffer.len(), 8);
        assert_eq!(list.idx_buffer.len(), 12);
        assert!(list.invariants_hold());
    }

    #[test]
    fn test_render_text_culls_outside_clip() {
        let (atlas, idx) = built_box_atlas();
        let font = atlas.font(idx).unwrap();
        let mut list = DrawList::new(Arc::new(DrawListSharedData::new()));
        list.push_clip_rect(Vec2::ZERO, Vec2::new(100.0, 100.0), false);

        list.add_text(font, 16.0, Vec2::new(10.0, 500.0), COL32_WHITE, "hidden");
        assert!(list.vtx_buffer.is_empty());
    }
}
