use std::fmt;

use lamassu_engine::coords::Vec2;
use lamassu_engine::paint::Color;
use lamassu_engine::surface::Canvas;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Loaded fonts, shared read-only by every panel.
///
/// Glyphs are rasterized on demand at the canvas' physical scale, so text stays
/// sharp when a panel's texture is larger than its logical size.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType or OpenType font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Advance width of `text` at `size`, in logical pixels. Zero for unknown fonts.
    pub fn measure(&self, text: &str, font: FontId, size: f32) -> f32 {
        let Some(f) = self.get(font) else {
            return 0.0;
        };
        text.chars().map(|ch| f.metrics(ch, size).advance_width).sum()
    }

    /// Draws a single line of text with its top-left at `origin` (logical).
    ///
    /// Stops at the first glyph that would cross `max_width`. Returns the
    /// logical width drawn.
    pub fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
        max_width: Option<f32>,
    ) -> f32 {
        let Some(f) = self.get(font) else {
            return 0.0;
        };

        let scale = canvas.scale_factor().max(0.01);
        let px = size * scale;
        let ascent = f.horizontal_line_metrics(px).map_or(px * 0.8, |m| m.ascent);

        let start = canvas.map_point(origin);
        let limit = max_width.map(|w| start.x + w * scale);
        let baseline = start.y + ascent;
        let mut pen = start.x;

        for ch in text.chars() {
            let (m, coverage) = f.rasterize(ch, px);
            if limit.is_some_and(|l| pen + m.advance_width > l) {
                break;
            }
            let x = (pen + m.xmin as f32).round() as i32;
            let y = (baseline - m.height as f32 - m.ymin as f32).round() as i32;
            canvas.blend_mask(x, y, m.width, m.height, &coverage, color);
            pen += m.advance_width;
        }

        (pen - start.x) / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamassu_engine::coords::PixelSize;

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
        assert!(fonts.is_empty());
    }

    #[test]
    fn unknown_font_draws_nothing() {
        let fonts = FontSystem::new();
        let mut canvas = Canvas::new(PixelSize::new(16, 16)).unwrap();
        let w = fonts.draw_text(&mut canvas, "hi", FontId(3), 12.0, Color::from_srgb_u8(0, 0, 0, 255), Vec2::zero(), None);
        assert_eq!(w, 0.0);
        assert!(canvas.data().iter().all(|&b| b == 0));
        assert_eq!(fonts.measure("hi", FontId(3), 12.0), 0.0);
    }
}
