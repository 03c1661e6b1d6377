use lamassu_engine::coords::{Rect, Vec2};
use lamassu_engine::paint::Color;
use lamassu_engine::surface::Canvas;

use crate::text::{FontId, FontSystem};

/// Drawing API passed to [`Widget::paint`](crate::Widget::paint).
///
/// Coordinates are logical pixels; the canvas transform already maps them onto
/// the panel texture.
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    fonts: &'a FontSystem,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut Canvas, fonts: &'a FontSystem) -> Self {
        Self { canvas, fonts }
    }

    /// Texture pixels per logical pixel for this frame.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.canvas.scale_factor()
    }

    pub fn fonts(&self) -> &FontSystem {
        self.fonts
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.fill_rect(rect, color);
    }

    /// Pass `radius = 0.0` for sharp corners.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.canvas.fill_rounded_rect(rect, radius, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.canvas.fill_circle(center, radius, color);
    }

    /// One line of text at `origin` (top-left). Skipped when `font` is `None`.
    pub fn text(&mut self, text: &str, font: Option<FontId>, size: f32, color: Color, origin: Vec2, max_width: Option<f32>) {
        if let Some(font) = font {
            self.fonts.draw_text(self.canvas, text, font, size, color, origin, max_width);
        }
    }

    pub fn measure_text(&self, text: &str, font: Option<FontId>, size: f32) -> f32 {
        font.map_or(0.0, |f| self.fonts.measure(text, f, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamassu_engine::coords::PixelSize;

    #[test]
    fn painter_draws_through_canvas_transform() {
        let fonts = FontSystem::new();
        let mut canvas = Canvas::new(PixelSize::new(20, 20)).unwrap();
        canvas.scale(2.0);
        let mut painter = Painter::new(&mut canvas, &fonts);
        assert_eq!(painter.scale(), 2.0);

        painter.fill_rect(Rect::new(5.0, 5.0, 2.0, 2.0), Color::from_srgb_u8(0, 0, 255, 255));
        painter.text("ignored", None, 12.0, Color::from_srgb_u8(0, 0, 0, 255), Vec2::zero(), None);

        assert_eq!(canvas.pixel(11, 11), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
    }
}
