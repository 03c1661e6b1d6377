use resvg::tiny_skia::{self, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use crate::coords::{PixelSize, Rect, Vec2};
use crate::paint::Color;

/// Drawing target handed to panel content.
///
/// Wraps a premultiplied RGBA8 pixmap plus the current transform. Content draws
/// in logical pixels; the transform (set by the surface from the scaling policy)
/// maps them onto the buffer.
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
    /// Surface generation that allocated this buffer.
    pub(crate) generation: u64,
}

impl Canvas {
    /// Creates a transparent canvas. `None` for zero-sized buffers.
    pub fn new(size: PixelSize) -> Option<Self> {
        Self::for_generation(size, 0)
    }

    pub(crate) fn for_generation(size: PixelSize, generation: u64) -> Option<Self> {
        let pixmap = Pixmap::new(size.width, size.height)?;
        Some(Self {
            pixmap,
            transform: Transform::identity(),
            generation,
        })
    }

    #[inline]
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.pixmap.width(), self.pixmap.height())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    // ── transform ─────────────────────────────────────────────────────────

    pub fn reset_transform(&mut self) {
        self.transform = Transform::identity();
    }

    /// Applies a uniform scale on top of the current transform.
    pub fn scale(&mut self, factor: f32) {
        self.transform = self.transform.pre_scale(factor, factor);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_translate(dx, dy);
    }

    /// Horizontal scale of the current transform (logical → buffer pixels).
    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.transform.sx
    }

    /// Maps a logical point to buffer pixel coordinates.
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        let mut pts = [tiny_skia::Point::from_xy(p.x, p.y)];
        self.transform.map_points(&mut pts);
        Vec2::new(pts[0].x, pts[0].y)
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Fills the whole buffer, ignoring the transform.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = tiny_skia::Rect::from_xywh(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y) else {
            return;
        };
        let paint = solid(color);
        self.pixmap.fill_rect(r, &paint, self.transform, None);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        self.pixmap.fill_path(&path, &solid(color), FillRule::Winding, self.transform, None);
    }

    /// Rounded rectangle; `radius` is clamped to half the shorter side.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        if rect.is_empty() {
            return;
        }
        let r = radius.clamp(0.0, rect.size.x.min(rect.size.y) * 0.5);
        if r <= 0.0 {
            self.fill_rect(rect, color);
            return;
        }

        let (x0, y0) = (rect.origin.x, rect.origin.y);
        let (x1, y1) = (x0 + rect.size.x, y0 + rect.size.y);

        let mut pb = PathBuilder::new();
        pb.move_to(x0 + r, y0);
        pb.line_to(x1 - r, y0);
        pb.quad_to(x1, y0, x1, y0 + r);
        pb.line_to(x1, y1 - r);
        pb.quad_to(x1, y1, x1 - r, y1);
        pb.line_to(x0 + r, y1);
        pb.quad_to(x0, y1, x0, y1 - r);
        pb.line_to(x0, y0 + r);
        pb.quad_to(x0, y0, x0 + r, y0);
        pb.close();

        let Some(path) = pb.finish() else {
            return;
        };
        self.pixmap.fill_path(&path, &solid(color), FillRule::Winding, self.transform, None);
    }

    /// Blends an 8-bit coverage mask (e.g. a rasterized glyph) at buffer pixel
    /// position `(x, y)`, ignoring the transform.
    pub fn blend_mask(&mut self, x: i32, y: i32, width: usize, height: usize, coverage: &[u8], color: Color) {
        if width == 0 || height == 0 || coverage.len() < width * height {
            return;
        }
        let Some(mut glyph) = Pixmap::new(width as u32, height as u32) else {
            return;
        };
        for (px, &c) in glyph.data_mut().chunks_exact_mut(4).zip(coverage) {
            px.copy_from_slice(&color.with_coverage(c as f32 / 255.0).to_premul_u8());
        }
        self.pixmap.draw_pixmap(
            x,
            y,
            glyph.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    // ── readback ──────────────────────────────────────────────────────────

    /// Premultiplied RGBA bytes of the pixel at buffer position `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Tightly packed premultiplied RGBA8 rows.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}
