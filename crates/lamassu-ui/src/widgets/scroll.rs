use lamassu_engine::coords::Rect;
use lamassu_engine::paint::Color;

use crate::painter::Painter;

/// Vertical scroll offset for drag-to-scroll content.
///
/// The offset is in logical pixels (content shifted up by this amount) and is
/// always clamped to `[0, content_height - viewport_height]`.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    offset: f32,
    content_height: f32,
    viewport_height: f32,
    /// Offset when the current drag started.
    drag_base: Option<f32>,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Updates extents and re-clamps the offset.
    pub fn set_extents(&mut self, content_height: f32, viewport_height: f32) {
        self.content_height = content_height.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Adds `delta` (positive reveals content below). Returns `true` if the offset moved.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let prev = self.offset;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
        self.offset != prev
    }

    /// Applies a drag from `start_y` to `pos_y`. Content follows the pointer.
    pub fn drag(&mut self, start_y: f32, pos_y: f32) -> bool {
        let base = *self.drag_base.get_or_insert(self.offset);
        let prev = self.offset;
        self.offset = (base + (start_y - pos_y)).clamp(0.0, self.max_offset());
        self.offset != prev
    }

    pub fn end_drag(&mut self) {
        self.drag_base = None;
    }

    /// Track and thumb rectangles for a scrollbar on the right edge of `viewport`.
    pub fn scrollbar_rects(&self, viewport: Rect) -> Option<(Rect, Rect)> {
        if self.content_height <= viewport.size.y || viewport.size.y <= 0.0 {
            return None;
        }
        let bar_w: f32 = 6.0;
        let bar_x = viewport.origin.x + viewport.size.x - bar_w;
        let track = Rect::new(bar_x, viewport.origin.y, bar_w, viewport.size.y);

        let ratio = viewport.size.y / self.content_height;
        let thumb_h = (viewport.size.y * ratio).max(24.0).min(viewport.size.y);
        let range = self.max_offset();
        let t = if range > 0.0 { self.offset / range } else { 0.0 };
        let thumb_y = viewport.origin.y + t * (viewport.size.y - thumb_h);

        Some((track, Rect::new(bar_x, thumb_y, bar_w, thumb_h)))
    }

    pub fn paint_scrollbar(&self, painter: &mut Painter, viewport: Rect) {
        if let Some((track, thumb)) = self.scrollbar_rects(viewport) {
            painter.fill_rounded_rect(track, 3.0, Color::from_straight(0.15, 0.15, 0.15, 0.3));
            painter.fill_rounded_rect(thumb, 3.0, Color::from_straight(0.35, 0.35, 0.35, 0.8));
        }
    }
}
