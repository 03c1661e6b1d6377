use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.x
            && p.y < self.origin.y + self.size.y
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Rect {
        Rect::from_origin_size(self.origin + offset, self.size)
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Shrinks the rectangle by `amount` on every side, clamping at zero size.
    #[inline]
    pub fn inset(self, amount: f32) -> Rect {
        Rect::new(
            self.origin.x + amount,
            self.origin.y + amount,
            (self.size.x - 2.0 * amount).max(0.0),
            (self.size.y - 2.0 * amount).max(0.0),
        )
    }

    /// Splits off a strip of `height` from the top.
    ///
    /// Returns `(top, rest)`; `height` is clamped to the rectangle's height.
    pub fn split_top(self, height: f32) -> (Rect, Rect) {
        let h = height.clamp(0.0, self.size.y.max(0.0));
        let top = Rect::new(self.origin.x, self.origin.y, self.size.x, h);
        let rest = Rect::new(self.origin.x, self.origin.y + h, self.size.x, self.size.y - h);
        (top, rest)
    }
}
