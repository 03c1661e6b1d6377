use std::fmt;

/// Texture / canvas size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A panel texture needs both dimensions to be non-zero.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    #[inline]
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Scales both dimensions by `density`, rounding and keeping at least one pixel.
    pub fn scaled(self, density: f32) -> PixelSize {
        let density = if density.is_finite() && density > 0.0 { density } else { 1.0 };
        let scale = |v: u32| ((v as f32 * density).round() as u32).max(1);
        PixelSize::new(scale(self.width), scale(self.height))
    }

    #[inline]
    pub fn to_logical(self) -> LogicalSize {
        LogicalSize::new(self.width as f32, self.height as f32)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Panel layout size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LogicalSize {
    pub width: f32,
    pub height: f32,
}

impl LogicalSize {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_rounds_and_keeps_one_pixel() {
        assert_eq!(PixelSize::new(200, 100).scaled(1.5), PixelSize::new(300, 150));
        assert_eq!(PixelSize::new(1, 1).scaled(0.1), PixelSize::new(1, 1));
    }

    #[test]
    fn scaled_ignores_nonsense_density() {
        assert_eq!(PixelSize::new(64, 32).scaled(f32::NAN), PixelSize::new(64, 32));
        assert_eq!(PixelSize::new(64, 32).scaled(-2.0), PixelSize::new(64, 32));
    }

    #[test]
    fn zero_dimension_is_invalid() {
        assert!(!PixelSize::new(0, 10).is_valid());
        assert!(!PixelSize::new(10, 0).is_valid());
        assert!(PixelSize::new(1, 1).is_valid());
    }
}
