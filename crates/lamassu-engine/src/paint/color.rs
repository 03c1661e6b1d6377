use resvg::tiny_skia;

/// Premultiplied RGBA color in sRGB space.
///
/// Invariant: `rgb` components are already multiplied by `a`. Canvases and
/// panel textures store premultiplied pixels, so no conversion happens on upload.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Scales every channel (alpha included) by `coverage` in `[0, 1]`.
    ///
    /// Used for glyph and anti-aliasing coverage; stays premultiplied.
    #[inline]
    pub fn with_coverage(self, coverage: f32) -> Self {
        let c = coverage.clamp(0.0, 1.0);
        Self { r: self.r * c, g: self.g * c, b: self.b * c, a: self.a * c }
    }

    /// Premultiplied RGBA bytes.
    #[inline]
    pub fn to_premul_u8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        let (r, g, b, a) = self.to_straight();
        tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_rgb_and_rgba() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::from_srgb_u8(255, 0, 0, 255)));
        let half = Color::from_hex("00ff0080").unwrap();
        assert!((half.a - 128.0 / 255.0).abs() < 1e-6);
        assert!((half.g - half.a).abs() < 1e-6);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn coverage_keeps_premultiplication() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 1.0).with_coverage(0.5);
        assert!(c.r <= c.a && c.g <= c.a);
        assert_eq!(c.to_premul_u8(), [128, 64, 0, 128]);
    }
}
