//! Off-screen producer surfaces.
//!
//! An [`OffscreenSurface`] binds one panel texture to a small queue of
//! [`Canvas`] buffers. The UI thread borrows a buffer (`begin_draw`), paints,
//! and hands it back (`end_draw`); the render thread latches the latest
//! published buffer into the texture (`update_texture`). Only one side holds a
//! given buffer at a time.

mod canvas;
mod offscreen;

pub use canvas::Canvas;
pub use offscreen::{OffscreenSurface, DEFAULT_MAX_BUFFERS};

/// Uniform scale from logical content width to backing buffer width.
///
/// Height is not fitted independently: content keeps its aspect and follows
/// the same factor. Returns `1.0` for degenerate logical widths.
#[inline]
pub fn fit_width_scale(texture_width: u32, logical_width: f32) -> f32 {
    if !logical_width.is_finite() || logical_width <= 0.0 {
        return 1.0;
    }
    texture_width as f32 / logical_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_when_texture_is_twice_as_wide() {
        assert_eq!(fit_width_scale(400, 200.0), 2.0);
    }

    #[test]
    fn degenerate_logical_width_is_identity() {
        assert_eq!(fit_width_scale(400, 0.0), 1.0);
        assert_eq!(fit_width_scale(400, f32::INFINITY), 1.0);
    }
}
