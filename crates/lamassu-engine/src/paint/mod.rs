//! Colors used by panel content when drawing into a canvas.

mod color;

pub use color::Color;
