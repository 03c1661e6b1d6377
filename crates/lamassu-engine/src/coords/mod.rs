//! Coordinate and size types shared by surfaces, panels and pointer routing.
//!
//! Canonical CPU space:
//! - logical pixels for panel content and pointer samples
//! - physical pixels (`PixelSize`) for textures and canvases
//! - origin top-left, +X right, +Y down

mod rect;
mod size;
mod vec2;

pub use rect::Rect;
pub use size::{LogicalSize, PixelSize};
pub use vec2::Vec2;
