//! Lamassu engine crate.
//!
//! Renders 2D panel content into GPU-sampleable textures for a 3D/VR scene and
//! routes pointer samples from that scene back onto the right panel.
//!
//! Threading model:
//! - the render thread owns textures, drives [`Compositor::refresh_frame`] and
//!   feeds [`Compositor::handle_pointer`]
//! - the UI thread owns every [`content::ContentHost`] and produces the pixels

pub mod compositor;
pub mod content;
pub mod coords;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod paint;
pub mod refresh;
pub mod registry;
pub mod surface;
pub mod texture;
pub mod time;
pub mod ui_thread;

#[cfg(test)]
pub(crate) mod test_support;

pub use compositor::{Compositor, CompositorConfig};
pub use error::CompositorError;
