//! Texture allocation for panel surfaces.
//!
//! Panels never talk to the graphics API directly; they go through a
//! [`TextureBackend`]:
//! - [`GpuTextures`] allocates wgpu textures the 3D renderer samples
//! - [`HeadlessTextures`] keeps the latest pixels in memory (tests, GPU-less hosts)

mod backend;
mod gpu;
mod handle;
mod headless;

pub use backend::{TextureBackend, TextureError};
pub use gpu::GpuTextures;
pub use handle::{HandleAllocator, TextureHandle};
pub use headless::HeadlessTextures;
