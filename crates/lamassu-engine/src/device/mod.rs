//! Headless GPU device management.
//!
//! Panels render off-screen, so there is no window surface here: this module
//! only creates the wgpu Instance/Adapter/Device/Queue that panel textures are
//! allocated on.

mod gpu;

pub use gpu::{Gpu, GpuInit};
