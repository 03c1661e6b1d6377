use thiserror::Error;

use crate::coords::PixelSize;

use super::TextureHandle;

/// Errors reported by a texture backend.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture size {0} has a zero dimension")]
    InvalidSize(PixelSize),

    #[error("texture size {size} exceeds the device limit of {limit} px")]
    ExceedsLimit { size: PixelSize, limit: u32 },

    #[error("unknown texture {0}")]
    UnknownHandle(TextureHandle),

    #[error("upload of {actual} bytes does not match {size} ({expected} bytes)")]
    DataSize {
        size: PixelSize,
        expected: usize,
        actual: usize,
    },

    #[error("texture allocation failed: {0}")]
    Allocation(String),
}

/// Allocation seam between off-screen surfaces and the graphics API.
///
/// Implementations are shared between the render thread (create, upload,
/// destroy) and the UI thread (surface teardown), so they must be `Sync`.
pub trait TextureBackend: Send + Sync {
    /// Allocates a sampleable RGBA texture of `size`.
    ///
    /// The texture content is transparent until the first upload.
    fn create_texture(&self, size: PixelSize) -> Result<TextureHandle, TextureError>;

    /// Replaces the texture content with tightly packed premultiplied RGBA8 pixels.
    fn upload(&self, handle: TextureHandle, size: PixelSize, rgba: &[u8]) -> Result<(), TextureError>;

    /// Frees the texture. Returns `false` if `handle` was not live.
    fn destroy_texture(&self, handle: TextureHandle) -> bool;

    /// Number of textures currently allocated.
    fn live_textures(&self) -> usize;

    /// Largest width or height `create_texture` accepts.
    fn max_dimension(&self) -> u32;
}

/// Shared validation for backends.
pub(crate) fn check_upload(handle_size: PixelSize, size: PixelSize, rgba: &[u8]) -> Result<(), TextureError> {
    let expected = handle_size.rgba_len();
    if size != handle_size || rgba.len() != expected {
        return Err(TextureError::DataSize {
            size: handle_size,
            expected,
            actual: rgba.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_size(size: PixelSize, limit: u32) -> Result<(), TextureError> {
    if !size.is_valid() {
        return Err(TextureError::InvalidSize(size));
    }
    if size.width > limit || size.height > limit {
        return Err(TextureError::ExceedsLimit { size, limit });
    }
    Ok(())
}
