use std::collections::HashMap;

use parking_lot::Mutex;

use crate::coords::PixelSize;

use super::backend::{check_size, check_upload};
use super::{HandleAllocator, TextureBackend, TextureError, TextureHandle};

/// Same default as `wgpu::Limits::default().max_texture_dimension_2d`.
const DEFAULT_MAX_DIMENSION: u32 = 8192;

struct HeadlessTexture {
    size: PixelSize,
    pixels: Vec<u8>,
    uploads: u64,
}

#[derive(Default)]
struct Table {
    handles: HandleAllocator,
    textures: HashMap<TextureHandle, HeadlessTexture>,
}

/// CPU-side texture backend.
///
/// Keeps the most recently uploaded pixels per texture. Used by tests, by hosts
/// without a GPU adapter and for snapshot dumps of panel content.
pub struct HeadlessTextures {
    max_dimension: u32,
    table: Mutex<Table>,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::with_max_dimension(DEFAULT_MAX_DIMENSION)
    }

    /// Creates a backend that rejects textures larger than `max_dimension` on either axis.
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension,
            table: Mutex::new(Table::default()),
        }
    }

    /// Copy of the texture's current premultiplied RGBA8 content.
    pub fn pixels(&self, handle: TextureHandle) -> Option<Vec<u8>> {
        self.table.lock().textures.get(&handle).map(|t| t.pixels.clone())
    }

    pub fn size_of(&self, handle: TextureHandle) -> Option<PixelSize> {
        self.table.lock().textures.get(&handle).map(|t| t.size)
    }

    /// Number of uploads the texture has received since allocation.
    pub fn upload_count(&self, handle: TextureHandle) -> Option<u64> {
        self.table.lock().textures.get(&handle).map(|t| t.uploads)
    }
}

impl Default for HeadlessTextures {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureBackend for HeadlessTextures {
    fn create_texture(&self, size: PixelSize) -> Result<TextureHandle, TextureError> {
        check_size(size, self.max_dimension)?;

        let mut table = self.table.lock();
        let handle = table.handles.allocate();
        table.textures.insert(
            handle,
            HeadlessTexture {
                size,
                pixels: vec![0; size.rgba_len()],
                uploads: 0,
            },
        );
        Ok(handle)
    }

    fn upload(&self, handle: TextureHandle, size: PixelSize, rgba: &[u8]) -> Result<(), TextureError> {
        let mut table = self.table.lock();
        let texture = table
            .textures
            .get_mut(&handle)
            .ok_or(TextureError::UnknownHandle(handle))?;
        check_upload(texture.size, size, rgba)?;
        texture.pixels.copy_from_slice(rgba);
        texture.uploads += 1;
        Ok(())
    }

    fn destroy_texture(&self, handle: TextureHandle) -> bool {
        let mut table = self.table.lock();
        if table.textures.remove(&handle).is_none() {
            return false;
        }
        table.handles.release(handle)
    }

    fn live_textures(&self) -> usize {
        self.table.lock().textures.len()
    }

    fn max_dimension(&self) -> u32 {
        self.max_dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_texture_is_transparent() {
        let textures = HeadlessTextures::new();
        let h = textures.create_texture(PixelSize::new(2, 2)).unwrap();
        assert_eq!(textures.pixels(h).unwrap(), vec![0; 16]);
        assert_eq!(textures.upload_count(h), Some(0));
    }

    #[test]
    fn upload_replaces_content() {
        let textures = HeadlessTextures::new();
        let size = PixelSize::new(1, 2);
        let h = textures.create_texture(size).unwrap();
        textures.upload(h, size, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(textures.pixels(h).unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(textures.upload_count(h), Some(1));
    }

    #[test]
    fn upload_with_wrong_length_is_rejected() {
        let textures = HeadlessTextures::new();
        let size = PixelSize::new(2, 2);
        let h = textures.create_texture(size).unwrap();
        let err = textures.upload(h, size, &[0; 3]).unwrap_err();
        assert!(matches!(err, TextureError::DataSize { expected: 16, actual: 3, .. }));
    }

    #[test]
    fn oversized_and_empty_textures_are_rejected() {
        let textures = HeadlessTextures::with_max_dimension(64);
        assert!(matches!(
            textures.create_texture(PixelSize::new(65, 1)),
            Err(TextureError::ExceedsLimit { limit: 64, .. })
        ));
        assert!(matches!(
            textures.create_texture(PixelSize::new(0, 1)),
            Err(TextureError::InvalidSize(_))
        ));
        assert_eq!(textures.live_textures(), 0);
    }

    #[test]
    fn destroy_returns_count_to_baseline() {
        let textures = HeadlessTextures::new();
        let h = textures.create_texture(PixelSize::new(4, 4)).unwrap();
        assert_eq!(textures.live_textures(), 1);
        assert!(textures.destroy_texture(h));
        assert!(!textures.destroy_texture(h));
        assert_eq!(textures.live_textures(), 0);
        assert!(textures.pixels(h).is_none());
    }
}
