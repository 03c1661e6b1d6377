use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::coords::PixelSize;
use crate::device::Gpu;

use super::backend::{check_size, check_upload};
use super::{HandleAllocator, TextureBackend, TextureError, TextureHandle};

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PixelSize,
}

#[derive(Default)]
struct Table {
    handles: HandleAllocator,
    textures: HashMap<TextureHandle, GpuTexture>,
}

/// wgpu texture backend.
///
/// Every panel texture is a 2D `TEXTURE_BINDING | COPY_DST` texture; producer
/// buffers reach it through `Queue::write_texture`. The 3D renderer samples it
/// with [`GpuTextures::sampler`] (linear filtering, clamp-to-edge).
pub struct GpuTextures {
    gpu: Arc<Gpu>,
    sampler: wgpu::Sampler,
    table: Mutex<Table>,
}

impl GpuTextures {
    pub fn new(gpu: Arc<Gpu>) -> Self {
        let sampler = gpu.device().create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lamassu panel sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            gpu,
            sampler,
            table: Mutex::new(Table::default()),
        }
    }

    pub fn gpu(&self) -> &Arc<Gpu> {
        &self.gpu
    }

    /// Sampler every panel texture is meant to be sampled with.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Runs `f` with the texture view of `handle`, for binding in the scene renderer.
    ///
    /// Returns `None` if the handle is not live.
    pub fn with_view<R>(&self, handle: TextureHandle, f: impl FnOnce(&wgpu::TextureView) -> R) -> Option<R> {
        let table = self.table.lock();
        table.textures.get(&handle).map(|t| f(&t.view))
    }
}

impl TextureBackend for GpuTextures {
    fn create_texture(&self, size: PixelSize) -> Result<TextureHandle, TextureError> {
        check_size(size, self.max_dimension())?;

        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("lamassu panel texture"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.gpu.panel_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut table = self.table.lock();
        let handle = table.handles.allocate();
        table.textures.insert(handle, GpuTexture { texture, view, size });
        log::debug!("allocated panel texture {handle} ({size})");
        Ok(handle)
    }

    fn upload(&self, handle: TextureHandle, size: PixelSize, rgba: &[u8]) -> Result<(), TextureError> {
        let table = self.table.lock();
        let target = table
            .textures
            .get(&handle)
            .ok_or(TextureError::UnknownHandle(handle))?;
        check_upload(target.size, size, rgba)?;

        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn destroy_texture(&self, handle: TextureHandle) -> bool {
        let mut table = self.table.lock();
        let Some(entry) = table.textures.remove(&handle) else {
            return false;
        };
        entry.texture.destroy();
        log::debug!("destroyed panel texture {handle}");
        table.handles.release(handle)
    }

    fn live_textures(&self) -> usize {
        self.table.lock().textures.len()
    }

    fn max_dimension(&self) -> u32 {
        self.gpu.device().limits().max_texture_dimension_2d
    }
}
