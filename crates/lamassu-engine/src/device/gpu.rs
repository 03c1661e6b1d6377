use anyhow::{Context, Result};

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Allocate panel textures in an sRGB format.
    ///
    /// Canvas pixels are sRGB encoded; an sRGB texture makes sampling return
    /// linear values to the scene shader.
    pub prefer_srgb: bool,

    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// Adapter power preference. VR hosts usually want the discrete GPU.
    pub power_preference: wgpu::PowerPreference,

    /// Use the software fallback adapter (CI machines without a GPU).
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Owns wgpu core objects for off-screen panel rendering.
///
/// The scene renderer that samples panel textures must use the same device;
/// it can borrow it through [`Gpu::device`] / [`Gpu::queue`].
pub struct Gpu {
    /// wgpu instance used to create the adapter.
    instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Format every panel texture is created with.
    panel_format: wgpu::TextureFormat,
}

impl Gpu {
    /// Creates a GPU context without a presentation surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; hosts usually wrap
    /// this in `pollster::block_on`.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let GpuInit {
            prefer_srgb,
            backends,
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lamassu-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let panel_format = if prefer_srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        log::info!("gpu ready: {:?}", adapter.get_info().name);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            panel_format,
        })
    }

    /// Blocking form of [`Gpu::new_headless`] for hosts without an async runtime.
    pub fn new_headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new_headless(init))
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Texture format of panel textures.
    pub fn panel_format(&self) -> wgpu::TextureFormat {
        self.panel_format
    }
}
