//! Public entry point for VR hosts.

use std::sync::Arc;

use crate::content::{ContentFactory, ContentKind, ContentRef};
use crate::error::CompositorError;
use crate::input::{InputRouter, PointerAction, PointerSample, RoutingMode};
use crate::refresh::{FrameRefreshLoop, FrameStats};
use crate::registry::{PanelInfo, SurfaceRegistry};
use crate::surface::DEFAULT_MAX_BUFFERS;
use crate::texture::{TextureBackend, TextureHandle};
use crate::ui_thread::{UiHandle, UiThread};

/// Compositor configuration.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Name of the spawned UI thread (shows up in logs and debuggers).
    pub ui_thread_name: String,
    /// Texture pixels per logical pixel.
    pub pixel_density: f32,
    pub routing: RoutingMode,
    /// Buffers per surface (minimum 2).
    pub max_buffers: usize,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            ui_thread_name: "lamassu-ui".to_owned(),
            pixel_density: 1.0,
            routing: RoutingMode::SinglePointer,
            max_buffers: DEFAULT_MAX_BUFFERS,
        }
    }
}

/// Off-screen panel compositor.
///
/// Owns the UI thread, the panel registry and the pointer router. Every method
/// is meant to be called from the render thread.
pub struct Compositor {
    registry: SurfaceRegistry,
    router: InputRouter,
    refresh: FrameRefreshLoop,
    backend: Arc<dyn TextureBackend>,
    ui: UiThread,
}

impl Compositor {
    pub fn new(
        config: CompositorConfig,
        backend: Arc<dyn TextureBackend>,
        factory: Arc<dyn ContentFactory>,
    ) -> Result<Self, CompositorError> {
        let ui = UiThread::spawn(&config.ui_thread_name)?;
        let registry = SurfaceRegistry::new(
            backend.clone(),
            ui.handle().clone(),
            factory,
            config.pixel_density,
            config.max_buffers,
        );

        log::info!(
            "compositor up: density {}, {:?} routing, {} buffer(s) per panel",
            config.pixel_density,
            config.routing,
            config.max_buffers.max(DEFAULT_MAX_BUFFERS)
        );

        Ok(Self {
            registry,
            router: InputRouter::new(config.routing),
            refresh: FrameRefreshLoop::new(),
            backend,
            ui,
        })
    }

    // ── panel lifecycle ───────────────────────────────────────────────────

    /// See [`SurfaceRegistry::create_panel`].
    pub fn create_panel(&self, width: u32, height: u32, kind: ContentKind) -> Result<TextureHandle, CompositorError> {
        self.registry.create_panel(width, height, kind)
    }

    /// Destroys a panel and clears any touch bound to it.
    pub fn destroy_panel(&self, handle: TextureHandle) -> bool {
        let removed = self.registry.destroy_panel(handle);
        if removed && self.router.forget(handle) {
            log::debug!("Compositor::destroy_panel: dropped touch on {handle}");
        }
        removed
    }

    pub fn lookup(&self, handle: TextureHandle) -> Option<ContentRef> {
        self.registry.lookup(handle)
    }

    pub fn panels(&self) -> Vec<PanelInfo> {
        self.registry.panels()
    }

    // ── per frame ─────────────────────────────────────────────────────────

    /// Call once per host frame.
    pub fn refresh_frame(&self) -> FrameStats {
        self.refresh.run(&self.registry)
    }

    /// The only pointer entry point.
    pub fn handle_pointer(&self, sample: PointerSample) -> Option<PointerAction> {
        self.router.handle_sample(sample, &self.registry)
    }

    /// Targets with a touch in progress.
    pub fn active_touches(&self) -> Vec<TextureHandle> {
        self.router.active_targets()
    }

    /// Blocks until the UI thread has processed everything posted so far and
    /// redrawn dirty content.
    pub fn flush_ui(&self) -> Result<(), CompositorError> {
        self.ui.handle().flush().map(|_| ())
    }

    pub fn ui(&self) -> &UiHandle {
        self.ui.handle()
    }

    pub fn backend(&self) -> &Arc<dyn TextureBackend> {
        &self.backend
    }
}

impl Drop for Compositor {
    fn drop(&mut self) {
        let n = self.registry.clear();
        if n > 0 {
            log::debug!("Compositor::drop: released {n} panel(s)");
        }
        self.ui.shutdown();
    }
}
