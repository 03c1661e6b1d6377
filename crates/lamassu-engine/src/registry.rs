//! Panel registry: texture handle → surface + content.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::content::{ContentFactory, ContentKind, ContentRef};
use crate::coords::{LogicalSize, PixelSize};
use crate::error::CompositorError;
use crate::surface::OffscreenSurface;
use crate::texture::{TextureBackend, TextureHandle};
use crate::ui_thread::UiHandle;

/// Public summary of one registered panel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelInfo {
    pub handle: TextureHandle,
    pub kind: ContentKind,
    pub logical: LogicalSize,
    pub size: PixelSize,
}

pub(crate) struct ContentEntry {
    pub(crate) handle: TextureHandle,
    pub(crate) content: ContentRef,
    pub(crate) kind: ContentKind,
    pub(crate) logical: LogicalSize,
    pub(crate) surface: Arc<OffscreenSurface>,
}

impl ContentEntry {
    fn info(&self) -> PanelInfo {
        PanelInfo {
            handle: self.handle,
            kind: self.kind,
            logical: self.logical,
            size: self.surface.size().unwrap_or_default(),
        }
    }
}

/// Owns every live panel.
///
/// Entries keep insertion order; the refresh walk and `panels()` follow it.
pub struct SurfaceRegistry {
    backend: Arc<dyn TextureBackend>,
    ui: UiHandle,
    factory: Arc<dyn ContentFactory>,
    density: f32,
    max_buffers: usize,
    entries: Mutex<Vec<ContentEntry>>,
}

impl SurfaceRegistry {
    pub fn new(
        backend: Arc<dyn TextureBackend>,
        ui: UiHandle,
        factory: Arc<dyn ContentFactory>,
        density: f32,
        max_buffers: usize,
    ) -> Self {
        Self {
            backend,
            ui,
            factory,
            density,
            max_buffers,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Creates a panel of `width × height` logical pixels showing `kind`.
    ///
    /// Blocks until the UI thread has built the content. The returned handle
    /// samples as transparent until the content's first draw is latched.
    pub fn create_panel(&self, width: u32, height: u32, kind: ContentKind) -> Result<TextureHandle, CompositorError> {
        if width == 0 || height == 0 {
            return Err(CompositorError::InvalidSize { width, height });
        }
        if self.ui.is_current() {
            return Err(CompositorError::UiThreadReentry);
        }

        let logical = LogicalSize::new(width as f32, height as f32);
        let size = PixelSize::new(width, height).scaled(self.density);
        let limit = self.backend.max_dimension();
        if size.width > limit || size.height > limit {
            log::warn!("SurfaceRegistry::create_panel: {size} exceeds texture limit {limit}");
            return Err(CompositorError::TooLarge {
                width: size.width,
                height: size.height,
                limit,
            });
        }

        let surface = Arc::new(OffscreenSurface::new(self.backend.clone(), self.max_buffers));
        let handle = surface.initialize(size);

        let factory = self.factory.clone();
        let attached = surface.clone();
        let created = self.ui.call(move |ctx| {
            let mut host = factory.create(kind, logical).map_err(|e| format!("{e:#}"))?;
            host.attach_surface(attached);
            Ok::<_, String>(ctx.insert(host))
        });

        let id = match created {
            Ok(Ok(id)) => id,
            Ok(Err(reason)) => {
                surface.release();
                log::warn!("SurfaceRegistry::create_panel: {kind} content failed: {reason}");
                return Err(CompositorError::ContentCreationFailed { kind, reason });
            }
            Err(e) => {
                surface.release();
                return Err(e);
            }
        };

        self.entries.lock().push(ContentEntry {
            handle,
            content: ContentRef::new(id, self.ui.clone()),
            kind,
            logical,
            surface,
        });

        log::info!("created {kind} panel {handle} ({width}x{height} logical, {size} px)");
        Ok(handle)
    }

    /// Unregisters `handle`, releases its texture and tears the content down on
    /// the UI thread. `false` for unknown handles.
    pub fn destroy_panel(&self, handle: TextureHandle) -> bool {
        let entry = {
            let mut entries = self.entries.lock();
            let Some(idx) = entries.iter().position(|e| e.handle == handle) else {
                return false;
            };
            entries.remove(idx)
        };
        self.teardown(entry);
        log::info!("destroyed panel {handle}");
        true
    }

    pub fn lookup(&self, handle: TextureHandle) -> Option<ContentRef> {
        self.entries
            .lock()
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.content.clone())
    }

    /// Surface bound to `handle`, for hosts that sample or inspect it directly.
    pub fn surface(&self, handle: TextureHandle) -> Option<Arc<OffscreenSurface>> {
        self.entries
            .lock()
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.surface.clone())
    }

    pub fn panels(&self) -> Vec<PanelInfo> {
        self.entries.lock().iter().map(ContentEntry::info).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Runs `f` over all entries while holding the registry lock.
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&[ContentEntry]) -> R) -> R {
        f(&self.entries.lock())
    }

    /// Destroys every panel. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let drained: Vec<_> = self.entries.lock().drain(..).collect();
        let n = drained.len();
        for entry in drained {
            self.teardown(entry);
        }
        n
    }

    fn teardown(&self, entry: ContentEntry) {
        entry.surface.release();
        let id = entry.content.id();
        if !self.ui.post(move |ctx| {
            ctx.remove(id);
        }) {
            log::debug!("SurfaceRegistry: UI thread gone, {id} dropped with it");
        }
    }
}
