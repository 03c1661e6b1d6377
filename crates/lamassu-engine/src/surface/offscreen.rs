use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::coords::PixelSize;
use crate::paint::Color;
use crate::texture::{TextureBackend, TextureHandle};

use super::{fit_width_scale, Canvas};

/// Two buffers are enough because the upload runs under the surface lock: the
/// producer can always paint into the one the consumer is not latching.
pub const DEFAULT_MAX_BUFFERS: usize = 2;

/// Shared by every surface so a canvas never matches another surface's binding.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

struct Producer {
    size: PixelSize,
    handle: TextureHandle,
    /// Fresh on every `initialize`; canvases from any other binding are dropped.
    generation: u64,
    /// Buffers ready to be handed to the UI thread.
    free: Vec<Canvas>,
    /// Most recently finished frame, not yet latched.
    published: Option<Canvas>,
    /// Buffers created for the current binding (free + published + drawing).
    allocated: usize,
    /// A canvas is currently checked out via `begin_draw`.
    drawing: bool,
}

/// Producer/consumer bridge between a UI-thread content object and one texture.
///
/// All methods are thread-safe. The UI thread calls `begin_draw`/`end_draw`;
/// the render thread calls `initialize`, `update_texture` and `release`.
pub struct OffscreenSurface {
    backend: Arc<dyn TextureBackend>,
    max_buffers: usize,
    state: Mutex<Option<Producer>>,
}

impl OffscreenSurface {
    /// Creates an unbound surface. `max_buffers` below two is raised to two.
    pub fn new(backend: Arc<dyn TextureBackend>, max_buffers: usize) -> Self {
        Self {
            backend,
            max_buffers: max_buffers.max(DEFAULT_MAX_BUFFERS),
            state: Mutex::new(None),
        }
    }

    /// Allocates a texture of `size` and binds the surface to it.
    ///
    /// A previously bound texture is released first.
    ///
    /// # Panics
    /// Texture allocation failure is treated as unrecoverable: it is logged and
    /// the call panics. Callers validate `size` beforehand.
    pub fn initialize(&self, size: PixelSize) -> TextureHandle {
        self.release();

        let handle = match self.backend.create_texture(size) {
            Ok(h) => h,
            Err(e) => {
                log::error!("OffscreenSurface::initialize: texture allocation for {size} failed: {e}");
                panic!("offscreen texture allocation failed for {size}: {e}");
            }
        };

        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);

        *self.state.lock() = Some(Producer {
            size,
            handle,
            generation,
            free: Vec::new(),
            published: None,
            allocated: 0,
            drawing: false,
        });

        log::debug!("OffscreenSurface::initialize: bound {handle} ({size})");
        handle
    }

    /// Destroys the texture and drops every buffer. Idempotent.
    pub fn release(&self) {
        let Some(prod) = self.state.lock().take() else {
            return;
        };
        if !self.backend.destroy_texture(prod.handle) {
            log::warn!("OffscreenSurface::release: {} was already gone", prod.handle);
        }
        log::debug!("OffscreenSurface::release: released {}", prod.handle);
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().is_none()
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.state.lock().as_ref().map(|p| p.handle)
    }

    pub fn size(&self) -> Option<PixelSize> {
        self.state.lock().as_ref().map(|p| p.size)
    }

    // ── producer side ─────────────────────────────────────────────────────

    /// Checks out a buffer sized to the texture.
    ///
    /// Returns `None` when released, when a draw is already open, or when no
    /// buffer is available yet (the consumer still holds the other one).
    pub fn begin_draw(&self) -> Option<Canvas> {
        let mut guard = self.state.lock();
        let prod = guard.as_mut()?;
        if prod.drawing {
            log::warn!("OffscreenSurface::begin_draw: draw already open on {}", prod.handle);
            return None;
        }

        let canvas = match prod.free.pop() {
            Some(c) => c,
            None if prod.allocated < self.max_buffers => {
                let c = Canvas::for_generation(prod.size, prod.generation)?;
                prod.allocated += 1;
                c
            }
            // Every buffer is either published or out; repaint over the pending frame.
            None => prod.published.take()?,
        };

        prod.drawing = true;
        Some(canvas)
    }

    /// Returns a buffer from [`begin_draw`](Self::begin_draw) and publishes it.
    ///
    /// `None` cancels the open draw and frees its buffer slot. A canvas from
    /// another binding (the surface was released or re-initialized mid-draw)
    /// is discarded.
    pub fn end_draw(&self, canvas: Option<Canvas>) {
        let mut guard = self.state.lock();
        let Some(prod) = guard.as_mut() else {
            return;
        };
        let was_drawing = std::mem::replace(&mut prod.drawing, false);
        if !was_drawing {
            log::warn!("OffscreenSurface::end_draw: no draw open on {}", prod.handle);
        }

        let mut canvas = match canvas {
            Some(c) if c.generation == prod.generation => c,
            other => {
                if other.is_some() {
                    log::debug!("OffscreenSurface::end_draw: dropping stale buffer");
                }
                // The checked-out buffer never came back; let `begin_draw` allocate anew.
                if was_drawing {
                    prod.allocated = prod.allocated.saturating_sub(1);
                }
                return;
            }
        };

        canvas.reset_transform();
        if let Some(prev) = prod.published.replace(canvas) {
            prod.free.push(prev);
        }
    }

    /// Convenience wrapper: begin, reset, clear, fit-to-width scale, paint, end.
    ///
    /// Returns `false` when no buffer could be obtained.
    pub fn draw_with(&self, logical_width: f32, clear: Color, f: impl FnOnce(&mut Canvas)) -> bool {
        let Some(mut canvas) = self.begin_draw() else {
            return false;
        };
        canvas.reset_transform();
        canvas.clear(clear);
        canvas.scale(fit_width_scale(canvas.width(), logical_width));
        f(&mut canvas);
        self.end_draw(Some(canvas));
        true
    }

    // ── consumer side ─────────────────────────────────────────────────────

    /// Latches the most recently published buffer into the texture.
    ///
    /// Returns `false` when nothing new was published or the surface is released.
    pub fn update_texture(&self) -> bool {
        let mut guard = self.state.lock();
        let Some(prod) = guard.as_mut() else {
            return false;
        };
        let Some(canvas) = prod.published.take() else {
            return false;
        };

        let latched = match self.backend.upload(prod.handle, prod.size, canvas.data()) {
            Ok(()) => true,
            Err(e) => {
                log::error!("OffscreenSurface::update_texture: upload to {} failed: {e}", prod.handle);
                false
            }
        };
        prod.free.push(canvas);
        latched
    }
}

impl Drop for OffscreenSurface {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::texture::{HeadlessTextures, TextureError};

    fn surface() -> (Arc<HeadlessTextures>, OffscreenSurface) {
        let backend = Arc::new(HeadlessTextures::new());
        let surface = OffscreenSurface::new(backend.clone(), DEFAULT_MAX_BUFFERS);
        (backend, surface)
    }

    fn red() -> Color {
        Color::from_srgb_u8(255, 0, 0, 255)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn initialize_allocates_and_release_frees() {
        let (backend, surface) = surface();
        let handle = surface.initialize(PixelSize::new(16, 8));
        assert_eq!(backend.live_textures(), 1);
        assert_eq!(surface.handle(), Some(handle));
        assert_eq!(surface.size(), Some(PixelSize::new(16, 8)));

        surface.release();
        assert!(surface.is_released());
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn release_twice_is_noop() {
        let (backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        surface.release();
        surface.release();
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn reinitialize_replaces_texture() {
        let (backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        surface.initialize(PixelSize::new(8, 8));
        assert_eq!(backend.live_textures(), 1);
        assert_eq!(surface.size(), Some(PixelSize::new(8, 8)));
    }

    #[test]
    fn drop_releases_texture() {
        let (backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        drop(surface);
        assert_eq!(backend.live_textures(), 0);
    }

    struct FailingBackend;

    impl TextureBackend for FailingBackend {
        fn create_texture(&self, _size: PixelSize) -> Result<TextureHandle, TextureError> {
            Err(TextureError::Allocation("out of memory".into()))
        }
        fn upload(&self, handle: TextureHandle, _size: PixelSize, _rgba: &[u8]) -> Result<(), TextureError> {
            Err(TextureError::UnknownHandle(handle))
        }
        fn destroy_texture(&self, _handle: TextureHandle) -> bool {
            false
        }
        fn live_textures(&self) -> usize {
            0
        }
        fn max_dimension(&self) -> u32 {
            u32::MAX
        }
    }

    #[test]
    #[should_panic(expected = "offscreen texture allocation failed")]
    fn allocation_failure_is_fatal() {
        let surface = OffscreenSurface::new(Arc::new(FailingBackend), DEFAULT_MAX_BUFFERS);
        surface.initialize(PixelSize::new(4, 4));
    }

    // ── draw protocol ─────────────────────────────────────────────────────

    #[test]
    fn begin_draw_on_released_surface_is_none() {
        let (_backend, surface) = surface();
        assert!(surface.begin_draw().is_none());
    }

    #[test]
    fn begin_draw_twice_without_end_is_none() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        let first = surface.begin_draw();
        assert!(first.is_some());
        assert!(surface.begin_draw().is_none());

        surface.end_draw(first);
        assert!(surface.begin_draw().is_some());
    }

    #[test]
    fn end_draw_without_begin_is_harmless() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        surface.end_draw(None);
        assert!(!surface.update_texture());
    }

    #[test]
    fn cancelled_draw_publishes_nothing() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        let _canvas = surface.begin_draw();
        surface.end_draw(None);
        assert!(!surface.update_texture());
    }

    #[test]
    fn cancelled_draws_do_not_exhaust_buffers() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        for _ in 0..3 {
            assert!(surface.begin_draw().is_some());
            surface.end_draw(None);
        }
        let canvas = surface.begin_draw();
        assert!(canvas.is_some());
        surface.end_draw(canvas);
        assert!(surface.update_texture());
    }

    #[test]
    fn buffer_from_another_surface_is_dropped() {
        let (_backend, a) = surface();
        let (_backend_b, b) = surface();
        a.initialize(PixelSize::new(4, 4));
        b.initialize(PixelSize::new(4, 4));

        let foreign = a.begin_draw();
        assert!(b.begin_draw().is_some());
        b.end_draw(foreign);
        assert!(!b.update_texture());

        let own = b.begin_draw();
        assert!(own.is_some());
        b.end_draw(own);
        assert!(b.update_texture());
    }

    #[test]
    fn update_texture_without_publish_is_false() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        assert!(!surface.update_texture());
    }

    #[test]
    fn released_mid_draw_discards_buffer() {
        let (backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        let canvas = surface.begin_draw();
        surface.release();
        surface.end_draw(canvas);
        assert!(!surface.update_texture());
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn reinitialized_mid_draw_discards_stale_buffer() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        let canvas = surface.begin_draw();
        surface.initialize(PixelSize::new(8, 8));
        surface.end_draw(canvas);
        assert!(!surface.update_texture());
    }

    #[test]
    fn buffer_count_is_bounded() {
        let (_backend, surface) = surface();
        surface.initialize(PixelSize::new(4, 4));
        for _ in 0..5 {
            let c = surface.begin_draw();
            assert!(c.is_some());
            surface.end_draw(c);
        }
        let guard = surface.state.lock();
        assert!(guard.as_ref().unwrap().allocated <= DEFAULT_MAX_BUFFERS);
    }

    // ── latching ──────────────────────────────────────────────────────────

    #[test]
    fn update_texture_uploads_latest_frame() {
        let (backend, surface) = surface();
        let handle = surface.initialize(PixelSize::new(4, 4));

        assert!(surface.draw_with(4.0, Color::transparent(), |c| c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), red())));
        assert!(surface.draw_with(4.0, Color::from_srgb_u8(0, 0, 255, 255), |_| {}));
        assert!(surface.update_texture());

        let px = backend.pixels(handle).unwrap();
        assert_eq!(&px[0..4], &[0, 0, 255, 255]);
        assert_eq!(backend.upload_count(handle), Some(1));

        assert!(!surface.update_texture());
    }

    #[test]
    fn draw_with_scales_logical_width_to_texture() {
        let (backend, surface) = surface();
        let handle = surface.initialize(PixelSize::new(400, 300));
        surface.draw_with(200.0, Color::transparent(), |c| {
            c.fill_rect(Rect::new(50.0, 10.0, 1.0, 1.0), red());
        });
        assert!(surface.update_texture());

        let px = backend.pixels(handle).unwrap();
        let at = |x: usize, y: usize| {
            let i = (y * 400 + x) * 4;
            [px[i], px[i + 1], px[i + 2], px[i + 3]]
        };
        assert_eq!(at(101, 21), [255, 0, 0, 255]);
        assert_eq!(at(102, 22), [0, 0, 0, 0]);
    }
}
