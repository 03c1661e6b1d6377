//! Shared fixtures for engine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::content::{ContentFactory, ContentHost, ContentKind};
use crate::coords::{LogicalSize, Vec2};
use crate::input::{EventResult, PointerAction, PointerEvent};
use crate::paint::Color;
use crate::registry::SurfaceRegistry;
use crate::surface::{OffscreenSurface, DEFAULT_MAX_BUFFERS};
use crate::texture::HeadlessTextures;
use crate::ui_thread::UiThread;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedEvent {
    /// Creation order of the host that received the event.
    pub instance: usize,
    pub action: PointerAction,
    pub pos: Vec2,
}

pub(crate) type EventLog = Arc<Mutex<Vec<RecordedEvent>>>;

/// Builds [`RecordingHost`]s that log events and fill their surface on draw.
pub(crate) struct RecordingFactory {
    events: EventLog,
    invalidations: Arc<AtomicUsize>,
    created: AtomicUsize,
    fail: Option<ContentKind>,
    fill: Color,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            events: Arc::default(),
            invalidations: Arc::default(),
            created: AtomicUsize::new(0),
            fail: None,
            fill: Color::from_srgb_u8(255, 0, 0, 255),
        }
    }

    /// Refuses to build `kind`.
    pub fn failing(kind: ContentKind) -> Self {
        Self {
            fail: Some(kind),
            ..Self::new()
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn events(&self) -> EventLog {
        self.events.clone()
    }

    pub fn invalidations(&self) -> Arc<AtomicUsize> {
        self.invalidations.clone()
    }
}

impl ContentFactory for RecordingFactory {
    fn create(&self, kind: ContentKind, size: LogicalSize) -> anyhow::Result<Box<dyn ContentHost>> {
        if self.fail == Some(kind) {
            anyhow::bail!("{kind} content unavailable");
        }
        Ok(Box::new(RecordingHost {
            instance: self.created.fetch_add(1, Ordering::SeqCst),
            size,
            fill: self.fill,
            surface: None,
            events: self.events.clone(),
            invalidations: self.invalidations.clone(),
        }))
    }
}

pub(crate) struct RecordingHost {
    instance: usize,
    size: LogicalSize,
    fill: Color,
    surface: Option<Arc<OffscreenSurface>>,
    events: EventLog,
    invalidations: Arc<AtomicUsize>,
}

impl ContentHost for RecordingHost {
    fn attach_surface(&mut self, surface: Arc<OffscreenSurface>) {
        self.surface = Some(surface);
    }

    fn invalidate(&mut self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> EventResult {
        self.events.lock().push(RecordedEvent {
            instance: self.instance,
            action: event.action,
            pos: event.pos,
        });
        EventResult::Consumed
    }

    fn draw(&mut self) {
        if let Some(surface) = &self.surface {
            surface.draw_with(self.size.width, self.fill, |_| {});
        }
    }
}

/// Registry + UI thread + headless backend, wired the way `Compositor` does it.
///
/// Field order matters: panels go before the UI thread that owns their content.
pub(crate) struct TestRig {
    pub registry: SurfaceRegistry,
    pub ui: UiThread,
    pub backend: Arc<HeadlessTextures>,
}

impl TestRig {
    pub fn new(factory: RecordingFactory) -> Self {
        Self::with_backend(Arc::new(HeadlessTextures::new()), factory, 1.0)
    }

    pub fn with_backend(backend: Arc<HeadlessTextures>, factory: RecordingFactory, density: f32) -> Self {
        let ui = UiThread::spawn("ui-test").expect("spawn UI thread");
        let registry = SurfaceRegistry::new(
            backend.clone(),
            ui.handle().clone(),
            Arc::new(factory),
            density,
            DEFAULT_MAX_BUFFERS,
        );
        Self { registry, ui, backend }
    }
}
