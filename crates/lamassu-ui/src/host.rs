use std::sync::Arc;

use lamassu_engine::content::ContentHost;
use lamassu_engine::coords::{LogicalSize, Rect};
use lamassu_engine::input::{EventResult, PointerEvent};
use lamassu_engine::surface::OffscreenSurface;

use crate::event::GestureTracker;
use crate::painter::Painter;
use crate::text::FontSystem;
use crate::widget::Widget;

/// Adapts a [`Widget`] to the engine's [`ContentHost`].
///
/// Repaints only when invalidated or when the widget consumed an event. A
/// frame that cannot get a buffer stays pending for the next traversal.
pub struct PanelHost<W: Widget> {
    widget: W,
    fonts: Arc<FontSystem>,
    size: LogicalSize,
    surface: Option<Arc<OffscreenSurface>>,
    gestures: GestureTracker,
    dirty: bool,
    frames: u64,
}

impl<W: Widget> PanelHost<W> {
    pub fn new(widget: W, fonts: Arc<FontSystem>, size: LogicalSize) -> Self {
        Self {
            widget,
            fonts,
            size,
            surface: None,
            gestures: GestureTracker::default(),
            dirty: true,
            frames: 0,
        }
    }

    pub fn with_gestures(mut self, gestures: GestureTracker) -> Self {
        self.gestures = gestures;
        self
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Frames painted so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }
}

impl<W: Widget> ContentHost for PanelHost<W> {
    fn attach_surface(&mut self, surface: Arc<OffscreenSurface>) {
        self.surface = Some(surface);
        self.dirty = true;
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> EventResult {
        let Some(ui_event) = self.gestures.on_pointer(event) else {
            return EventResult::Ignored;
        };
        let bounds = self.bounds();
        let result = self.widget.on_event(&ui_event, bounds);
        if result.is_consumed() {
            self.dirty = true;
        }
        result
    }

    fn draw(&mut self) {
        if !self.dirty {
            return;
        }
        let Some(surface) = &self.surface else {
            return;
        };

        let bounds = self.bounds();
        let widget = &self.widget;
        let fonts = &*self.fonts;
        let drawn = surface.draw_with(self.size.width, widget.background(), |canvas| {
            let mut painter = Painter::new(canvas, fonts);
            widget.paint(&mut painter, bounds);
        });

        if drawn {
            self.dirty = false;
            self.frames += 1;
        } else {
            log::trace!("PanelHost::draw: no buffer available, frame deferred");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lamassu_engine::coords::{PixelSize, Vec2};
    use lamassu_engine::input::PointerAction;
    use lamassu_engine::paint::Color;
    use lamassu_engine::texture::{HeadlessTextures, TextureBackend};

    use crate::event::UiEvent;

    /// Fills a 10×10 logical square; counts clicks.
    struct Square {
        clicks: usize,
    }

    impl Widget for Square {
        fn paint(&self, painter: &mut Painter, _rect: Rect) {
            painter.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::from_srgb_u8(255, 0, 0, 255));
        }

        fn on_event(&mut self, event: &UiEvent, _rect: Rect) -> EventResult {
            match event {
                UiEvent::Click { .. } => {
                    self.clicks += 1;
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            }
        }

        fn background(&self) -> Color {
            Color::transparent()
        }
    }

    fn ev(action: PointerAction) -> PointerEvent {
        PointerEvent {
            action,
            pos: Vec2::new(5.0, 5.0),
            down_time: Duration::ZERO,
            event_time: Duration::ZERO,
        }
    }

    fn host_on(size: PixelSize, logical: LogicalSize) -> (PanelHost<Square>, Arc<OffscreenSurface>, Arc<HeadlessTextures>) {
        let backend = Arc::new(HeadlessTextures::new());
        let surface = Arc::new(OffscreenSurface::new(backend.clone(), 2));
        surface.initialize(size);
        let mut host = PanelHost::new(Square { clicks: 0 }, Arc::new(FontSystem::new()), logical);
        host.attach_surface(surface.clone());
        (host, surface, backend)
    }

    #[test]
    fn draw_scales_widget_to_texture_width() {
        let (mut host, surface, backend) = host_on(PixelSize::new(40, 40), LogicalSize::new(20.0, 20.0));
        host.draw();
        assert!(!host.is_dirty());
        assert!(surface.update_texture());

        let handle = surface.handle().unwrap();
        let px = backend.pixels(handle).unwrap();
        let at = |x: usize, y: usize| px[(y * 40 + x) * 4 + 3];
        assert_eq!(at(19, 19), 255);
        assert_eq!(at(21, 21), 0);
        assert_eq!(backend.live_textures(), 1);
    }

    #[test]
    fn clean_host_skips_draw() {
        let (mut host, _surface, _) = host_on(PixelSize::new(8, 8), LogicalSize::new(8.0, 8.0));
        host.draw();
        host.draw();
        assert_eq!(host.frames(), 1);

        host.invalidate();
        host.draw();
        assert_eq!(host.frames(), 2);
    }

    #[test]
    fn click_reaches_widget_and_dirties_host() {
        let (mut host, _surface, _) = host_on(PixelSize::new(8, 8), LogicalSize::new(8.0, 8.0));
        host.draw();

        assert_eq!(host.dispatch_pointer_event(&ev(PointerAction::Down)), EventResult::Ignored);
        assert!(!host.is_dirty());
        assert_eq!(host.dispatch_pointer_event(&ev(PointerAction::Up)), EventResult::Consumed);
        assert_eq!(host.widget().clicks, 1);
        assert!(host.is_dirty());
    }

    #[test]
    fn released_surface_keeps_frame_pending() {
        let (mut host, surface, _) = host_on(PixelSize::new(8, 8), LogicalSize::new(8.0, 8.0));
        surface.release();
        host.draw();
        assert!(host.is_dirty());
        assert_eq!(host.frames(), 0);
    }
}
