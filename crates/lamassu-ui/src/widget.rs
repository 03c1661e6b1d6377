use lamassu_engine::coords::Rect;
use lamassu_engine::paint::Color;

use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;

/// Root content of a panel.
///
/// `rect` is always the panel's full logical area.
pub trait Widget: 'static {
    fn paint(&self, painter: &mut Painter, rect: Rect);

    /// Return [`EventResult::Consumed`] when the event changed what is drawn.
    fn on_event(&mut self, _event: &UiEvent, _rect: Rect) -> EventResult {
        EventResult::Ignored
    }

    /// Color the buffer is cleared to before `paint`.
    fn background(&self) -> Color {
        Color::from_srgb_u8(255, 255, 255, 255)
    }
}
