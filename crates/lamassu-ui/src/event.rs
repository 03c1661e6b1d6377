use lamassu_engine::coords::Vec2;
use lamassu_engine::input::{PointerAction, PointerEvent};

pub use lamassu_engine::input::EventResult;

/// Default distance a pointer must travel before a press becomes a drag.
pub const TOUCH_SLOP: f32 = 8.0;

/// Gesture-level events routed to widgets, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Pointer went down at `pos`.
    Press { pos: Vec2 },
    /// Pointer moved past the touch slop while held.
    /// `pos` is the current position; `start` is where the press began.
    Drag { pos: Vec2, start: Vec2 },
    /// Pointer released without leaving the touch slop.
    Click { pos: Vec2 },
    /// Pointer released after a drag. Fires wherever `pos` is; check
    /// `rect.contains(start)` to decide whether the drag is yours.
    DragEnd { pos: Vec2, start: Vec2 },
}

impl UiEvent {
    /// Where the gesture that produced this event began.
    pub fn origin(&self) -> Vec2 {
        match *self {
            UiEvent::Press { pos } | UiEvent::Click { pos } => pos,
            UiEvent::Drag { start, .. } | UiEvent::DragEnd { start, .. } => start,
        }
    }
}

/// Turns raw Down/Move/Up pointer events into [`UiEvent`]s.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    slop: f32,
    start: Option<Vec2>,
    dragging: bool,
}

impl GestureTracker {
    pub fn new(slop: f32) -> Self {
        Self {
            slop: slop.max(0.0),
            start: None,
            dragging: false,
        }
    }

    /// A pointer is currently held.
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<UiEvent> {
        let pos = event.pos;
        match event.action {
            PointerAction::Down => {
                self.start = Some(pos);
                self.dragging = false;
                Some(UiEvent::Press { pos })
            }
            PointerAction::Move => {
                let start = self.start?;
                if !self.dragging && pos.distance(start) > self.slop {
                    self.dragging = true;
                }
                self.dragging.then_some(UiEvent::Drag { pos, start })
            }
            PointerAction::Up => {
                let start = self.start.take()?;
                let dragging = std::mem::take(&mut self.dragging);
                Some(if dragging {
                    UiEvent::DragEnd { pos, start }
                } else {
                    UiEvent::Click { pos }
                })
            }
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(TOUCH_SLOP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ev(action: PointerAction, x: f32, y: f32) -> PointerEvent {
        PointerEvent {
            action,
            pos: Vec2::new(x, y),
            down_time: Duration::ZERO,
            event_time: Duration::ZERO,
        }
    }

    #[test]
    fn small_wiggle_is_a_click() {
        let mut g = GestureTracker::default();
        assert_eq!(g.on_pointer(&ev(PointerAction::Down, 10.0, 10.0)), Some(UiEvent::Press { pos: Vec2::new(10.0, 10.0) }));
        assert_eq!(g.on_pointer(&ev(PointerAction::Move, 13.0, 12.0)), None);
        assert_eq!(g.on_pointer(&ev(PointerAction::Up, 13.0, 12.0)), Some(UiEvent::Click { pos: Vec2::new(13.0, 12.0) }));
        assert!(!g.is_active());
    }

    #[test]
    fn leaving_slop_starts_drag() {
        let mut g = GestureTracker::default();
        let start = Vec2::new(0.0, 100.0);
        g.on_pointer(&ev(PointerAction::Down, 0.0, 100.0));
        assert_eq!(
            g.on_pointer(&ev(PointerAction::Move, 0.0, 80.0)),
            Some(UiEvent::Drag { pos: Vec2::new(0.0, 80.0), start })
        );
        // Coming back inside the slop keeps dragging.
        assert_eq!(
            g.on_pointer(&ev(PointerAction::Move, 0.0, 98.0)),
            Some(UiEvent::Drag { pos: Vec2::new(0.0, 98.0), start })
        );
        assert_eq!(
            g.on_pointer(&ev(PointerAction::Up, 0.0, 98.0)),
            Some(UiEvent::DragEnd { pos: Vec2::new(0.0, 98.0), start })
        );
    }

    #[test]
    fn move_and_up_without_down_are_ignored() {
        let mut g = GestureTracker::default();
        assert_eq!(g.on_pointer(&ev(PointerAction::Move, 1.0, 1.0)), None);
        assert_eq!(g.on_pointer(&ev(PointerAction::Up, 1.0, 1.0)), None);
    }
}
