use std::fmt;
use std::time::Duration;

use crate::coords::Vec2;
use crate::texture::TextureHandle;

/// One raw controller sample as reported by the VR host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    /// Panel texture under the pointer ray.
    pub target: TextureHandle,
    /// Hit position in the panel's logical pixels.
    pub x: f32,
    pub y: f32,
    /// Trigger / touch held.
    pub pressed: bool,
}

impl PointerSample {
    #[inline]
    pub fn new(target: TextureHandle, x: f32, y: f32, pressed: bool) -> Self {
        Self { target, x, y, pressed }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

impl fmt::Display for PointerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PointerAction::Down => "down",
            PointerAction::Move => "move",
            PointerAction::Up => "up",
        })
    }
}

/// Single-pointer event delivered to a content host.
///
/// Times are measured from the router's creation; `down_time` is the time of
/// the Down that started the gesture and stays fixed until Up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pos: Vec2,
    pub down_time: Duration,
    pub event_time: Duration,
}

/// Whether a host acted on a pointer event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// How touch state is tracked across panels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RoutingMode {
    /// One touch for the whole scene. Once a press lands on a panel, every
    /// sample until release goes to that panel, whatever it hits.
    #[default]
    SinglePointer,
    /// Independent touch state per target texture.
    PerTarget,
}
