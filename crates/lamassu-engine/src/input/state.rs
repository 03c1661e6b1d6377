use std::mem;
use std::time::Duration;

use crate::texture::TextureHandle;

use super::types::{PointerAction, PointerSample};

/// Touch state machine, generic over the resolved content type.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchState<C> {
    Idle,
    Touching {
        target: TextureHandle,
        content: C,
        down_time: Duration,
    },
}

impl<C> Default for TouchState<C> {
    fn default() -> Self {
        TouchState::Idle
    }
}

/// Event to dispatch as the result of one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<C> {
    pub action: PointerAction,
    pub content: C,
    pub down_time: Duration,
}

impl<C: Clone> TouchState<C> {
    /// Feeds one sample through the machine.
    ///
    /// `resolve` is only consulted on a press while idle. A press whose target
    /// does not resolve is dropped and the state stays idle.
    pub fn advance(
        &mut self,
        sample: &PointerSample,
        now: Duration,
        resolve: impl FnOnce(TextureHandle) -> Option<C>,
    ) -> Option<Transition<C>> {
        match (mem::take(self), sample.pressed) {
            (TouchState::Idle, false) => None,

            (TouchState::Idle, true) => {
                let Some(content) = resolve(sample.target) else {
                    log::trace!("TouchState: press on unknown {} dropped", sample.target);
                    return None;
                };
                *self = TouchState::Touching {
                    target: sample.target,
                    content: content.clone(),
                    down_time: now,
                };
                Some(Transition {
                    action: PointerAction::Down,
                    content,
                    down_time: now,
                })
            }

            (TouchState::Touching { target, content, down_time }, true) => {
                let t = Transition {
                    action: PointerAction::Move,
                    content: content.clone(),
                    down_time,
                };
                *self = TouchState::Touching { target, content, down_time };
                Some(t)
            }

            (TouchState::Touching { content, down_time, .. }, false) => Some(Transition {
                action: PointerAction::Up,
                content,
                down_time,
            }),
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, TouchState::Idle)
    }

    /// Target bound by the current touch, if any.
    pub fn target(&self) -> Option<TextureHandle> {
        match self {
            TouchState::Idle => None,
            TouchState::Touching { target, .. } => Some(*target),
        }
    }
}
