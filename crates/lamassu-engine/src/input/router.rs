use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;

use crate::content::ContentRef;
use crate::registry::SurfaceRegistry;
use crate::texture::TextureHandle;

use super::state::TouchState;
use super::types::{PointerAction, PointerEvent, PointerSample, RoutingMode};

enum Touches {
    Single(TouchState<ContentRef>),
    PerTarget(HashMap<TextureHandle, TouchState<ContentRef>>),
}

/// Routes pointer samples to panel content.
///
/// Transitions are computed on the calling thread; the resulting events are
/// posted to the UI thread in sample order.
pub struct InputRouter {
    mode: RoutingMode,
    epoch: Instant,
    touches: Mutex<Touches>,
}

impl InputRouter {
    pub fn new(mode: RoutingMode) -> Self {
        let touches = match mode {
            RoutingMode::SinglePointer => Touches::Single(TouchState::Idle),
            RoutingMode::PerTarget => Touches::PerTarget(HashMap::new()),
        };
        Self {
            mode,
            epoch: Instant::now(),
            touches: Mutex::new(touches),
        }
    }

    #[inline]
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// Feeds one sample. Returns the action posted to content, if any.
    ///
    /// The transition and the post happen under one lock, so samples fed from
    /// several threads still reach content in the order they were applied.
    pub fn handle_sample(&self, sample: PointerSample, registry: &SurfaceRegistry) -> Option<PointerAction> {
        let resolve = |h: TextureHandle| registry.lookup(h);

        let mut touches = self.touches.lock();
        let now = self.epoch.elapsed();
        let transition = match &mut *touches {
            Touches::Single(state) => state.advance(&sample, now, resolve),
            Touches::PerTarget(states) => {
                let state = states.entry(sample.target).or_default();
                let t = state.advance(&sample, now, resolve);
                if state.is_idle() {
                    states.remove(&sample.target);
                }
                t
            }
        }?;

        let event = PointerEvent {
            action: transition.action,
            pos: sample.pos(),
            down_time: transition.down_time,
            event_time: now,
        };
        // Unbounded queue: posting never blocks while the lock is held.
        if !transition.content.post_pointer_event(event) {
            log::warn!("InputRouter: UI thread gone, {} dropped", event.action);
        }
        drop(touches);
        Some(transition.action)
    }

    /// Drops any touch bound to `handle`. Returns `true` if one was cleared.
    ///
    /// Called when a panel is destroyed so the router never stays latched on a
    /// texture that no longer exists.
    pub fn forget(&self, handle: TextureHandle) -> bool {
        match &mut *self.touches.lock() {
            Touches::Single(state) => {
                if state.target() == Some(handle) {
                    *state = TouchState::Idle;
                    true
                } else {
                    false
                }
            }
            Touches::PerTarget(states) => states.remove(&handle).is_some(),
        }
    }

    /// Targets with a touch in progress.
    pub fn active_targets(&self) -> Vec<TextureHandle> {
        match &*self.touches.lock() {
            Touches::Single(state) => state.target().into_iter().collect(),
            Touches::PerTarget(states) => {
                let mut targets: Vec<_> = states.values().filter_map(TouchState::target).collect();
                targets.sort();
                targets
            }
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(RoutingMode::default())
    }
}
