//! Per-frame refresh: invalidate content, then latch finished frames.

use parking_lot::Mutex;

use crate::registry::SurfaceRegistry;
use crate::time::FrameClock;

/// Result of one refresh pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStats {
    pub frame_index: u64,
    /// Panels visited.
    pub panels: usize,
    /// Panels whose texture received a new frame.
    pub textures_latched: usize,
    /// Clamped seconds since the previous pass.
    pub dt: f32,
}

/// Drives the render-thread side of every panel once per host frame.
#[derive(Default)]
pub struct FrameRefreshLoop {
    clock: Mutex<FrameClock>,
}

impl FrameRefreshLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts an invalidate to every content, then latches whatever each surface
    /// has published so far.
    ///
    /// The latch does not wait for the invalidates, so a texture may show the
    /// previous frame's content.
    pub fn run(&self, registry: &SurfaceRegistry) -> FrameStats {
        let ft = self.clock.lock().tick();

        let (panels, textures_latched) = registry.with_entries(|entries| {
            for entry in entries {
                if !entry.content.post_invalidate() {
                    log::warn!("FrameRefreshLoop: UI thread gone, {} not invalidated", entry.handle);
                }
            }
            let latched = entries.iter().filter(|e| e.surface.update_texture()).count();
            (entries.len(), latched)
        });

        log::trace!(
            "frame {}: {panels} panel(s), {textures_latched} latched, dt {:.4}s",
            ft.frame_index,
            ft.dt
        );

        FrameStats {
            frame_index: ft.frame_index,
            panels,
            textures_latched,
            dt: ft.dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;
    use crate::paint::Color;
    use crate::test_support::{RecordingFactory, TestRig};

    #[test]
    fn empty_registry_counts_frames() {
        let rig = TestRig::new(RecordingFactory::new());
        let refresh = FrameRefreshLoop::new();
        assert_eq!(refresh.run(&rig.registry).frame_index, 0);
        let stats = refresh.run(&rig.registry);
        assert_eq!(stats.frame_index, 1);
        assert_eq!(stats.panels, 0);
        assert_eq!(stats.textures_latched, 0);
    }

    #[test]
    fn first_draw_is_latched_on_next_refresh() {
        let fill = Color::from_srgb_u8(0, 255, 0, 255);
        let rig = TestRig::new(RecordingFactory::new().with_fill(fill));
        let handle = rig.registry.create_panel(4, 4, ContentKind::List).unwrap();
        rig.ui.handle().flush().unwrap();

        let refresh = FrameRefreshLoop::new();
        let stats = refresh.run(&rig.registry);
        assert_eq!(stats.panels, 1);
        assert_eq!(stats.textures_latched, 1);

        let px = rig.backend.pixels(handle).unwrap();
        assert_eq!(&px[..4], &[0, 255, 0, 255]);
    }

    #[test]
    fn refresh_invalidates_every_panel() {
        let factory = RecordingFactory::new();
        let invalidations = factory.invalidations();
        let rig = TestRig::new(factory);
        rig.registry.create_panel(4, 4, ContentKind::List).unwrap();
        rig.registry.create_panel(4, 4, ContentKind::Web).unwrap();

        let refresh = FrameRefreshLoop::new();
        refresh.run(&rig.registry);
        refresh.run(&rig.registry);
        rig.ui.handle().flush().unwrap();

        assert_eq!(invalidations.load(std::sync::atomic::Ordering::SeqCst), 4);
    }
}
