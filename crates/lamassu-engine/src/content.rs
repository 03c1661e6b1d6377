//! Content hosted on panels.
//!
//! Content objects live on the UI thread only. The render thread refers to them
//! through a [`ContentRef`], which can post work but never touches the object.

use std::fmt;
use std::sync::Arc;

use crate::coords::LogicalSize;
use crate::input::{EventResult, PointerEvent};
use crate::surface::OffscreenSurface;
use crate::ui_thread::UiHandle;

/// Kind of content a panel shows.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContentKind {
    /// Embedded web page with a URL bar.
    Web,
    /// Scrollable recipe list.
    List,
}

impl ContentKind {
    /// Maps the VR host's integer view tags: `0` is web, anything else is a list.
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            0 => ContentKind::Web,
            _ => ContentKind::List,
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            ContentKind::Web => 0,
            ContentKind::List => 1,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentKind::Web => "web",
            ContentKind::List => "list",
        })
    }
}

/// Capabilities every panel content provides. Called on the UI thread only.
pub trait ContentHost {
    /// Binds the surface the content paints into. Called once, right after creation.
    fn attach_surface(&mut self, surface: Arc<OffscreenSurface>);

    /// Marks the content for repaint on the next traversal.
    fn invalidate(&mut self);

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> EventResult;

    /// Paints into the attached surface (begin → paint → end).
    fn draw(&mut self);
}

/// Builds content on the UI thread.
pub trait ContentFactory: Send + Sync {
    fn create(&self, kind: ContentKind, size: LogicalSize) -> anyhow::Result<Box<dyn ContentHost>>;
}

/// UI-thread-local id of a content instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ContentId(pub(crate) u64);

impl ContentId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content#{}", self.0)
    }
}

/// Thread-safe reference to a content instance.
///
/// Everything goes through the UI thread's FIFO, so calls made from one thread
/// reach the content in order.
#[derive(Clone)]
pub struct ContentRef {
    id: ContentId,
    ui: UiHandle,
}

impl ContentRef {
    pub(crate) fn new(id: ContentId, ui: UiHandle) -> Self {
        Self { id, ui }
    }

    #[inline]
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Posts an invalidate. Returns `false` if the UI thread is gone.
    pub fn post_invalidate(&self) -> bool {
        let id = self.id;
        self.ui.post(move |ctx| {
            ctx.invalidate(id);
        })
    }

    /// Posts a pointer event. Returns `false` if the UI thread is gone.
    pub fn post_pointer_event(&self, event: PointerEvent) -> bool {
        let id = self.id;
        self.ui.post(move |ctx| {
            if ctx.dispatch(id, &event).is_none() {
                log::trace!("ContentRef: {} gone before {} event", id, event.action);
            }
        })
    }
}

impl PartialEq for ContentRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContentRef {}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentRef").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_zero_to_web() {
        assert_eq!(ContentKind::from_tag(0), ContentKind::Web);
        assert_eq!(ContentKind::from_tag(1), ContentKind::List);
        assert_eq!(ContentKind::from_tag(-3), ContentKind::List);
    }

    #[test]
    fn tag_round_trips_known_kinds() {
        for kind in [ContentKind::Web, ContentKind::List] {
            assert_eq!(ContentKind::from_tag(kind.tag()), kind);
        }
    }
}
