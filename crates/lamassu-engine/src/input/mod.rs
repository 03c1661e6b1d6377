//! Pointer routing from the 3D scene onto panels.
//!
//! The VR host reports one [`PointerSample`] per controller update: which panel
//! texture the ray hits, where (in that panel's logical pixels), and whether the
//! trigger is held. [`InputRouter`] turns the sample stream into per-panel
//! Down/Move/Up events and posts them to the UI thread.

mod router;
mod state;
mod types;

pub use router::InputRouter;
pub use state::{TouchState, Transition};
pub use types::{EventResult, PointerAction, PointerEvent, PointerSample, RoutingMode};
