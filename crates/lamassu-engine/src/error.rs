use thiserror::Error;

use crate::content::ContentKind;

/// Recoverable failures surfaced by the compositor API.
///
/// Oversized requests are rejected up front with [`TooLarge`](Self::TooLarge).
/// Any other texture allocation failure aborts the process (see
/// [`OffscreenSurface::initialize`](crate::surface::OffscreenSurface::initialize)).
#[derive(Debug, Error)]
pub enum CompositorError {
    #[error("panel size {width}x{height} must be positive")]
    InvalidSize { width: u32, height: u32 },

    #[error("panel texture {width}x{height} px exceeds the device limit of {limit} px")]
    TooLarge { width: u32, height: u32, limit: u32 },

    #[error("UI thread is not running")]
    UiThreadGone,

    #[error("blocking compositor call issued from the UI thread")]
    UiThreadReentry,

    #[error("failed to create {kind} content: {reason}")]
    ContentCreationFailed { kind: ContentKind, reason: String },

    #[error("failed to spawn UI thread")]
    UiThreadSpawn(#[source] std::io::Error),
}
