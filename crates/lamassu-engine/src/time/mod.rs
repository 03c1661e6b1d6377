//! Refresh timing.
//!
//! One `FrameClock` per refresh loop; call `tick()` once per host frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
