//! Logger initialization.
//!
//! Engine code only talks to the `log` facade; hosts that already install a
//! logger can skip [`init_logging`] entirely.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
