//! Reusable building blocks for panel widgets.

pub mod scroll;
