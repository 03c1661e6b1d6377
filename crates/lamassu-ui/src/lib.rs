//! Lamassu UI: panel content drawn into `lamassu-engine` off-screen surfaces.
//!
//! Two content kinds ship here:
//! - [`panels::WebPanel`]: URL bar plus a page area painted by a [`panels::PageRenderer`]
//! - [`panels::RecipeListPanel`]: scrollable list of recipes loaded from JSON
//!
//! Both are plain [`Widget`]s wrapped in a [`PanelHost`], which adapts them to
//! the engine's `ContentHost` trait. [`PanelFactory`] picks the widget per
//! `ContentKind` and is what a host hands to `Compositor::new`.
//!
//! # Custom content
//!
//! ```rust,ignore
//! use lamassu_ui::prelude::*;
//!
//! struct Swatch(Color);
//!
//! impl Widget for Swatch {
//!     fn paint(&self, painter: &mut Painter, rect: Rect) {
//!         painter.fill_rounded_rect(rect.inset(8.0), 12.0, self.0);
//!     }
//! }
//!
//! let host = PanelHost::new(Swatch(Color::from_hex("#3366ff").unwrap()), fonts, size);
//! ```

pub mod event;
pub mod factory;
pub mod host;
pub mod painter;
pub mod panels;
pub mod recipes;
pub mod text;
pub mod widget;
pub mod widgets;

pub use factory::{ListPanelConfig, PanelFactory, RecipeSource, WebPanelConfig};
pub use host::PanelHost;
pub use widget::Widget;

/// Everything needed to write panel content.
pub mod prelude {
    pub use crate::event::{EventResult, GestureTracker, UiEvent};
    pub use crate::host::PanelHost;
    pub use crate::painter::Painter;
    pub use crate::text::{FontId, FontSystem};
    pub use crate::widget::Widget;
    pub use crate::widgets::scroll::ScrollState;

    pub use lamassu_engine::coords::{LogicalSize, Rect, Vec2};
    pub use lamassu_engine::paint::Color;
}
