//! Built-in content kinds.

mod list;
mod web;

pub use list::RecipeListPanel;
pub use web::{PageAction, PageRenderer, PlaceholderPage, WebPanel, DEFAULT_HOME_URL};
