use std::path::PathBuf;
use std::sync::Arc;

use lamassu_engine::content::{ContentFactory, ContentHost, ContentKind};
use lamassu_engine::coords::LogicalSize;

use crate::host::PanelHost;
use crate::panels::{PageRenderer, PlaceholderPage, RecipeListPanel, WebPanel, DEFAULT_HOME_URL};
use crate::recipes::{load_recipes, Recipe};
use crate::text::{FontId, FontSystem};

type PageBuilder = dyn Fn(&str, Option<FontId>) -> Box<dyn PageRenderer> + Send + Sync;

/// Web panel configuration.
#[derive(Clone)]
pub struct WebPanelConfig {
    pub home_url: String,
    /// URL bar strip height in logical pixels.
    pub bar_height: f32,
    /// Builds the page engine for each new panel. Defaults to [`PlaceholderPage`].
    pub page: Arc<PageBuilder>,
}

impl Default for WebPanelConfig {
    fn default() -> Self {
        Self {
            home_url: DEFAULT_HOME_URL.to_owned(),
            bar_height: 48.0,
            page: Arc::new(placeholder_page),
        }
    }
}

fn placeholder_page(home_url: &str, font: Option<FontId>) -> Box<dyn PageRenderer> {
    Box::new(PlaceholderPage::new(home_url, font))
}

/// Where list panels get their recipes.
#[derive(Debug, Clone)]
pub enum RecipeSource {
    /// Read (and re-read) for every new list panel.
    File(PathBuf),
    Inline(Vec<Recipe>),
}

impl RecipeSource {
    fn load(&self) -> Vec<Recipe> {
        match self {
            RecipeSource::File(path) => load_recipes(path),
            RecipeSource::Inline(recipes) => recipes.clone(),
        }
    }
}

/// List panel configuration.
#[derive(Debug, Clone)]
pub struct ListPanelConfig {
    pub source: RecipeSource,
    pub row_height: f32,
}

impl Default for ListPanelConfig {
    fn default() -> Self {
        Self {
            source: RecipeSource::File(PathBuf::from("recipes.json")),
            row_height: 96.0,
        }
    }
}

/// Builds a [`PanelHost`] for each [`ContentKind`].
pub struct PanelFactory {
    fonts: Arc<FontSystem>,
    font: Option<FontId>,
    web: WebPanelConfig,
    list: ListPanelConfig,
}

impl PanelFactory {
    /// `font` is the face used for all text; `None` draws no text.
    pub fn new(fonts: Arc<FontSystem>, font: Option<FontId>) -> Self {
        Self {
            fonts,
            font,
            web: WebPanelConfig::default(),
            list: ListPanelConfig::default(),
        }
    }

    pub fn with_web(mut self, web: WebPanelConfig) -> Self {
        self.web = web;
        self
    }

    pub fn with_list(mut self, list: ListPanelConfig) -> Self {
        self.list = list;
        self
    }
}

impl ContentFactory for PanelFactory {
    fn create(&self, kind: ContentKind, size: LogicalSize) -> anyhow::Result<Box<dyn ContentHost>> {
        if !(size.width > 0.0 && size.height > 0.0) {
            anyhow::bail!("panel size {}x{} is empty", size.width, size.height);
        }

        let host: Box<dyn ContentHost> = match kind {
            ContentKind::Web => {
                let page = (self.web.page)(&self.web.home_url, self.font);
                let panel = WebPanel::new(self.web.home_url.clone(), self.web.bar_height, self.font, page);
                Box::new(PanelHost::new(panel, self.fonts.clone(), size))
            }
            ContentKind::List => {
                let recipes = self.list.source.load();
                let panel = RecipeListPanel::new(recipes, self.list.row_height, self.font, size);
                Box::new(PanelHost::new(panel, self.fonts.clone(), size))
            }
        };

        log::debug!("PanelFactory: built {kind} content ({}x{})", size.width, size.height);
        Ok(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lamassu_engine::coords::{PixelSize, Vec2};
    use lamassu_engine::input::{PointerAction, PointerEvent};
    use lamassu_engine::surface::OffscreenSurface;
    use lamassu_engine::texture::HeadlessTextures;

    fn factory() -> PanelFactory {
        let list = ListPanelConfig {
            source: RecipeSource::Inline(Vec::new()),
            ..ListPanelConfig::default()
        };
        PanelFactory::new(Arc::new(FontSystem::new()), None).with_list(list)
    }

    #[test]
    fn builds_both_kinds() {
        let f = factory();
        let size = LogicalSize::new(200.0, 100.0);
        assert!(f.create(ContentKind::Web, size).is_ok());
        assert!(f.create(ContentKind::List, size).is_ok());
    }

    #[test]
    fn empty_size_is_refused() {
        assert!(factory().create(ContentKind::Web, LogicalSize::new(0.0, 10.0)).is_err());
    }

    #[test]
    fn web_content_paints_url_bar() {
        let backend = Arc::new(HeadlessTextures::new());
        let surface = Arc::new(OffscreenSurface::new(backend.clone(), 2));
        let handle = surface.initialize(PixelSize::new(200, 200));

        let mut host = factory().create(ContentKind::Web, LogicalSize::new(100.0, 100.0)).unwrap();
        host.attach_surface(surface.clone());
        host.draw();
        assert!(surface.update_texture());

        // Bar background at texture (2, 2): logical (1, 1), outside the rounded field.
        let px = backend.pixels(handle).unwrap();
        assert_eq!(&px[(2 * 200 + 2) * 4..][..4], &[0xf1, 0xf3, 0xf4, 0xff]);
    }

    #[test]
    fn tap_on_web_bar_is_consumed() {
        let mut host = factory().create(ContentKind::Web, LogicalSize::new(100.0, 100.0)).unwrap();
        let ev = |action| PointerEvent {
            action,
            pos: Vec2::new(50.0, 10.0),
            down_time: Duration::ZERO,
            event_time: Duration::ZERO,
        };
        host.dispatch_pointer_event(&ev(PointerAction::Down));
        assert!(host.dispatch_pointer_event(&ev(PointerAction::Up)).is_consumed());
    }
}
