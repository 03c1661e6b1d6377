use lamassu_engine::coords::{Rect, Vec2};
use lamassu_engine::paint::Color;

use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::text::FontId;
use crate::widget::Widget;
use crate::widgets::scroll::ScrollState;

pub const DEFAULT_HOME_URL: &str = "https://www.reddit.com/r/food";

/// What a page asks its panel to do after handling input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// A navigation to this URL has started.
    Navigate(String),
}

/// The web engine behind a [`WebPanel`].
///
/// `page` is the page area in panel logical coordinates.
pub trait PageRenderer {
    fn paint(&self, painter: &mut Painter, page: Rect, url: &str);

    /// Handles input that started inside the page area.
    fn on_event(&mut self, event: &UiEvent, page: Rect) -> Option<PageAction>;
}

/// URL bar on top, page below.
pub struct WebPanel {
    url: String,
    bar_height: f32,
    bar_focused: bool,
    font: Option<FontId>,
    page: Box<dyn PageRenderer>,
}

impl WebPanel {
    pub fn new(home_url: impl Into<String>, bar_height: f32, font: Option<FontId>, page: Box<dyn PageRenderer>) -> Self {
        let url = home_url.into();
        log::debug!("WebPanel: loading {url}");
        Self {
            url,
            bar_height: bar_height.max(0.0),
            bar_focused: false,
            font,
            page,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_bar_focused(&self) -> bool {
        self.bar_focused
    }

    /// Called when the page reports a navigation start; the URL bar follows it.
    pub fn on_navigation_start(&mut self, url: impl Into<String>) {
        self.url = url.into();
        log::info!("WebPanel: navigating to {}", self.url);
    }

    fn split(&self, rect: Rect) -> (Rect, Rect) {
        rect.split_top(self.bar_height)
    }
}

impl Widget for WebPanel {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let (bar, page) = self.split(rect);

        self.page.paint(painter, page, &self.url);

        painter.fill_rect(bar, Color::from_srgb_u8(0xf1, 0xf3, 0xf4, 0xff));
        let field = bar.inset(8.0);
        let field_color = if self.bar_focused {
            Color::from_srgb_u8(0xff, 0xff, 0xff, 0xff)
        } else {
            Color::from_srgb_u8(0xe0, 0xe3, 0xe7, 0xff)
        };
        painter.fill_rounded_rect(field, field.size.y * 0.5, field_color);

        let text_size = (field.size.y * 0.55).max(1.0);
        let origin = Vec2::new(field.origin.x + 14.0, field.origin.y + (field.size.y - text_size) * 0.5);
        painter.text(
            &self.url,
            self.font,
            text_size,
            Color::from_srgb_u8(0x20, 0x21, 0x24, 0xff),
            origin,
            Some(field.size.x - 28.0),
        );
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect) -> EventResult {
        let (bar, page) = self.split(rect);
        let origin = event.origin();

        if bar.contains(origin) {
            return match event {
                UiEvent::Click { .. } => {
                    self.bar_focused = !self.bar_focused;
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            };
        }

        if !page.contains(origin) {
            return EventResult::Ignored;
        }

        if self.bar_focused && matches!(event, UiEvent::Click { .. }) {
            self.bar_focused = false;
        }
        if let Some(PageAction::Navigate(url)) = self.page.on_event(event, page) {
            self.on_navigation_start(url);
        }
        EventResult::Consumed
    }
}

// ── placeholder page ──────────────────────────────────────────────────────

const POST_HEIGHT: f32 = 72.0;
const HEADER_HEIGHT: f32 = 56.0;

/// Built-in page used when no web engine is plugged in.
///
/// Shows a header and a list of post links under the home URL. Clicking a post
/// starts a navigation to it; dragging scrolls.
pub struct PlaceholderPage {
    posts: Vec<(String, String)>,
    font: Option<FontId>,
    scroll: ScrollState,
    pressed: Option<usize>,
}

impl PlaceholderPage {
    pub fn new(home_url: &str, font: Option<FontId>) -> Self {
        let base = home_url.trim_end_matches('/');
        let posts = [
            "What I cooked this weekend",
            "Homemade ramen, three days of work",
            "First attempt at sourdough",
            "Grandma's apple pie recipe",
            "Street tacos from my trip",
            "Best way to sear scallops?",
            "Meal prep for the week",
            "Chocolate lava cake",
        ]
        .iter()
        .enumerate()
        .map(|(i, title)| (title.to_string(), format!("{base}/comments/{}", i + 1)))
        .collect();

        Self {
            posts,
            font,
            scroll: ScrollState::new(),
            pressed: None,
        }
    }

    fn content_height(&self) -> f32 {
        HEADER_HEIGHT + self.posts.len() as f32 * POST_HEIGHT
    }

    fn post_at(&self, page: Rect, pos: Vec2) -> Option<usize> {
        let y = pos.y - page.origin.y + self.scroll.offset() - HEADER_HEIGHT;
        if !page.contains(pos) || y < 0.0 {
            return None;
        }
        let idx = (y / POST_HEIGHT) as usize;
        (idx < self.posts.len()).then_some(idx)
    }
}

impl PageRenderer for PlaceholderPage {
    fn paint(&self, painter: &mut Painter, page: Rect, url: &str) {
        painter.fill_rect(page, Color::from_srgb_u8(0xda, 0xe0, 0xe6, 0xff));

        let top = page.origin.y - self.scroll.offset();
        let header = Rect::new(page.origin.x, top, page.size.x, HEADER_HEIGHT);
        painter.fill_rect(header, Color::from_srgb_u8(0xff, 0x45, 0x00, 0xff));
        painter.text(
            url,
            self.font,
            20.0,
            Color::from_srgb_u8(0xff, 0xff, 0xff, 0xff),
            Vec2::new(header.origin.x + 16.0, header.origin.y + 18.0),
            Some(header.size.x - 32.0),
        );

        for (i, (title, _)) in self.posts.iter().enumerate() {
            let row = Rect::new(page.origin.x, top + HEADER_HEIGHT + i as f32 * POST_HEIGHT, page.size.x, POST_HEIGHT);
            if row.max().y < page.origin.y || row.origin.y > page.max().y {
                continue;
            }
            let card = row.inset(6.0);
            let fill = if self.pressed == Some(i) {
                Color::from_srgb_u8(0xf6, 0xf7, 0xf8, 0xff)
            } else {
                Color::from_srgb_u8(0xff, 0xff, 0xff, 0xff)
            };
            painter.fill_rounded_rect(card, 4.0, fill);
            painter.fill_circle(
                Vec2::new(card.origin.x + 28.0, card.origin.y + card.size.y * 0.5),
                16.0,
                Color::from_srgb_u8(0xff, 0xb0, 0x00, 0xff),
            );
            painter.text(
                title,
                self.font,
                18.0,
                Color::from_srgb_u8(0x1c, 0x1c, 0x1c, 0xff),
                Vec2::new(card.origin.x + 56.0, card.origin.y + card.size.y * 0.5 - 10.0),
                Some(card.size.x - 72.0),
            );
        }

        self.scroll.paint_scrollbar(painter, page);
    }

    fn on_event(&mut self, event: &UiEvent, page: Rect) -> Option<PageAction> {
        self.scroll.set_extents(self.content_height(), page.size.y);
        match *event {
            UiEvent::Press { pos } => {
                self.pressed = self.post_at(page, pos);
                None
            }
            UiEvent::Drag { pos, start } => {
                self.pressed = None;
                self.scroll.drag(start.y, pos.y);
                None
            }
            UiEvent::DragEnd { .. } => {
                self.scroll.end_drag();
                None
            }
            UiEvent::Click { pos } => {
                self.pressed = None;
                let idx = self.post_at(page, pos)?;
                Some(PageAction::Navigate(self.posts[idx].1.clone()))
            }
        }
    }
}
