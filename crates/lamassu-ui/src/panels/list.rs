use lamassu_engine::coords::{LogicalSize, Rect, Vec2};
use lamassu_engine::paint::Color;

use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::recipes::{label_color, Recipe};
use crate::text::FontId;
use crate::widget::Widget;
use crate::widgets::scroll::ScrollState;

/// Scrollable list of recipe rows. Drag scrolls, click selects.
pub struct RecipeListPanel {
    recipes: Vec<Recipe>,
    row_height: f32,
    font: Option<FontId>,
    scroll: ScrollState,
    pressed: Option<usize>,
    selected: Option<usize>,
}

impl RecipeListPanel {
    pub fn new(recipes: Vec<Recipe>, row_height: f32, font: Option<FontId>, size: LogicalSize) -> Self {
        let row_height = row_height.max(1.0);
        let mut scroll = ScrollState::new();
        scroll.set_extents(recipes.len() as f32 * row_height, size.height);
        Self {
            recipes,
            row_height,
            font,
            scroll,
            pressed: None,
            selected: None,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn selected(&self) -> Option<&Recipe> {
        self.selected.and_then(|i| self.recipes.get(i))
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    fn row_at(&self, rect: Rect, pos: Vec2) -> Option<usize> {
        if !rect.contains(pos) {
            return None;
        }
        let idx = ((pos.y - rect.origin.y + self.scroll.offset()) / self.row_height) as usize;
        (idx < self.recipes.len()).then_some(idx)
    }

    fn paint_row(&self, painter: &mut Painter, row: Rect, i: usize, recipe: &Recipe) {
        if self.selected == Some(i) {
            painter.fill_rect(row, Color::from_srgb_u8(0xe3, 0xf2, 0xfd, 0xff));
        } else if self.pressed == Some(i) {
            painter.fill_rect(row, Color::from_srgb_u8(0xf5, 0xf5, 0xf5, 0xff));
        }

        let label = label_color(&recipe.label);

        // Thumbnail placeholder tinted by the diet label.
        let side = (row.size.y - 16.0).max(0.0);
        let thumb = Rect::new(row.origin.x + 8.0, row.origin.y + 8.0, side, side);
        painter.fill_rounded_rect(thumb, 6.0, label.with_coverage(0.25));
        painter.fill_circle(
            Vec2::new(thumb.origin.x + side * 0.5, thumb.origin.y + side * 0.5),
            side * 0.2,
            label.with_coverage(0.6),
        );

        let text_x = thumb.max().x + 12.0;
        let text_w = (row.max().x - text_x - 12.0).max(0.0);
        let line = row.size.y / 4.0;
        painter.text(
            &recipe.title,
            self.font,
            line * 0.85,
            Color::from_srgb_u8(0x21, 0x21, 0x21, 0xff),
            Vec2::new(text_x, row.origin.y + line * 0.4),
            Some(text_w),
        );
        painter.text(
            &recipe.description,
            self.font,
            line * 0.6,
            Color::from_srgb_u8(0x61, 0x61, 0x61, 0xff),
            Vec2::new(text_x, row.origin.y + line * 1.5),
            Some(text_w),
        );
        painter.text(
            &recipe.label,
            self.font,
            line * 0.6,
            label,
            Vec2::new(text_x, row.origin.y + line * 2.6),
            Some(text_w),
        );

        painter.fill_rect(
            Rect::new(row.origin.x, row.max().y - 1.0, row.size.x, 1.0),
            Color::from_srgb_u8(0xe0, 0xe0, 0xe0, 0xff),
        );
    }
}

impl Widget for RecipeListPanel {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        if self.recipes.is_empty() {
            painter.text(
                "No recipes",
                self.font,
                18.0,
                Color::from_srgb_u8(0x9e, 0x9e, 0x9e, 0xff),
                Vec2::new(rect.origin.x + 16.0, rect.origin.y + 16.0),
                None,
            );
            return;
        }

        let first = (self.scroll.offset() / self.row_height) as usize;
        let top = rect.origin.y - self.scroll.offset();
        for (i, recipe) in self.recipes.iter().enumerate().skip(first) {
            let row = Rect::new(rect.origin.x, top + i as f32 * self.row_height, rect.size.x, self.row_height);
            if row.origin.y >= rect.max().y {
                break;
            }
            self.paint_row(painter, row, i, recipe);
        }

        self.scroll.paint_scrollbar(painter, rect);
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect) -> EventResult {
        self.scroll
            .set_extents(self.recipes.len() as f32 * self.row_height, rect.size.y);

        match *event {
            UiEvent::Press { pos } => {
                self.pressed = self.row_at(rect, pos);
                if self.pressed.is_some() { EventResult::Consumed } else { EventResult::Ignored }
            }
            UiEvent::Drag { pos, start } => {
                self.pressed = None;
                self.scroll.drag(start.y, pos.y);
                EventResult::Consumed
            }
            UiEvent::DragEnd { .. } => {
                self.scroll.end_drag();
                EventResult::Consumed
            }
            UiEvent::Click { pos } => {
                self.pressed = None;
                let Some(idx) = self.row_at(rect, pos) else {
                    return EventResult::Ignored;
                };
                self.selected = Some(idx);
                let r = &self.recipes[idx];
                log::info!("selected recipe {:?} ({})", r.title, r.instruction_url);
                EventResult::Consumed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: f32 = 96.0;

    fn recipe(n: usize) -> Recipe {
        Recipe {
            title: format!("Recipe {n}"),
            description: "Tasty".into(),
            image_url: String::new(),
            instruction_url: format!("https://example.com/{n}"),
            label: "Balanced".into(),
        }
    }

    fn panel(rows: usize) -> RecipeListPanel {
        RecipeListPanel::new((0..rows).map(recipe).collect(), ROW, None, LogicalSize::new(300.0, 300.0))
    }

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 300.0, 300.0)
    }

    #[test]
    fn click_selects_row_under_pointer() {
        let mut p = panel(10);
        let ev = UiEvent::Click { pos: Vec2::new(50.0, ROW * 2.5) };
        assert_eq!(p.on_event(&ev, bounds()), EventResult::Consumed);
        assert_eq!(p.selected().map(|r| r.title.as_str()), Some("Recipe 2"));
    }

    #[test]
    fn click_below_last_row_is_ignored() {
        let mut p = panel(2);
        let ev = UiEvent::Click { pos: Vec2::new(50.0, ROW * 2.5) };
        assert_eq!(p.on_event(&ev, bounds()), EventResult::Ignored);
        assert!(p.selected().is_none());
    }

    #[test]
    fn drag_scrolls_and_shifts_hit_testing() {
        let mut p = panel(10);
        let start = Vec2::new(50.0, 250.0);
        p.on_event(&UiEvent::Press { pos: start }, bounds());
        p.on_event(&UiEvent::Drag { pos: Vec2::new(50.0, 58.0), start }, bounds());
        p.on_event(&UiEvent::DragEnd { pos: Vec2::new(50.0, 58.0), start }, bounds());
        assert_eq!(p.scroll_offset(), ROW * 2.0);

        p.on_event(&UiEvent::Click { pos: Vec2::new(50.0, 10.0) }, bounds());
        assert_eq!(p.selected().map(|r| r.title.as_str()), Some("Recipe 2"));
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut p = panel(4);
        let start = Vec2::new(50.0, 290.0);
        p.on_event(&UiEvent::Drag { pos: Vec2::new(50.0, -5000.0), start }, bounds());
        assert_eq!(p.scroll_offset(), ROW * 4.0 - 300.0);
    }

    #[test]
    fn empty_list_ignores_clicks() {
        let mut p = panel(0);
        assert_eq!(p.on_event(&UiEvent::Click { pos: Vec2::new(1.0, 1.0) }, bounds()), EventResult::Ignored);
    }
}
