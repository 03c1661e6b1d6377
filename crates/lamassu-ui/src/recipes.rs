//! Recipe data for the list panel.
//!
//! File format:
//! ```json
//! { "recipes": [ { "title": "…", "description": "…", "image": "…", "url": "…", "dietLabel": "Low-Carb" } ] }
//! ```

use std::path::Path;

use anyhow::Context;
use lamassu_engine::paint::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub description: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "url")]
    pub instruction_url: String,
    #[serde(rename = "dietLabel")]
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct RecipeFile {
    recipes: Vec<Recipe>,
}

/// Diet label → label text color.
pub const LABEL_COLORS: &[(&str, &str)] = &[
    ("Low-Carb", "#4caf50"),
    ("Low-Fat", "#2196f3"),
    ("Low-Sodium", "#9c27b0"),
    ("Medium-Carb", "#ff9800"),
    ("Vegetarian", "#8bc34a"),
    ("Balanced", "#f44336"),
];

/// Color for a diet label. Unknown labels are drawn in neutral grey.
pub fn label_color(label: &str) -> Color {
    LABEL_COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .and_then(|(_, hex)| Color::from_hex(hex))
        .unwrap_or_else(|| Color::from_srgb_u8(0x75, 0x75, 0x75, 0xff))
}

/// Parses a recipe file's JSON text.
pub fn parse_recipes(json: &str) -> anyhow::Result<Vec<Recipe>> {
    let file: RecipeFile = serde_json::from_str(json).context("malformed recipe JSON")?;
    Ok(file.recipes)
}

/// Reads recipes from `path`. Failures are logged and yield an empty list.
pub fn load_recipes(path: impl AsRef<Path>) -> Vec<Recipe> {
    let path = path.as_ref();
    let result = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .and_then(|text| parse_recipes(&text));

    match result {
        Ok(recipes) => {
            log::info!("loaded {} recipe(s) from {}", recipes.len(), path.display());
            recipes
        }
        Err(e) => {
            log::error!("recipes unavailable: {e:#}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "recipes": [
            {
                "title": "Grilled Halloumi",
                "description": "Squeaky cheese, charred peppers",
                "image": "https://example.com/halloumi.jpg",
                "url": "https://example.com/halloumi",
                "dietLabel": "Vegetarian"
            }
        ]
    }"#;

    #[test]
    fn parses_renamed_fields() {
        let recipes = parse_recipes(SAMPLE).unwrap();
        assert_eq!(recipes.len(), 1);
        let r = &recipes[0];
        assert_eq!(r.title, "Grilled Halloumi");
        assert_eq!(r.image_url, "https://example.com/halloumi.jpg");
        assert_eq!(r.instruction_url, "https://example.com/halloumi");
        assert_eq!(r.label, "Vegetarian");
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r#"{ "recipes": [ { "title": "x" } ] }"#;
        assert!(parse_recipes(json).is_err());
    }

    #[test]
    fn missing_file_yields_empty_list() {
        assert!(load_recipes("/nonexistent/recipes.json").is_empty());
    }

    #[test]
    fn known_labels_have_distinct_colors() {
        let low_carb = label_color("Low-Carb");
        assert_eq!(low_carb, Color::from_hex("#4caf50").unwrap());
        assert_ne!(low_carb, label_color("Balanced"));
        assert_eq!(label_color("Keto"), Color::from_srgb_u8(0x75, 0x75, 0x75, 0xff));
    }
}
