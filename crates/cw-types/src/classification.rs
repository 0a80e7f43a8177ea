use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Traffic-light risk bucket assigned upstream to each position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Green,
    Yellow,
    Amber,
    Red,
    /// Any label outside the four buckets, kept verbatim.
    Unclassified(String),
}

impl Category {
    /// Exact, case-sensitive parse. Never fails.
    pub fn parse(label: &str) -> Self {
        match label {
            "Green" => Category::Green,
            "Yellow" => Category::Yellow,
            "Amber" => Category::Amber,
            "Red" => Category::Red,
            other => Category::Unclassified(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Green => "Green",
            Category::Yellow => "Yellow",
            Category::Amber => "Amber",
            Category::Red => "Red",
            Category::Unclassified(label) => label,
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::parse(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How urgently a category needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    /// No mapping on file.
    Neutral,
    Low,
    Moderate,
    Elevated,
    Critical,
}

/// Display attributes for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    /// Hex color, e.g. `#00FF00`.
    pub color: String,
    pub urgency: Urgency,
}

impl CategoryStyle {
    pub fn new(color: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            color: color.into(),
            urgency,
        }
    }

    pub fn neutral() -> Self {
        Self::new(CategoryPalette::NEUTRAL_COLOR, Urgency::Neutral)
    }
}

/// Category → color/urgency table. Unmapped categories resolve to a
/// neutral style instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPalette {
    styles: HashMap<Category, CategoryStyle>,
}

impl CategoryPalette {
    pub const NEUTRAL_COLOR: &'static str = "#FFFFFF";

    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    pub fn insert(&mut self, category: Category, style: CategoryStyle) {
        self.styles.insert(category, style);
    }

    pub fn style(&self, category: &Category) -> CategoryStyle {
        self.styles
            .get(category)
            .cloned()
            .unwrap_or_else(CategoryStyle::neutral)
    }

    pub fn color(&self, category: &Category) -> String {
        self.style(category).color
    }

    pub fn urgency(&self, category: &Category) -> Urgency {
        self.style(category).urgency
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.insert(Category::Green, CategoryStyle::new("#00FF00", Urgency::Low));
        palette.insert(Category::Yellow, CategoryStyle::new("#FFFF00", Urgency::Moderate));
        palette.insert(Category::Amber, CategoryStyle::new("#FFA500", Urgency::Elevated));
        palette.insert(Category::Red, CategoryStyle::new("#FF0000", Urgency::Critical));
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(Category::parse("Amber"), Category::Amber);
        assert_eq!(
            Category::parse("amber"),
            Category::Unclassified("amber".to_string())
        );
        assert_eq!(Category::parse("Blue").label(), "Blue");
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Amber).unwrap();
        assert_eq!(json, "\"Amber\"");
        let back: Category = serde_json::from_str("\"Teal\"").unwrap();
        assert_eq!(back, Category::Unclassified("Teal".to_string()));
    }

    #[test]
    fn default_palette_maps_all_buckets() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color(&Category::Green), "#00FF00");
        assert_eq!(palette.color(&Category::Red), "#FF0000");
        assert_eq!(palette.urgency(&Category::Amber), Urgency::Elevated);
        assert!(palette.urgency(&Category::Red) > palette.urgency(&Category::Yellow));
    }

    #[test]
    fn unmapped_category_degrades_to_neutral() {
        let palette = CategoryPalette::default();
        let unknown = Category::parse("Purple");
        assert_eq!(palette.color(&unknown), CategoryPalette::NEUTRAL_COLOR);
        assert_eq!(palette.urgency(&unknown), Urgency::Neutral);

        let empty = CategoryPalette::empty();
        assert_eq!(empty.style(&Category::Green), CategoryStyle::neutral());
    }
}
