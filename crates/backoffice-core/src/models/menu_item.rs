use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(rename = "displayOrder", default)]
    pub display_order: i64,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    /// Order the menu the way the cafe displays it
    pub fn sort_for_display(items: &mut [MenuItem]) {
        items.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
    }

    /// Distinct categories in first-seen order
    pub fn categories(items: &[MenuItem]) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in items {
            if !item.category.is_empty() && !seen.iter().any(|c| c.eq_ignore_ascii_case(&item.category)) {
                seen.push(item.category.clone());
            }
        }
        seen
    }
}

impl Record for MenuItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body returned by an availability toggle
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct MenuItemAvailability {
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemInput {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub available: bool,
    #[serde(rename = "displayOrder")]
    pub display_order: i64,
}

impl MenuItemInput {
    pub fn to_form(&self) -> Form {
        Form::new()
            .text("name", self.name.clone())
            .text("price", self.price.to_string())
            .text("category", self.category.clone())
            .text("description", self.description.clone())
            .text("available", self.available.to_string())
            .text("displayOrder", self.display_order.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuCategoryFilter {
    #[default]
    All,
    Category(String),
}

impl MenuCategoryFilter {
    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            MenuCategoryFilter::All => true,
            MenuCategoryFilter::Category(c) => item.category.eq_ignore_ascii_case(c),
        }
    }

    /// Step through All and then each known category
    pub fn next(&self, categories: &[String]) -> Self {
        match self {
            MenuCategoryFilter::All => categories
                .first()
                .map(|c| MenuCategoryFilter::Category(c.clone()))
                .unwrap_or(MenuCategoryFilter::All),
            MenuCategoryFilter::Category(current) => {
                let pos = categories.iter().position(|c| c.eq_ignore_ascii_case(current));
                match pos.and_then(|i| categories.get(i + 1)) {
                    Some(next) => MenuCategoryFilter::Category(next.clone()),
                    None => MenuCategoryFilter::All,
                }
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuCategoryFilter::All => "All",
            MenuCategoryFilter::Category(c) => c,
        }
    }
}
