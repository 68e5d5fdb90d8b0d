use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use super::Record;

/// Image name the API assigns when no picture was uploaded
pub const DEFAULT_TRAINING_IMAGE: &str = "default-training.jpg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

impl Training {
    /// Price after discount, never below zero
    pub fn effective_price(&self) -> f64 {
        (self.price - self.discount).max(0.0)
    }

    pub fn has_custom_image(&self) -> bool {
        self.image_url
            .as_deref()
            .map(|u| !u.is_empty() && u != DEFAULT_TRAINING_IMAGE)
            .unwrap_or(false)
    }
}

impl Record for Training {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingInput {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub price: f64,
    pub discount: f64,
    pub featured: bool,
    pub order: i64,
}

impl TrainingInput {
    /// Multipart text fields; the image part is appended by the client.
    pub fn to_form(&self) -> Form {
        Form::new()
            .text("title", self.title.clone())
            .text("description", self.description.clone())
            .text("duration", self.duration.clone())
            .text("price", self.price.to_string())
            .text("discount", self.discount.to_string())
            .text("featured", self.featured.to_string())
            .text("order", self.order.to_string())
    }
}
