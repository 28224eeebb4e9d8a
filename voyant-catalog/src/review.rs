use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::ProductType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    #[serde(deserialize_with = "voyant_core::wire::id")]
    pub id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A review being written. Sent as multipart so an optional photo can ride along.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_type: ProductType,
    pub item_id: String,
    pub rating: u8,
    pub comment: String,
    pub image: Option<ReviewImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("Rating must be between 1 and 5".to_string());
        }
        if self.comment.trim().is_empty() {
            return Err("Please write a comment".to_string());
        }
        Ok(())
    }
}

/// Mean rating rounded to one decimal, `None` when there are no reviews yet.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    let mean = sum as f64 / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
