//! Marketplace product domain model

use super::common::StringUuid;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product listed by a farmer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: StringUuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    /// Sale unit, e.g. "kg" or "bag"
    pub unit: String,
    pub quantity_available: i32,
    pub region: String,
    #[sqlx(json)]
    pub images: Vec<String>,
    /// 0-100
    pub freshness_score: Option<i32>,
    pub harvest_date: Option<NaiveDate>,
    pub seller_id: StringUuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Product {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            category: String::new(),
            description: None,
            price: 0.0,
            unit: String::new(),
            quantity_available: 0,
            region: String::new(),
            images: Vec::new(),
            freshness_score: None,
            harvest_date: None,
            seller_id: StringUuid::nil(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity_available: i32,
    /// Falls back to the seller's region when omitted
    pub region: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(range(min = 0, max = 100))]
    pub freshness_score: Option<i32>,
    pub harvest_date: Option<NaiveDate>,
}

/// Partial update. The seller is fixed at creation and cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 50))]
    pub unit: Option<String>,
    #[validate(range(min = 0))]
    pub quantity_available: Option<i32>,
    pub region: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 0, max = 100))]
    pub freshness_score: Option<i32>,
    pub harvest_date: Option<NaiveDate>,
}

impl Product {
    /// Apply a partial update in place.
    pub fn apply(&mut self, input: UpdateProductInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(unit) = input.unit {
            self.unit = unit;
        }
        if let Some(quantity) = input.quantity_available {
            self.quantity_available = quantity;
        }
        if let Some(region) = input.region {
            self.region = region;
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        if input.freshness_score.is_some() {
            self.freshness_score = input.freshness_score;
        }
        if input.harvest_date.is_some() {
            self.harvest_date = input.harvest_date;
        }
        self.updated_at = Utc::now();
    }
}

/// Public product listing filters
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub region: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(region) = &self.region {
            if &product.region != region {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !product
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}
