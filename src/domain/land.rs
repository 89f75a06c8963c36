//! Land listings and the inquiries buyers send about them

use super::common::{mysql_string_enum, StringUuid};
use super::user::Contact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LandType {
    Lease,
    Sale,
}

impl std::str::FromStr for LandType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lease" => Ok(LandType::Lease),
            "sale" => Ok(LandType::Sale),
            _ => Err(format!("Unknown land type: {}", s)),
        }
    }
}

impl std::fmt::Display for LandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandType::Lease => write!(f, "lease"),
            LandType::Sale => write!(f, "sale"),
        }
    }
}

mysql_string_enum!(LandType);

/// Land offered for lease or sale
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LandListing {
    pub id: StringUuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub region: String,
    /// Acres
    pub size: f64,
    pub price: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub land_type: LandType,
    #[sqlx(json)]
    pub images: Vec<String>,
    pub is_available: bool,
    pub owner_id: StringUuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for LandListing {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            title: String::new(),
            description: None,
            location: String::new(),
            region: String::new(),
            size: 0.0,
            price: 0.0,
            land_type: LandType::Lease,
            images: Vec::new(),
            is_available: true,
            owner_id: StringUuid::nil(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLandListingInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[validate(length(min = 1, max = 100))]
    pub region: String,
    #[validate(range(min = 0.0))]
    pub size: f64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(rename = "type")]
    pub land_type: LandType,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLandListingInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub region: Option<String>,
    #[validate(range(min = 0.0))]
    pub size: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub land_type: Option<LandType>,
    pub images: Option<Vec<String>>,
    pub is_available: Option<bool>,
}

impl LandListing {
    pub fn apply(&mut self, input: UpdateLandListingInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(location) = input.location {
            self.location = location;
        }
        if let Some(region) = input.region {
            self.region = region;
        }
        if let Some(size) = input.size {
            self.size = size;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(land_type) = input.land_type {
            self.land_type = land_type;
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        if let Some(is_available) = input.is_available {
            self.is_available = is_available;
        }
        self.updated_at = Utc::now();
    }
}

/// Public listing filters. Unavailable land is never listed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LandListingQuery {
    pub region: Option<String>,
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub land_type: Option<LandType>,
    pub min_size: Option<f64>,
    pub max_price: Option<f64>,
    pub owner_id: Option<StringUuid>,
}

impl LandListingQuery {
    pub fn matches(&self, listing: &LandListing) -> bool {
        listing.is_available
            && self.region.as_ref().is_none_or(|r| &listing.region == r)
            && self.land_type.is_none_or(|t| listing.land_type == t)
            && self.min_size.is_none_or(|s| listing.size >= s)
            && self.max_price.is_none_or(|p| listing.price <= p)
            && self.owner_id.is_none_or(|o| listing.owner_id == o)
    }
}

/// Inquiry lifecycle. Transitions are not ordered; any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Acknowledged,
    Contacted,
    Closed,
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InquiryStatus::Pending),
            "acknowledged" => Ok(InquiryStatus::Acknowledged),
            "contacted" => Ok(InquiryStatus::Contacted),
            "closed" => Ok(InquiryStatus::Closed),
            _ => Err(format!("Unknown inquiry status: {}", s)),
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InquiryStatus::Pending => write!(f, "pending"),
            InquiryStatus::Acknowledged => write!(f, "acknowledged"),
            InquiryStatus::Contacted => write!(f, "contacted"),
            InquiryStatus::Closed => write!(f, "closed"),
        }
    }
}

mysql_string_enum!(InquiryStatus);

/// A buyer's expression of interest in a land listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LandInquiry {
    pub id: StringUuid,
    pub land_id: StringUuid,
    pub buyer_id: StringUuid,
    pub message: Option<String>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for LandInquiry {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            land_id: StringUuid::nil(),
            buyer_id: StringUuid::nil(),
            message: None,
            status: InquiryStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The listing an inquiry is about, with its owner's contact details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InquiryLand {
    pub id: StringUuid,
    pub title: String,
    pub location: String,
    pub region: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub land_type: LandType,
    pub images: Vec<String>,
    pub owner: Option<Contact>,
}

impl InquiryLand {
    pub fn new(listing: &LandListing, owner: Option<Contact>) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            location: listing.location.clone(),
            region: listing.region.clone(),
            price: listing.price,
            land_type: listing.land_type,
            images: listing.images.clone(),
            owner,
        }
    }
}

/// Inquiry as listed to its buyer or the land owner. The owner needs the
/// buyer's contact details to follow up; the buyer needs the owner's.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LandInquiryView {
    #[serde(flatten)]
    pub inquiry: LandInquiry,
    pub land: Option<InquiryLand>,
    pub buyer: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateInquiryInput {
    pub land_id: StringUuid,
    #[validate(length(max = 5000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateInquiryStatusInput {
    pub status: InquiryStatus,
}
