//! Buyer orders (checkout is a mock; no payment is taken)

use super::common::{mysql_string_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

mysql_string_enum!(OrderStatus);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: StringUuid,
    pub buyer_id: StringUuid,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Order {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            buyer_id: StringUuid::nil(),
            total_amount: 0.0,
            status: OrderStatus::Pending,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: StringUuid,
    pub order_id: StringUuid,
    pub product_id: StringUuid,
    pub quantity: i32,
    pub price_at_purchase: f64,
}

/// Product fields shown on an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub name: String,
    pub images: Vec<String>,
}

/// A stored line item with the product it refers to, if it still exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Option<ProductSummary>,
}

/// An order together with its line items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// One checkout line. The unit price comes from the catalog; a `price`
/// sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub product_id: StringUuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateOrderInput {
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
}

/// Sum of quantity times purchase price over every line.
pub fn order_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| f64::from(item.quantity) * item.price_at_purchase)
        .sum()
}

/// Mock payment reference, `REF-<unix millis>`.
pub fn payment_reference(at: DateTime<Utc>) -> String {
    format!("REF-{}", at.timestamp_millis())
}
