//! Mock checkout: orders are stored as `pending` with a generated reference

use crate::domain::{
    order_total, payment_reference, CreateOrderInput, Order, OrderItem, OrderStatus,
    OrderWithItems, Principal, StringUuid,
};
use crate::error::{AppError, Result};
use crate::policy::{enforce, OwnershipCheck, PolicyAction};
use crate::repository::{OrderRepository, ProductRepository};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct OrderService<R: OrderRepository, P: ProductRepository> {
    repo: Arc<R>,
    product_repo: Arc<P>,
}

impl<R: OrderRepository, P: ProductRepository> OrderService<R, P> {
    pub fn new(repo: Arc<R>, product_repo: Arc<P>) -> Self {
        Self { repo, product_repo }
    }

    /// Any authenticated principal. Each line is priced from the catalog
    /// and the total is their sum; no stock is reserved and no payment is
    /// taken.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateOrderInput,
    ) -> Result<OrderWithItems> {
        enforce(principal, PolicyAction::OrderCreate)?;
        if input.items.is_empty() {
            return Err(AppError::InvalidOperation("No order items".to_string()));
        }
        input.validate()?;

        let order_id = StringUuid::new_v4();
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let product = self
                .product_repo
                .find_by_id(line.product_id)
                .await?
                .or_not_found()?;
            items.push(OrderItem {
                id: StringUuid::new_v4(),
                order_id,
                product_id: product.id,
                quantity: line.quantity,
                price_at_purchase: product.price,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: order_id,
            buyer_id: principal.id,
            total_amount: order_total(&items),
            status: OrderStatus::Pending,
            payment_reference: Some(payment_reference(now)),
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&order, &items).await?;
        tracing::info!(
            order_id = %created.order.id,
            buyer_id = %created.order.buyer_id,
            total = created.order.total_amount,
            "order placed"
        );
        Ok(created)
    }

    pub async fn my_orders(&self, principal: &Principal) -> Result<Vec<OrderWithItems>> {
        self.repo.list_by_buyer(principal.id).await
    }
}
