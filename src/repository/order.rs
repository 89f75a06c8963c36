//! Order repository

use crate::domain::{Order, OrderItem, OrderLine, OrderWithItems, ProductSummary, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order and its items in one transaction.
    async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<OrderWithItems>;
    async fn list_by_buyer(&self, buyer_id: StringUuid) -> Result<Vec<OrderWithItems>>;
    async fn count(&self) -> Result<i64>;
    async fn total_revenue(&self) -> Result<f64>;
}

#[derive(FromRow)]
struct OrderLineRow {
    #[sqlx(flatten)]
    item: OrderItem,
    product_name: Option<String>,
    product_images: Option<Json<Vec<String>>>,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        let product = row.product_name.map(|name| ProductSummary {
            name,
            images: row.product_images.map(|images| images.0).unwrap_or_default(),
        });
        Self {
            item: row.item,
            product,
        }
    }
}

pub struct OrderRepositoryImpl {
    pool: MySqlPool,
}

impl OrderRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn items_for(&self, order_id: StringUuid) -> Result<Vec<OrderLine>> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT i.id, i.order_id, i.product_id, i.quantity, i.price_at_purchase,
                   p.name AS product_name, p.images AS product_images
            FROM order_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.order_id = ?
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderLine::from).collect())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, buyer_id, total_amount, status, payment_reference, created_at, updated_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}

#[async_trait]
impl OrderRepository for OrderRepositoryImpl {
    async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<OrderWithItems> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, buyer_id, total_amount, status, payment_reference, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(order.id)
        .bind(order.buyer_id)
        .bind(order.total_amount)
        .bind(order.status)
        .bind(&order.payment_reference)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price_at_purchase)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price_at_purchase)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let stored = self
            .find_by_id(order.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create order")))?;
        let items = self.items_for(order.id).await?;

        Ok(OrderWithItems {
            order: stored,
            items,
        })
    }

    async fn list_by_buyer(&self, buyer_id: StringUuid) -> Result<Vec<OrderWithItems>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, buyer_id, total_amount, status, payment_reference, created_at, updated_at
            FROM orders
            WHERE buyer_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for(order.id).await?;
            result.push(OrderWithItems { order, items });
        }

        Ok(result)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn total_revenue(&self) -> Result<f64> {
        let row: (Option<f64>,) = sqlx::query_as("SELECT SUM(total_amount) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0.unwrap_or(0.0))
    }
}
