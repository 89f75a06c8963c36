//! Product repository

use crate::domain::{Product, ProductQuery, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>>;
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>>;
    async fn update(&self, product: &Product) -> Result<Product>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

pub struct ProductRepositoryImpl {
    pool: MySqlPool,
}

impl ProductRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = r#"
    SELECT id, name, category, description, price, unit, quantity_available, region,
           images, freshness_score, harvest_date, seller_id, created_at, updated_at
    FROM products
"#;

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn create(&self, product: &Product) -> Result<Product> {
        let images_json =
            serde_json::to_string(&product.images).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, description, price, unit, quantity_available,
                                  region, images, freshness_score, harvest_date, seller_id,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.unit)
        .bind(product.quantity_available)
        .bind(&product.region)
        .bind(&images_json)
        .bind(product.freshness_score)
        .bind(product.harvest_date)
        .bind(product.seller_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create product")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{} WHERE id = ?", PRODUCT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn list(&self, filter: &ProductQuery) -> Result<Vec<Product>> {
        let mut query_str = format!("{} WHERE 1=1", PRODUCT_COLUMNS);

        if filter.region.is_some() {
            query_str.push_str(" AND region = ?");
        }
        if filter.category.is_some() {
            query_str.push_str(" AND category = ?");
        }
        if filter.search.is_some() {
            query_str.push_str(" AND LOWER(name) LIKE ?");
        }
        query_str.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Product>(&query_str);
        if let Some(region) = &filter.region {
            query = query.bind(region);
        }
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }
        if let Some(search) = &filter.search {
            query = query.bind(format!("%{}%", search.to_lowercase()));
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let images_json =
            serde_json::to_string(&product.images).map_err(|e| AppError::Internal(e.into()))?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, category = ?, description = ?, price = ?, unit = ?,
                quantity_available = ?, region = ?, images = ?, freshness_score = ?,
                harvest_date = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.unit)
        .bind(product.quantity_available)
        .bind(&product.region)
        .bind(&images_json)
        .bind(product.freshness_score)
        .bind(product.harvest_date)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
