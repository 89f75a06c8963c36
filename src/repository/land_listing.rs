//! Land listing repository

use crate::domain::{LandListing, LandListingQuery, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandListingRepository: Send + Sync {
    async fn create(&self, listing: &LandListing) -> Result<LandListing>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<LandListing>>;
    async fn list(&self, query: &LandListingQuery) -> Result<Vec<LandListing>>;
    async fn update(&self, listing: &LandListing) -> Result<LandListing>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

pub struct LandListingRepositoryImpl {
    pool: MySqlPool,
}

impl LandListingRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const LISTING_COLUMNS: &str = r#"
    SELECT id, title, description, location, region, size, price, type, images,
           is_available, owner_id, created_at, updated_at
    FROM land_listings
"#;

#[async_trait]
impl LandListingRepository for LandListingRepositoryImpl {
    async fn create(&self, listing: &LandListing) -> Result<LandListing> {
        let images_json =
            serde_json::to_string(&listing.images).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO land_listings (id, title, description, location, region, size, price,
                                       type, images, is_available, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.location)
        .bind(&listing.region)
        .bind(listing.size)
        .bind(listing.price)
        .bind(listing.land_type)
        .bind(&images_json)
        .bind(listing.is_available)
        .bind(listing.owner_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(listing.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create land listing")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<LandListing>> {
        let listing =
            sqlx::query_as::<_, LandListing>(&format!("{} WHERE id = ?", LISTING_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(listing)
    }

    async fn list(&self, filter: &LandListingQuery) -> Result<Vec<LandListing>> {
        let mut query_str = format!("{} WHERE is_available = true", LISTING_COLUMNS);

        if filter.region.is_some() {
            query_str.push_str(" AND region = ?");
        }
        if filter.land_type.is_some() {
            query_str.push_str(" AND type = ?");
        }
        if filter.min_size.is_some() {
            query_str.push_str(" AND size >= ?");
        }
        if filter.max_price.is_some() {
            query_str.push_str(" AND price <= ?");
        }
        if filter.owner_id.is_some() {
            query_str.push_str(" AND owner_id = ?");
        }
        query_str.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, LandListing>(&query_str);
        if let Some(region) = &filter.region {
            query = query.bind(region);
        }
        if let Some(land_type) = filter.land_type {
            query = query.bind(land_type);
        }
        if let Some(min_size) = filter.min_size {
            query = query.bind(min_size);
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(max_price);
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.bind(owner_id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn update(&self, listing: &LandListing) -> Result<LandListing> {
        let images_json =
            serde_json::to_string(&listing.images).map_err(|e| AppError::Internal(e.into()))?;

        let result = sqlx::query(
            r#"
            UPDATE land_listings
            SET title = ?, description = ?, location = ?, region = ?, size = ?, price = ?,
                type = ?, images = ?, is_available = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.location)
        .bind(&listing.region)
        .bind(listing.size)
        .bind(listing.price)
        .bind(listing.land_type)
        .bind(&images_json)
        .bind(listing.is_available)
        .bind(listing.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Listing not found".to_string()));
        }

        self.find_by_id(listing.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM land_listings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Listing not found".to_string()));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM land_listings")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
