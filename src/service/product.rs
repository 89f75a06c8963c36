//! Product business logic

use crate::domain::{
    CreateProductInput, Principal, Product, ProductQuery, StringUuid, UpdateProductInput,
};
use crate::error::{AppError, Result};
use crate::policy::{enforce, OwnershipCheck, PolicyAction};
use crate::repository::ProductRepository;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct ProductService<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        self.repo.list(query).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Product> {
        self.repo.find_by_id(id).await?.or_not_found()
    }

    /// Farmers only. Region defaults to the seller's own region.
    pub async fn create(&self, principal: &Principal, input: CreateProductInput) -> Result<Product> {
        enforce(principal, PolicyAction::ProductCreate)?;
        input.validate()?;

        let region = input
            .region
            .filter(|r| !r.trim().is_empty())
            .or_else(|| principal.region.clone())
            .ok_or_else(|| AppError::Validation("region is required".to_string()))?;

        let now = Utc::now();
        let product = Product {
            id: StringUuid::new_v4(),
            name: input.name,
            category: input.category,
            description: input.description,
            price: input.price,
            unit: input.unit,
            quantity_available: input.quantity_available,
            region,
            images: input.images,
            freshness_score: input.freshness_score,
            harvest_date: input.harvest_date,
            seller_id: principal.id,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&product).await?;
        tracing::info!(product_id = %created.id, seller_id = %created.seller_id, "product listed");
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: StringUuid,
        input: UpdateProductInput,
    ) -> Result<Product> {
        input.validate()?;
        let mut product = self
            .repo
            .find_by_id(id)
            .await?
            .authorize_owner(principal, PolicyAction::ProductUpdate)?;

        product.apply(input);
        self.repo.update(&product).await
    }

    pub async fn delete(&self, principal: &Principal, id: StringUuid) -> Result<()> {
        self.repo
            .find_by_id(id)
            .await?
            .authorize_owner(principal, PolicyAction::ProductDelete)?;

        self.repo.delete(id).await?;
        tracing::info!(product_id = %id, deleted_by = %principal.id, "product deleted");
        Ok(())
    }
}
