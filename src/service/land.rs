//! Land listings and inquiries business logic

use crate::domain::{
    CreateInquiryInput, CreateLandListingInput, InquiryStatus, LandInquiry, LandInquiryView,
    LandListing, LandListingQuery, Principal, StringUuid, UpdateLandListingInput,
};
use crate::error::Result;
use crate::policy::{
    enforce, reject_self_inquiry, require_land_owner, require_party, OwnershipCheck, PolicyAction,
};
use crate::repository::{LandInquiryRepository, LandListingRepository};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct LandService<L: LandListingRepository, I: LandInquiryRepository> {
    listing_repo: Arc<L>,
    inquiry_repo: Arc<I>,
}

impl<L: LandListingRepository, I: LandInquiryRepository> LandService<L, I> {
    pub fn new(listing_repo: Arc<L>, inquiry_repo: Arc<I>) -> Self {
        Self {
            listing_repo,
            inquiry_repo,
        }
    }

    pub async fn list(&self, query: &LandListingQuery) -> Result<Vec<LandListing>> {
        self.listing_repo.list(query).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<LandListing> {
        self.listing_repo.find_by_id(id).await?.or_not_found()
    }

    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateLandListingInput,
    ) -> Result<LandListing> {
        enforce(principal, PolicyAction::LandListingCreate)?;
        input.validate()?;

        let now = Utc::now();
        let listing = LandListing {
            id: StringUuid::new_v4(),
            title: input.title,
            description: input.description,
            location: input.location,
            region: input.region,
            size: input.size,
            price: input.price,
            land_type: input.land_type,
            images: input.images,
            is_available: true,
            owner_id: principal.id,
            created_at: now,
            updated_at: now,
        };

        let created = self.listing_repo.create(&listing).await?;
        tracing::info!(listing_id = %created.id, owner_id = %created.owner_id, "land listed");
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: StringUuid,
        input: UpdateLandListingInput,
    ) -> Result<LandListing> {
        input.validate()?;
        let mut listing = self
            .listing_repo
            .find_by_id(id)
            .await?
            .authorize_owner(principal, PolicyAction::LandListingUpdate)?;

        listing.apply(input);
        self.listing_repo.update(&listing).await
    }

    pub async fn delete(&self, principal: &Principal, id: StringUuid) -> Result<()> {
        self.listing_repo
            .find_by_id(id)
            .await?
            .authorize_owner(principal, PolicyAction::LandListingDelete)?;

        self.listing_repo.delete(id).await?;
        tracing::info!(listing_id = %id, deleted_by = %principal.id, "land listing deleted");
        Ok(())
    }

    /// Any authenticated principal except the land's owner.
    pub async fn create_inquiry(
        &self,
        principal: &Principal,
        input: CreateInquiryInput,
    ) -> Result<LandInquiry> {
        input.validate()?;
        let land = self
            .listing_repo
            .find_by_id(input.land_id)
            .await?
            .or_not_found()?;
        reject_self_inquiry(principal, &land)?;

        let now = Utc::now();
        let inquiry = LandInquiry {
            id: StringUuid::new_v4(),
            land_id: land.id,
            buyer_id: principal.id,
            message: input.message,
            status: InquiryStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.inquiry_repo.create(&inquiry).await
    }

    /// Inquiries the principal has sent, with the land and its owner.
    pub async fn my_inquiries(&self, principal: &Principal) -> Result<Vec<LandInquiryView>> {
        self.inquiry_repo.list_by_buyer(principal.id).await
    }

    /// Inquiries received on the principal's own listings, with the buyer.
    pub async fn owner_inquiries(&self, principal: &Principal) -> Result<Vec<LandInquiryView>> {
        self.inquiry_repo.list_by_land_owner(principal.id).await
    }

    /// Visible to the inquiring buyer and the land owner only.
    pub async fn get_inquiry(&self, principal: &Principal, id: StringUuid) -> Result<LandInquiry> {
        let inquiry = self.inquiry_repo.find_by_id(id).await?.or_not_found()?;
        let land_owner = self
            .listing_repo
            .find_by_id(inquiry.land_id)
            .await?
            .map(|land| land.owner_id);

        let mut parties = vec![inquiry.buyer_id];
        parties.extend(land_owner);
        require_party(
            principal,
            PolicyAction::InquiryRead,
            "inquiry",
            &parties,
            false,
        )?;

        Ok(inquiry)
    }

    /// Land owner only; any status may follow any other.
    pub async fn update_inquiry_status(
        &self,
        principal: &Principal,
        id: StringUuid,
        status: InquiryStatus,
    ) -> Result<LandInquiry> {
        let inquiry = self.inquiry_repo.find_by_id(id).await?.or_not_found()?;
        let land = self
            .listing_repo
            .find_by_id(inquiry.land_id)
            .await?
            .or_not_found()?;
        require_land_owner(principal, &land)?;

        let updated = self.inquiry_repo.update_status(id, status).await?;
        tracing::info!(inquiry_id = %id, status = %status, "inquiry status updated");
        Ok(updated)
    }
}
