//! Land inquiry repository

use crate::domain::{
    Contact, InquiryLand, InquiryStatus, LandInquiry, LandInquiryView, LandType, StringUuid,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandInquiryRepository: Send + Sync {
    async fn create(&self, inquiry: &LandInquiry) -> Result<LandInquiry>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<LandInquiry>>;
    /// Inquiries sent by a buyer, newest first.
    async fn list_by_buyer(&self, buyer_id: StringUuid) -> Result<Vec<LandInquiryView>>;
    /// Inquiries on any listing owned by `owner_id`, newest first.
    async fn list_by_land_owner(&self, owner_id: StringUuid) -> Result<Vec<LandInquiryView>>;
    async fn update_status(&self, id: StringUuid, status: InquiryStatus) -> Result<LandInquiry>;
}

/// Inquiry columns plus the outer-joined listing, owner and buyer.
const VIEW_SELECT: &str = r#"
    SELECT i.id, i.land_id, i.buyer_id, i.message, i.status, i.created_at, i.updated_at,
           l.title AS land_title, l.location AS land_location, l.region AS land_region,
           l.price AS land_price, l.type AS land_type, l.images AS land_images,
           o.id AS owner_id, o.name AS owner_name, o.email AS owner_email,
           o.phone AS owner_phone, o.region AS owner_region,
           b.name AS buyer_name, b.email AS buyer_email,
           b.phone AS buyer_phone, b.region AS buyer_region
    FROM land_inquiries i
    LEFT JOIN land_listings l ON l.id = i.land_id
    LEFT JOIN users o ON o.id = l.owner_id
    LEFT JOIN users b ON b.id = i.buyer_id
"#;

#[derive(FromRow)]
struct InquiryViewRow {
    #[sqlx(flatten)]
    inquiry: LandInquiry,
    land_title: Option<String>,
    land_location: Option<String>,
    land_region: Option<String>,
    land_price: Option<f64>,
    land_type: Option<LandType>,
    land_images: Option<Json<Vec<String>>>,
    owner_id: Option<StringUuid>,
    owner_name: Option<String>,
    owner_email: Option<String>,
    owner_phone: Option<String>,
    owner_region: Option<String>,
    buyer_name: Option<String>,
    buyer_email: Option<String>,
    buyer_phone: Option<String>,
    buyer_region: Option<String>,
}

impl From<InquiryViewRow> for LandInquiryView {
    fn from(row: InquiryViewRow) -> Self {
        let owner = Contact::from_joined(
            row.owner_id,
            row.owner_name,
            row.owner_email,
            row.owner_phone,
            row.owner_region,
        );
        let land = match (row.land_title, row.land_type) {
            (Some(title), Some(land_type)) => Some(InquiryLand {
                id: row.inquiry.land_id,
                title,
                location: row.land_location.unwrap_or_default(),
                region: row.land_region.unwrap_or_default(),
                price: row.land_price.unwrap_or_default(),
                land_type,
                images: row.land_images.map(|images| images.0).unwrap_or_default(),
                owner,
            }),
            _ => None,
        };
        let buyer = Contact::from_joined(
            Some(row.inquiry.buyer_id),
            row.buyer_name,
            row.buyer_email,
            row.buyer_phone,
            row.buyer_region,
        );

        Self {
            inquiry: row.inquiry,
            land,
            buyer,
        }
    }
}

pub struct LandInquiryRepositoryImpl {
    pool: MySqlPool,
}

impl LandInquiryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LandInquiryRepository for LandInquiryRepositoryImpl {
    async fn create(&self, inquiry: &LandInquiry) -> Result<LandInquiry> {
        sqlx::query(
            r#"
            INSERT INTO land_inquiries (id, land_id, buyer_id, message, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(inquiry.id)
        .bind(inquiry.land_id)
        .bind(inquiry.buyer_id)
        .bind(&inquiry.message)
        .bind(inquiry.status)
        .execute(&self.pool)
        .await?;

        self.find_by_id(inquiry.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create inquiry")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<LandInquiry>> {
        let inquiry = sqlx::query_as::<_, LandInquiry>(
            r#"
            SELECT id, land_id, buyer_id, message, status, created_at, updated_at
            FROM land_inquiries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inquiry)
    }

    async fn list_by_buyer(&self, buyer_id: StringUuid) -> Result<Vec<LandInquiryView>> {
        let sql = format!("{VIEW_SELECT} WHERE i.buyer_id = ? ORDER BY i.created_at DESC");
        let rows = sqlx::query_as::<_, InquiryViewRow>(&sql)
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(LandInquiryView::from).collect())
    }

    async fn list_by_land_owner(&self, owner_id: StringUuid) -> Result<Vec<LandInquiryView>> {
        let sql = format!("{VIEW_SELECT} WHERE l.owner_id = ? ORDER BY i.created_at DESC");
        let rows = sqlx::query_as::<_, InquiryViewRow>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(LandInquiryView::from).collect())
    }
    async fn update_status(&self, id: StringUuid, status: InquiryStatus) -> Result<LandInquiry> {
        sqlx::query("UPDATE land_inquiries SET status = ?, updated_at = NOW() WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))
    }
}
