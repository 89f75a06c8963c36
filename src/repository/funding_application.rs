//! Funding application repository

use crate::domain::{
    ApplicationStatus, Contact, FundingApplication, FundingApplicationView, FundingType,
    ProgramSummary, StringUuid,
};
use crate::error::{is_unique_violation, AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};

pub const DUPLICATE_APPLICATION: &str = "You have already applied to this program";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundingApplicationRepository: Send + Sync {
    /// Insert a new application. A second row for the same
    /// (program, applicant) fails with `Conflict`.
    async fn create(&self, application: &FundingApplication) -> Result<FundingApplication>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<FundingApplication>>;
    async fn find_by_program_and_applicant(
        &self,
        program_id: StringUuid,
        applicant_id: StringUuid,
    ) -> Result<Option<FundingApplication>>;
    async fn list_by_applicant(
        &self,
        applicant_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>>;
    async fn list_by_program(&self, program_id: StringUuid) -> Result<Vec<FundingApplicationView>>;
    /// Applications on every program the provider owns.
    async fn list_by_provider(
        &self,
        provider_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>>;
    async fn update_status(
        &self,
        id: StringUuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<FundingApplication>;
}

/// Application columns plus the outer-joined program and applicant.
const VIEW_SELECT: &str = r#"
    SELECT a.id, a.program_id, a.applicant_id, a.status, a.proposal_text,
           a.amount_requested, a.documents, a.reviewed_at, a.created_at, a.updated_at,
           p.title AS program_title, p.type AS program_type, p.amount AS program_amount,
           u.name AS applicant_name, u.email AS applicant_email,
           u.phone AS applicant_phone, u.region AS applicant_region
    FROM funding_applications a
    LEFT JOIN funding_programs p ON p.id = a.program_id
    LEFT JOIN users u ON u.id = a.applicant_id
"#;

#[derive(FromRow)]
struct ApplicationViewRow {
    #[sqlx(flatten)]
    application: FundingApplication,
    program_title: Option<String>,
    program_type: Option<FundingType>,
    program_amount: Option<f64>,
    applicant_name: Option<String>,
    applicant_email: Option<String>,
    applicant_phone: Option<String>,
    applicant_region: Option<String>,
}

impl From<ApplicationViewRow> for FundingApplicationView {
    fn from(row: ApplicationViewRow) -> Self {
        let program = match (row.program_title, row.program_type) {
            (Some(title), Some(funding_type)) => Some(ProgramSummary {
                id: row.application.program_id,
                title,
                funding_type,
                amount: row.program_amount.unwrap_or_default(),
            }),
            _ => None,
        };
        let applicant = Contact::from_joined(
            Some(row.application.applicant_id),
            row.applicant_name,
            row.applicant_email,
            row.applicant_phone,
            row.applicant_region,
        );

        Self {
            application: row.application,
            program,
            applicant,
        }
    }
}

pub struct FundingApplicationRepositoryImpl {
    pool: MySqlPool,
}

impl FundingApplicationRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FundingApplicationRepository for FundingApplicationRepositoryImpl {
    async fn create(&self, application: &FundingApplication) -> Result<FundingApplication> {
        let documents_json = serde_json::to_string(&application.documents)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO funding_applications (id, program_id, applicant_id, status, proposal_text,
                                              amount_requested, documents, reviewed_at,
                                              created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL, NOW(), NOW())
            "#,
        )
        .bind(application.id)
        .bind(application.program_id)
        .bind(application.applicant_id)
        .bind(application.status)
        .bind(&application.proposal_text)
        .bind(application.amount_requested)
        .bind(&documents_json)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(DUPLICATE_APPLICATION.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        self.find_by_id(application.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create application")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<FundingApplication>> {
        let application = sqlx::query_as::<_, FundingApplication>(
            r#"
            SELECT id, program_id, applicant_id, status, proposal_text, amount_requested,
                   documents, reviewed_at, created_at, updated_at
            FROM funding_applications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    async fn find_by_program_and_applicant(
        &self,
        program_id: StringUuid,
        applicant_id: StringUuid,
    ) -> Result<Option<FundingApplication>> {
        let application = sqlx::query_as::<_, FundingApplication>(
            r#"
            SELECT id, program_id, applicant_id, status, proposal_text, amount_requested,
                   documents, reviewed_at, created_at, updated_at
            FROM funding_applications
            WHERE program_id = ? AND applicant_id = ?
            "#,
        )
        .bind(program_id)
        .bind(applicant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    async fn list_by_applicant(
        &self,
        applicant_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>> {
        let sql = format!("{VIEW_SELECT} WHERE a.applicant_id = ? ORDER BY a.created_at DESC");
        let rows = sqlx::query_as::<_, ApplicationViewRow>(&sql)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FundingApplicationView::from).collect())
    }

    async fn list_by_program(&self, program_id: StringUuid) -> Result<Vec<FundingApplicationView>> {
        let sql = format!("{VIEW_SELECT} WHERE a.program_id = ? ORDER BY a.created_at DESC");
        let rows = sqlx::query_as::<_, ApplicationViewRow>(&sql)
            .bind(program_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FundingApplicationView::from).collect())
    }

    async fn list_by_provider(
        &self,
        provider_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>> {
        let sql = format!("{VIEW_SELECT} WHERE p.provider_id = ? ORDER BY a.created_at DESC");
        let rows = sqlx::query_as::<_, ApplicationViewRow>(&sql)
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FundingApplicationView::from).collect())
    }

    async fn update_status(
        &self,
        id: StringUuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<FundingApplication> {
        sqlx::query(
            r#"
            UPDATE funding_applications
            SET status = ?, reviewed_at = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(reviewed_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }
}
