//! Funding program repository

use crate::domain::{FundingProgram, FundingProgramQuery, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundingProgramRepository: Send + Sync {
    async fn create(&self, program: &FundingProgram) -> Result<FundingProgram>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<FundingProgram>>;
    async fn list(&self, query: &FundingProgramQuery) -> Result<Vec<FundingProgram>>;
    async fn update(&self, program: &FundingProgram) -> Result<FundingProgram>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

pub struct FundingProgramRepositoryImpl {
    pool: MySqlPool,
}

impl FundingProgramRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const PROGRAM_COLUMNS: &str = r#"
    SELECT id, title, description, amount, type, deadline, requirements, interest_rate,
           provider_id, is_active, created_at, updated_at
    FROM funding_programs
"#;

#[async_trait]
impl FundingProgramRepository for FundingProgramRepositoryImpl {
    async fn create(&self, program: &FundingProgram) -> Result<FundingProgram> {
        sqlx::query(
            r#"
            INSERT INTO funding_programs (id, title, description, amount, type, deadline,
                                          requirements, interest_rate, provider_id, is_active,
                                          created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(program.id)
        .bind(&program.title)
        .bind(&program.description)
        .bind(program.amount)
        .bind(program.funding_type)
        .bind(program.deadline)
        .bind(&program.requirements)
        .bind(program.interest_rate)
        .bind(program.provider_id)
        .bind(program.is_active)
        .execute(&self.pool)
        .await?;

        self.find_by_id(program.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create funding program")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<FundingProgram>> {
        let program =
            sqlx::query_as::<_, FundingProgram>(&format!("{} WHERE id = ?", PROGRAM_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(program)
    }

    async fn list(&self, filter: &FundingProgramQuery) -> Result<Vec<FundingProgram>> {
        let mut query_str = format!("{} WHERE is_active = true", PROGRAM_COLUMNS);

        if filter.funding_type.is_some() {
            query_str.push_str(" AND type = ?");
        }
        if filter.min_amount.is_some() {
            query_str.push_str(" AND amount >= ?");
        }
        query_str.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, FundingProgram>(&query_str);
        if let Some(funding_type) = filter.funding_type {
            query = query.bind(funding_type);
        }
        if let Some(min_amount) = filter.min_amount {
            query = query.bind(min_amount);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn update(&self, program: &FundingProgram) -> Result<FundingProgram> {
        let result = sqlx::query(
            r#"
            UPDATE funding_programs
            SET title = ?, description = ?, amount = ?, type = ?, deadline = ?,
                requirements = ?, interest_rate = ?, is_active = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&program.title)
        .bind(&program.description)
        .bind(program.amount)
        .bind(program.funding_type)
        .bind(program.deadline)
        .bind(&program.requirements)
        .bind(program.interest_rate)
        .bind(program.is_active)
        .bind(program.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Program not found".to_string()));
        }

        self.find_by_id(program.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Program not found".to_string()))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM funding_programs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Program not found".to_string()));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM funding_programs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
