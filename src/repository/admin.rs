//! Admin-pool repository

use crate::domain::{Admin, NewAdmin, StringUuid};
use crate::error::{is_unique_violation, AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, input: &NewAdmin) -> Result<Admin>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Admin>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>>;
    async fn touch_last_login(&self, id: StringUuid) -> Result<()>;
}

pub struct AdminRepositoryImpl {
    pool: MySqlPool,
}

impl AdminRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for AdminRepositoryImpl {
    async fn create(&self, input: &NewAdmin) -> Result<Admin> {
        let id = StringUuid::new_v4();
        let permissions_json = serde_json::to_string(&input.permissions)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO admins (id, name, email, password_hash, role, permissions, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role)
        .bind(&permissions_json)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("An admin with this email already exists.".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create admin")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, name, email, password_hash, role, permissions, last_login, created_at, updated_at
            FROM admins
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, name, email, password_hash, role, permissions, last_login, created_at, updated_at
            FROM admins
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn touch_last_login(&self, id: StringUuid) -> Result<()> {
        sqlx::query("UPDATE admins SET last_login = NOW(), updated_at = NOW() WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
