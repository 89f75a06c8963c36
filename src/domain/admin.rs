//! Admin-pool domain model and admin console types

use super::common::StringUuid;
use super::principal::{Principal, Role, SessionKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Admin entity (roles admin and moderator)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admin {
    pub id: StringUuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    pub role: Role,
    #[sqlx(json)]
    pub permissions: Vec<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Admin {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            role: Role::Admin,
            permissions: Role::Admin.default_permissions(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<Admin> for Principal {
    fn from(admin: Admin) -> Self {
        Principal {
            id: admin.id,
            role: admin.role,
            email: admin.email,
            name: admin.name,
            region: None,
            phone: None,
            // Admin-pool principals are provisioned by another admin.
            is_verified: true,
            permissions: admin.permissions,
            pool: SessionKind::Admin,
        }
    }
}

/// Fields persisted for a new admin-pool principal
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub permissions: Vec<String>,
}

/// Invite request; `role` must be "admin" or "moderator".
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct InviteAdminInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvitedAdmin {
    pub admin: Principal,
    /// One-time password handed back to the inviting admin
    pub temp_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserStats {
    pub total: i64,
    pub farmers: i64,
    pub investors: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentStats {
    pub products: i64,
    pub land: i64,
    pub funding: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinancialStats {
    pub orders: i64,
    pub revenue: f64,
}

/// System-wide counters for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SystemStats {
    pub users: UserStats,
    pub content: ContentStats,
    pub financials: FinancialStats,
}
