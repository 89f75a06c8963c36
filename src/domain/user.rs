//! User-pool domain model (buyers, farmers, investors)

use super::common::StringUuid;
use super::principal::{Principal, Role, SessionKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: StringUuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub profile_image: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            role: Role::Buyer,
            phone: None,
            region: None,
            profile_image: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Principal {
            id: user.id,
            role: user.role,
            email: user.email,
            name: user.name,
            region: user.region,
            phone: user.phone,
            is_verified: user.is_verified,
            permissions: Vec::new(),
            pool: SessionKind::User,
        }
    }
}

/// Contact details shown to the other party of an inquiry or application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub id: StringUuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub region: Option<String>,
}

impl Contact {
    /// Assemble from outer-joined columns; `None` when the user row is gone.
    pub fn from_joined(
        id: Option<StringUuid>,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        region: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            id: id?,
            name: name?,
            email: email?,
            phone,
            region,
        })
    }
}

impl From<&User> for Contact {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            region: user.region.clone(),
        }
    }
}

/// Public registration request.
///
/// `role` stays a raw string so an unknown value is reported as an invalid
/// operation instead of a body deserialization failure.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub role: Option<String>,
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

/// Fields persisted for a new user after validation and hashing
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub region: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Token plus the profile it was issued for
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub principal: Principal,
    pub token: String,
}

/// Admin console update of a user's verification flag
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserStatusInput {
    pub is_verified: Option<bool>,
}

/// Lowercase and trim an email the way it is stored.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
