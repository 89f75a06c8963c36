//! Principals, roles and the two identity pools

use super::common::{mysql_string_enum, StringUuid};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The five roles recognised anywhere in the authorization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Farmer,
    Investor,
    Admin,
    Moderator,
}

impl Role {
    /// Admin-class roles override ownership on every ownable resource.
    pub fn is_admin_class(self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }

    /// Roles a visitor may pick at public registration.
    pub fn is_self_registrable(self) -> bool {
        matches!(self, Role::Buyer | Role::Farmer | Role::Investor)
    }

    /// Which pool stores principals holding this role.
    pub fn pool(self) -> SessionKind {
        if self.is_admin_class() {
            SessionKind::Admin
        } else {
            SessionKind::User
        }
    }

    /// Permissions granted to a freshly invited admin-pool principal.
    pub fn default_permissions(self) -> Vec<String> {
        match self {
            Role::Admin => vec!["all".to_string()],
            Role::Moderator => vec!["read".to_string(), "moderate".to_string()],
            _ => Vec::new(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Farmer => "farmer",
            Role::Investor => "investor",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "farmer" => Ok(Role::Farmer),
            "investor" => Ok(Role::Investor),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

mysql_string_enum!(Role);

/// Identity pool backing a principal, and the client-held session a token
/// was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    User,
    Admin,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::User => "user",
            SessionKind::Admin => "admin",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, trusted caller.
///
/// Built from a stored User or Admin row with credential fields removed. The
/// role is always the stored one, never a token claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub id: StringUuid,
    pub role: Role,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    pub pool: SessionKind,
}

impl Principal {
    pub fn is_admin_class(&self) -> bool {
        self.role.is_admin_class()
    }
}
