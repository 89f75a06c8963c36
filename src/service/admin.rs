//! Admin console: dashboard counters, user verification and admin invites

use crate::domain::{
    normalize_email, ContentStats, FinancialStats, InviteAdminInput, InvitedAdmin, NewAdmin,
    Principal, Role, StringUuid, SystemStats, User, UserStats,
};
use crate::error::{AppError, Result};
use crate::policy::{enforce, PolicyAction};
use crate::repository::{
    AdminRepository, FundingProgramRepository, LandListingRepository, OrderRepository,
    ProductRepository, UserRepository,
};
use crate::service::identity::hash_password;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use validator::Validate;

const INVALID_ADMIN_ROLE: &str = "Invalid role. Must be admin or moderator.";
const TEMP_PASSWORD_LEN: usize = 10;

/// Repositories the admin console reads from.
pub struct AdminRepositories<U, A, P, L, F, O> {
    pub users: Arc<U>,
    pub admins: Arc<A>,
    pub products: Arc<P>,
    pub land_listings: Arc<L>,
    pub programs: Arc<F>,
    pub orders: Arc<O>,
}

pub struct AdminService<U, A, P, L, F, O>
where
    U: UserRepository,
    A: AdminRepository,
    P: ProductRepository,
    L: LandListingRepository,
    F: FundingProgramRepository,
    O: OrderRepository,
{
    repos: AdminRepositories<U, A, P, L, F, O>,
}

impl<U, A, P, L, F, O> AdminService<U, A, P, L, F, O>
where
    U: UserRepository,
    A: AdminRepository,
    P: ProductRepository,
    L: LandListingRepository,
    F: FundingProgramRepository,
    O: OrderRepository,
{
    pub fn new(repos: AdminRepositories<U, A, P, L, F, O>) -> Self {
        Self { repos }
    }

    pub async fn stats(&self, principal: &Principal) -> Result<SystemStats> {
        enforce(principal, PolicyAction::SystemStats)?;

        let users = UserStats {
            total: self.repos.users.count().await?,
            farmers: self.repos.users.count_by_role(Role::Farmer).await?,
            investors: self.repos.users.count_by_role(Role::Investor).await?,
        };
        let content = ContentStats {
            products: self.repos.products.count().await?,
            land: self.repos.land_listings.count().await?,
            funding: self.repos.programs.count().await?,
        };
        let financials = FinancialStats {
            orders: self.repos.orders.count().await?,
            revenue: self.repos.orders.total_revenue().await?,
        };

        Ok(SystemStats {
            users,
            content,
            financials,
        })
    }

    /// Newest first. Returns the page and the total user count.
    pub async fn list_users(
        &self,
        principal: &Principal,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<User>, i64)> {
        enforce(principal, PolicyAction::UserList)?;
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        let users = self.repos.users.list(offset, per_page).await?;
        let total = self.repos.users.count().await?;
        Ok((users, total))
    }

    /// Absent `is_verified` leaves the user unchanged.
    pub async fn update_user_status(
        &self,
        principal: &Principal,
        id: StringUuid,
        is_verified: Option<bool>,
    ) -> Result<User> {
        enforce(principal, PolicyAction::UserVerify)?;
        let user = self
            .repos
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        match is_verified {
            Some(verified) => {
                let updated = self.repos.users.update_verified(id, verified).await?;
                tracing::info!(user_id = %id, is_verified = verified, verified_by = %principal.id, "user status updated");
                Ok(updated)
            }
            None => Ok(user),
        }
    }

    /// Creates an admin-pool principal with a one-time password. The
    /// password is returned to the inviting admin exactly once.
    pub async fn invite_admin(
        &self,
        principal: &Principal,
        mut input: InviteAdminInput,
    ) -> Result<InvitedAdmin> {
        enforce(principal, PolicyAction::AdminInvite)?;
        let role = parse_admin_role(&input.role)?;
        input.email = normalize_email(&input.email);
        input.validate()?;

        let temp_password = generate_temp_password();
        let admin = self
            .create_admin_account(&input.email, &temp_password, &input.name, role)
            .await?;
        tracing::info!(admin_id = %admin.id, role = %role, invited_by = %principal.id, "admin invited");

        Ok(InvitedAdmin {
            admin,
            temp_password,
        })
    }

    /// Bootstrap path used by the CLI; no caller principal is involved.
    pub async fn create_admin_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<Principal> {
        if !role.is_admin_class() {
            return Err(AppError::InvalidOperation(INVALID_ADMIN_ROLE.to_string()));
        }
        let email = normalize_email(email);
        if self.repos.admins.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An admin with this email already exists.".to_string(),
            ));
        }

        let admin = self
            .repos
            .admins
            .create(&NewAdmin {
                name: name.to_string(),
                email,
                password_hash: hash_password(password)?,
                role,
                permissions: role.default_permissions(),
            })
            .await?;
        Ok(admin.into())
    }
}

fn parse_admin_role(role: &str) -> Result<Role> {
    role.parse::<Role>()
        .ok()
        .filter(|r| r.is_admin_class())
        .ok_or_else(|| AppError::InvalidOperation(INVALID_ADMIN_ROLE.to_string()))
}

fn generate_temp_password() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect();
    format!("{}A1!", random)
}
