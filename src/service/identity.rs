//! Session/identity resolution and credential flows

use crate::domain::{
    normalize_email, AuthResponse, LoginInput, NewUser, Principal, RegisterInput, Role,
    StringUuid,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::{AdminRepository, UserRepository};
use crate::telemetry::metrics::{AUTH_LOGIN_TOTAL, AUTH_TOKEN_RESOLUTION_TOTAL};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use metrics::counter;
use std::sync::Arc;
use validator::Validate;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";
pub const USER_NOT_FOUND: &str = "Not authorized, user not found";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_ADMIN_CREDENTIALS: &str = "Invalid admin credentials";

pub struct IdentityService<U: UserRepository, A: AdminRepository> {
    user_repo: Arc<U>,
    admin_repo: Arc<A>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository, A: AdminRepository> IdentityService<U, A> {
    pub fn new(user_repo: Arc<U>, admin_repo: Arc<A>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            admin_repo,
            jwt_manager,
        }
    }

    /// Resolve an optional bearer token to a principal.
    ///
    /// The User pool is checked before the Admin pool. The returned role is
    /// the stored one; the token's role claim is ignored.
    pub async fn resolve(&self, token: Option<&str>) -> Result<Principal> {
        let Some(token) = token else {
            counter!(AUTH_TOKEN_RESOLUTION_TOTAL, "result" => "no_token").increment(1);
            return Err(AppError::Unauthorized(NO_TOKEN.to_string()));
        };

        let claims = self.jwt_manager.verify_session_token(token).map_err(|e| {
            tracing::debug!(error = %e, "session token rejected");
            counter!(AUTH_TOKEN_RESOLUTION_TOTAL, "result" => "token_failed").increment(1);
            AppError::Unauthorized(TOKEN_FAILED.to_string())
        })?;

        let id = StringUuid::parse_str(&claims.sub).map_err(|_| {
            counter!(AUTH_TOKEN_RESOLUTION_TOTAL, "result" => "token_failed").increment(1);
            AppError::Unauthorized(TOKEN_FAILED.to_string())
        })?;

        match self.lookup(id).await? {
            Some(principal) => {
                counter!(AUTH_TOKEN_RESOLUTION_TOTAL, "result" => "resolved").increment(1);
                Ok(principal)
            }
            None => {
                tracing::info!(principal_id = %id, "token subject no longer exists");
                counter!(AUTH_TOKEN_RESOLUTION_TOTAL, "result" => "user_not_found").increment(1);
                Err(AppError::Unauthorized(USER_NOT_FOUND.to_string()))
            }
        }
    }

    async fn lookup(&self, id: StringUuid) -> Result<Option<Principal>> {
        if let Some(user) = self.user_repo.find_by_id(id).await? {
            return Ok(Some(user.into()));
        }
        if let Some(admin) = self.admin_repo.find_by_id(id).await? {
            return Ok(Some(admin.into()));
        }
        Ok(None)
    }

    /// Public sign-up into the User pool.
    pub async fn register(&self, mut input: RegisterInput) -> Result<AuthResponse> {
        input.email = normalize_email(&input.email);
        input.validate()?;

        let role = match input.role.as_deref() {
            None | Some("") => Role::Buyer,
            Some(raw) => raw
                .parse::<Role>()
                .map_err(AppError::InvalidOperation)?,
        };
        if !role.is_self_registrable() {
            return Err(AppError::InvalidOperation(format!(
                "Role '{}' cannot be chosen at registration",
                role
            )));
        }

        let email = input.email;
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = self
            .user_repo
            .create(&NewUser {
                name: input.name.trim().to_string(),
                email,
                password_hash: hash_password(&input.password)?,
                role,
                region: input.region,
                phone: input.phone,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        self.issue(user.into())
    }

    /// Email/password login against the User pool only.
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse> {
        let email = normalize_email(&input.email);
        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) if verify_password(&input.password, &user.password_hash)? => user,
            _ => {
                counter!(AUTH_LOGIN_TOTAL, "pool" => "user", "result" => "failure").increment(1);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        counter!(AUTH_LOGIN_TOTAL, "pool" => "user", "result" => "success").increment(1);
        self.issue(user.into())
    }

    /// Email/password login against the Admin pool only. Stamps `last_login`.
    pub async fn admin_login(&self, input: LoginInput) -> Result<AuthResponse> {
        let email = normalize_email(&input.email);
        let admin = match self.admin_repo.find_by_email(&email).await? {
            Some(admin) if verify_password(&input.password, &admin.password_hash)? => admin,
            _ => {
                counter!(AUTH_LOGIN_TOTAL, "pool" => "admin", "result" => "failure").increment(1);
                tracing::warn!("failed admin login attempt");
                return Err(AppError::Unauthorized(
                    INVALID_ADMIN_CREDENTIALS.to_string(),
                ));
            }
        };

        self.admin_repo.touch_last_login(admin.id).await?;
        counter!(AUTH_LOGIN_TOTAL, "pool" => "admin", "result" => "success").increment(1);
        tracing::info!(admin_id = %admin.id, role = %admin.role, "admin logged in");
        self.issue(admin.into())
    }

    /// Fresh profile of the calling principal.
    pub async fn me(&self, principal: &Principal) -> Result<Principal> {
        self.lookup(principal.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn issue(&self, principal: Principal) -> Result<AuthResponse> {
        let token = self.jwt_manager.create_session_token(&principal)?;
        Ok(AuthResponse { principal, token })
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
