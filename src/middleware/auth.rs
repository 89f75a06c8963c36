//! Bearer authentication extractors
//!
//! `AuthPrincipal` runs the session resolver on every protected request and
//! hands the resolved principal to the handler. Nothing from the token is
//! trusted beyond its subject; role and profile come from storage.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::domain::Principal;
use crate::error::AppError;
use crate::state::HasServices;

/// Authenticated principal resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl std::ops::Deref for AuthPrincipal {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Bearer token from the request headers.
///
/// A missing header, a non-UTF-8 value or any scheme other than `Bearer`
/// counts as "no token".
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: HasServices,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers);
        let principal = state.identity_service().resolve(token).await?;
        Ok(AuthPrincipal(principal))
    }
}
