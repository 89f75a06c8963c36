//! Sign-up, login for both pools, and the current principal

use crate::api::SuccessResponse;
use crate::domain::{AuthResponse, LoginInput, Principal, RegisterInput};
use crate::error::Result;
use crate::middleware::AuthPrincipal;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Identity",
    request_body = RegisterInput,
    responses(
        (status = 201, description = "Registered; token issued", body = AuthResponse),
        (status = 400, description = "Email taken or role not self-registrable"),
        (status = 422, description = "Invalid input")
    )
)]
/// Public registration into the User pool
pub async fn register<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse> {
    let response = state.identity_service().register(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(response))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Identity",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let response = state.identity_service().login(input).await?;
    Ok(Json(SuccessResponse::new(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Identity",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Admin token issued", body = AuthResponse),
        (status = 401, description = "Invalid admin credentials")
    )
)]
/// Login against the Admin pool
pub async fn admin_login<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let response = state.identity_service().admin_login(input).await?;
    Ok(Json(SuccessResponse::new(response)))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Identity",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Current principal", body = Principal),
        (status = 401, description = "Not authorized")
    )
)]
pub async fn me<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let principal = state.identity_service().me(&auth).await?;
    Ok(Json(SuccessResponse::new(principal)))
}
