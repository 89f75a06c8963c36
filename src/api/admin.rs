//! Admin console API handlers

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{
    InviteAdminInput, InvitedAdmin, StringUuid, SystemStats, UpdateUserStatusInput, User,
};
use crate::error::Result;
use crate::middleware::AuthPrincipal;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "System-wide counters", body = SystemStats),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn stats<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let stats = state.admin_service().stats(&auth).await?;
    Ok(Json(SuccessResponse::new(stats)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_jwt" = [])),
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users, newest first", body = [User]),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (users, total) = state
        .admin_service()
        .list_users(&auth, pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        users,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserStatusInput,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_status<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateUserStatusInput>,
) -> Result<impl IntoResponse> {
    let user = state
        .admin_service()
        .update_user_status(&auth, id, input.is_verified)
        .await?;
    Ok(Json(SuccessResponse::new(user)))
}

#[utoipa::path(
    post,
    path = "/api/admin/invite",
    tag = "Admin",
    security(("bearer_jwt" = [])),
    request_body = InviteAdminInput,
    responses(
        (status = 201, description = "Admin created with a one-time password", body = InvitedAdmin),
        (status = 400, description = "Invalid role or email already used"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn invite<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<InviteAdminInput>,
) -> Result<impl IntoResponse> {
    let invited = state.admin_service().invite_admin(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(invited))))
}
