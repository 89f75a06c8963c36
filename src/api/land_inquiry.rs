//! Land inquiry API handlers

use crate::api::SuccessResponse;
use crate::domain::{
    CreateInquiryInput, LandInquiry, LandInquiryView, StringUuid, UpdateInquiryStatusInput,
};
use crate::error::Result;
use crate::middleware::AuthPrincipal;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/land-inquiries",
    tag = "Land",
    security(("bearer_jwt" = [])),
    request_body = CreateInquiryInput,
    responses(
        (status = 201, description = "Inquiry sent", body = LandInquiry),
        (status = 400, description = "Inquiry on own land"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<CreateInquiryInput>,
) -> Result<impl IntoResponse> {
    let inquiry = state.land_service().create_inquiry(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(inquiry))))
}

#[utoipa::path(
    get,
    path = "/api/land-inquiries/my",
    tag = "Land",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Inquiries sent by the caller", body = [LandInquiryView])
    )
)]
pub async fn my_inquiries<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let inquiries = state.land_service().my_inquiries(&auth).await?;
    Ok(Json(SuccessResponse::new(inquiries)))
}

#[utoipa::path(
    get,
    path = "/api/land-inquiries/owner",
    tag = "Land",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Inquiries on the caller's listings", body = [LandInquiryView])
    )
)]
pub async fn owner_inquiries<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let inquiries = state.land_service().owner_inquiries(&auth).await?;
    Ok(Json(SuccessResponse::new(inquiries)))
}

#[utoipa::path(
    get,
    path = "/api/land-inquiries/{id}",
    tag = "Land",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Inquiry id")),
    responses(
        (status = 200, description = "Inquiry", body = LandInquiry),
        (status = 404, description = "Inquiry not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let inquiry = state.land_service().get_inquiry(&auth, id).await?;
    Ok(Json(SuccessResponse::new(inquiry)))
}

#[utoipa::path(
    patch,
    path = "/api/land-inquiries/{id}/status",
    tag = "Land",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Inquiry id")),
    request_body = UpdateInquiryStatusInput,
    responses(
        (status = 200, description = "Status updated", body = LandInquiry),
        (status = 403, description = "Not the land owner"),
        (status = 404, description = "Inquiry not found")
    )
)]
pub async fn update_status<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateInquiryStatusInput>,
) -> Result<impl IntoResponse> {
    let inquiry = state
        .land_service()
        .update_inquiry_status(&auth, id, input.status)
        .await?;
    Ok(Json(SuccessResponse::new(inquiry)))
}
