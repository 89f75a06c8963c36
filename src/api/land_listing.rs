//! Land listing API handlers

use crate::api::SuccessResponse;
use crate::domain::{
    CreateLandListingInput, LandListing, LandListingQuery, StringUuid, UpdateLandListingInput,
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
    path = "/api/land-listings",
    tag = "Land",
    params(LandListingQuery),
    responses(
        (status = 200, description = "Available listings", body = [LandListing])
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<LandListingQuery>,
) -> Result<impl IntoResponse> {
    let listings = state.land_service().list(&query).await?;
    Ok(Json(SuccessResponse::new(listings)))
}

#[utoipa::path(
    get,
    path = "/api/land-listings/{id}",
    tag = "Land",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = LandListing),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let listing = state.land_service().get(id).await?;
    Ok(Json(SuccessResponse::new(listing)))
}

#[utoipa::path(
    post,
    path = "/api/land-listings",
    tag = "Land",
    security(("bearer_jwt" = [])),
    request_body = CreateLandListingInput,
    responses(
        (status = 201, description = "Land listed", body = LandListing)
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<CreateLandListingInput>,
) -> Result<impl IntoResponse> {
    let listing = state.land_service().create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(listing))))
}

#[utoipa::path(
    put,
    path = "/api/land-listings/{id}",
    tag = "Land",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Listing id")),
    request_body = UpdateLandListingInput,
    responses(
        (status = 200, description = "Listing updated", body = LandListing),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateLandListingInput>,
) -> Result<impl IntoResponse> {
    let listing = state.land_service().update(&auth, id, input).await?;
    Ok(Json(SuccessResponse::new(listing)))
}

#[utoipa::path(
    delete,
    path = "/api/land-listings/{id}",
    tag = "Land",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 204, description = "Listing removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.land_service().delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
