//! Funding program API handlers (also mounted under `/api/funding`)

use crate::api::SuccessResponse;
use crate::domain::{
    CreateFundingProgramInput, FundingProgram, FundingProgramQuery, StringUuid,
    UpdateFundingProgramInput,
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
    path = "/api/funding-programs",
    tag = "Funding",
    params(FundingProgramQuery),
    responses(
        (status = 200, description = "Active programs", body = [FundingProgram])
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<FundingProgramQuery>,
) -> Result<impl IntoResponse> {
    let programs = state.funding_service().list_programs(&query).await?;
    Ok(Json(SuccessResponse::new(programs)))
}

#[utoipa::path(
    get,
    path = "/api/funding-programs/{id}",
    tag = "Funding",
    params(("id" = String, Path, description = "Program id")),
    responses(
        (status = 200, description = "Program", body = FundingProgram),
        (status = 404, description = "Program not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let program = state.funding_service().get_program(id).await?;
    Ok(Json(SuccessResponse::new(program)))
}

#[utoipa::path(
    post,
    path = "/api/funding-programs",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    request_body = CreateFundingProgramInput,
    responses(
        (status = 201, description = "Program posted", body = FundingProgram),
        (status = 403, description = "Only investors can post funding opportunities")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<CreateFundingProgramInput>,
) -> Result<impl IntoResponse> {
    let program = state.funding_service().create_program(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(program))))
}

#[utoipa::path(
    put,
    path = "/api/funding-programs/{id}",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Program id")),
    request_body = UpdateFundingProgramInput,
    responses(
        (status = 200, description = "Program updated", body = FundingProgram),
        (status = 403, description = "Not the provider"),
        (status = 404, description = "Program not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateFundingProgramInput>,
) -> Result<impl IntoResponse> {
    let program = state
        .funding_service()
        .update_program(&auth, id, input)
        .await?;
    Ok(Json(SuccessResponse::new(program)))
}

#[utoipa::path(
    delete,
    path = "/api/funding-programs/{id}",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Program id")),
    responses(
        (status = 204, description = "Program removed"),
        (status = 403, description = "Not the provider"),
        (status = 404, description = "Program not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.funding_service().delete_program(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
