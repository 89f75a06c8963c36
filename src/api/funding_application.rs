//! Funding application API handlers

use crate::api::SuccessResponse;
use crate::domain::{
    CreateApplicationInput, FundingApplication, FundingApplicationView, StringUuid,
    UpdateApplicationStatusInput,
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
    path = "/api/funding-applications",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    request_body = CreateApplicationInput,
    responses(
        (status = 201, description = "Application submitted", body = FundingApplication),
        (status = 400, description = "Already applied to this program"),
        (status = 403, description = "Only farmers can apply for funding"),
        (status = 404, description = "Program not found")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<CreateApplicationInput>,
) -> Result<impl IntoResponse> {
    let application = state.funding_service().apply(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(application))))
}

#[utoipa::path(
    get,
    path = "/api/funding-applications/my-applications",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Caller's applications", body = [FundingApplicationView])
    )
)]
pub async fn my_applications<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let applications = state.funding_service().my_applications(&auth).await?;
    Ok(Json(SuccessResponse::new(applications)))
}

#[utoipa::path(
    get,
    path = "/api/funding-applications/provider-applications",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Applications to the caller's programs", body = [FundingApplicationView])
    )
)]
pub async fn provider_applications<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let applications = state.funding_service().provider_applications(&auth).await?;
    Ok(Json(SuccessResponse::new(applications)))
}

#[utoipa::path(
    get,
    path = "/api/funding-applications/program/{program_id}",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    params(("program_id" = String, Path, description = "Program id")),
    responses(
        (status = 200, description = "Applications to the program", body = [FundingApplicationView]),
        (status = 403, description = "Not the provider"),
        (status = 404, description = "Program not found")
    )
)]
pub async fn program_applications<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(program_id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let applications = state
        .funding_service()
        .program_applications(&auth, program_id)
        .await?;
    Ok(Json(SuccessResponse::new(applications)))
}

#[utoipa::path(
    get,
    path = "/api/funding-applications/{id}",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application", body = FundingApplication),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let application = state.funding_service().get_application(&auth, id).await?;
    Ok(Json(SuccessResponse::new(application)))
}

#[utoipa::path(
    put,
    path = "/api/funding-applications/{id}/status",
    tag = "Funding",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Application id")),
    request_body = UpdateApplicationStatusInput,
    responses(
        (status = 200, description = "Application reviewed", body = FundingApplication),
        (status = 403, description = "Not the provider"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn update_status<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateApplicationStatusInput>,
) -> Result<impl IntoResponse> {
    let application = state
        .funding_service()
        .update_application_status(&auth, id, input.status)
        .await?;
    Ok(Json(SuccessResponse::new(application)))
}
