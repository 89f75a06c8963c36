//! Product API handlers

use crate::api::SuccessResponse;
use crate::domain::{CreateProductInput, Product, ProductQuery, StringUuid, UpdateProductInput};
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
    path = "/api/products",
    tag = "Marketplace",
    params(ProductQuery),
    responses(
        (status = 200, description = "Products, newest first", body = [Product])
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse> {
    let products = state.product_service().list(&query).await?;
    Ok(Json(SuccessResponse::new(products)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Marketplace",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let product = state.product_service().get(id).await?;
    Ok(Json(SuccessResponse::new(product)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Marketplace",
    security(("bearer_jwt" = [])),
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product listed", body = Product),
        (status = 403, description = "Only farmers can list products")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<CreateProductInput>,
) -> Result<impl IntoResponse> {
    let product = state.product_service().create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(product))))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Marketplace",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductInput,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Not the seller"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateProductInput>,
) -> Result<impl IntoResponse> {
    let product = state.product_service().update(&auth, id, input).await?;
    Ok(Json(SuccessResponse::new(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Marketplace",
    security(("bearer_jwt" = [])),
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product removed"),
        (status = 403, description = "Not the seller"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.product_service().delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
