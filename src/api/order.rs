//! Order API handlers

use crate::api::SuccessResponse;
use crate::domain::{CreateOrderInput, OrderWithItems};
use crate::error::Result;
use crate::middleware::AuthPrincipal;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Marketplace",
    security(("bearer_jwt" = [])),
    request_body = CreateOrderInput,
    responses(
        (status = 201, description = "Order placed", body = OrderWithItems),
        (status = 400, description = "No order items")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
    Json(input): Json<CreateOrderInput>,
) -> Result<impl IntoResponse> {
    let order = state.order_service().create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(order))))
}

#[utoipa::path(
    get,
    path = "/api/orders/myorders",
    tag = "Marketplace",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Caller's orders, newest first", body = [OrderWithItems])
    )
)]
pub async fn my_orders<S: HasServices>(
    State(state): State<S>,
    auth: AuthPrincipal,
) -> Result<impl IntoResponse> {
    let orders = state.order_service().my_orders(&auth).await?;
    Ok(Json(SuccessResponse::new(orders)))
}
