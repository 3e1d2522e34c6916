//! Order handlers for the authenticated user.

use axum::{
    Json,
    extract::{Path, State},
};

use storekeeper_core::OrderId;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::OrderSnapshot;
use crate::routes::ApiResponse;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Current user's order history, newest first.
///
/// GET /api/v1/user/orders
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<OrderSnapshot>>>> {
    let orders = OrderService::new(state.pool())
        .list_for_user(user.user_id)
        .await?;

    Ok(Json(ApiResponse::ok(orders)))
}

/// Cancel one of the current user's orders, returning its stock.
///
/// DELETE /api/v1/user/order/cancel/{order_id}
pub async fn cancel_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<ApiResponse<OrderSnapshot>>> {
    let snapshot = OrderService::new(state.pool())
        .cancel(order_id, user.user_id)
        .await?;

    Ok(Json(ApiResponse::with_message("order cancelled", snapshot)))
}
