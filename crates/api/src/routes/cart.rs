//! Cart and checkout handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use storekeeper_core::ProductId;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CartItemView, OrderSnapshot};
use crate::routes::ApiResponse;
use crate::services::cart::CartService;
use crate::services::checkout::{CheckoutRequest, CheckoutService};
use crate::services::payment::PaymentReceipt;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Defaults to one unit when the body is omitted.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

impl Default for AddItemRequest {
    fn default() -> Self {
        Self {
            quantity: default_quantity(),
        }
    }
}

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub order: OrderSnapshot,
    pub payment: PaymentReceipt,
}

/// Current cart contents, priced from the live catalog.
///
/// GET /api/v1/user/cart
pub async fn view(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<CartItemView>>>> {
    let items = CartService::new(state.pool()).view_cart(user.user_id).await?;

    Ok(Json(ApiResponse::ok(items)))
}

/// Add a product to the cart, reserving stock.
///
/// POST /api/v1/user/cart/item/{product_id}
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<ProductId>,
    body: Option<Json<AddItemRequest>>,
) -> Result<Json<ApiResponse<CartItemView>>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let item = CartService::new(state.pool())
        .add_product(user.user_id, product_id, request.quantity)
        .await?;

    Ok(Json(ApiResponse::with_message("item added to cart", item)))
}

/// Decrement a cart line by one unit, removing it at zero. The freed unit
/// goes back to stock.
///
/// DELETE /api/v1/user/cart/{product_id}
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ApiResponse<CartItemView>>> {
    let item = CartService::new(state.pool())
        .decrement_or_remove(user.user_id, product_id)
        .await?;

    let message = if item.quantity == 0 {
        "item removed from cart"
    } else {
        "item quantity decreased"
    };

    Ok(Json(ApiResponse::with_message(message, item)))
}

/// Empty the cart. Succeeds even when it is already empty.
///
/// DELETE /api/v1/user/cart/cancel
pub async fn clear(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<()>>> {
    CartService::new(state.pool()).clear_cart(user.user_id).await?;

    Ok(Json(ApiResponse::message("cart cleared")))
}

/// Turn the cart into a `pending` order.
///
/// POST /api/v1/user/cart/checkout
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<Json<CheckoutRequest>>,
) -> Result<Json<ApiResponse<CheckoutResponse>>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let outcome = CheckoutService::new(state.pool(), state.payment())
        .checkout(user.user_id, request)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "order created",
        CheckoutResponse {
            order: outcome.snapshot,
            payment: outcome.receipt,
        },
    )))
}
