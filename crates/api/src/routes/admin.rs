//! Admin handlers. Every route here is gated by [`RequireAdmin`].

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use storekeeper_core::{CategoryId, OrderId, OrderStatus, ProductId};

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CategoryInput, OrderSnapshot, Product, ProductInput, User};
use crate::routes::ApiResponse;
use crate::services::orders::OrderService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusChange {
    #[serde(flatten)]
    pub order: OrderSnapshot,
    pub previous_status: OrderStatus,
}

// =============================================================================
// Products
// =============================================================================

/// Create a product.
///
/// POST /api/v1/admin/product
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<ProductInput>,
) -> Result<Json<ApiResponse<Product>>> {
    input.validate().map_err(AppError::Validation)?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    Ok(Json(ApiResponse::with_message("product created", product)))
}

/// Replace a product's catalog fields.
///
/// PUT /api/v1/admin/product/{id}
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ApiResponse<Product>>> {
    input.validate().map_err(AppError::Validation)?;

    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(ApiResponse::with_message("product updated", product)))
}

/// Delete a product.
///
/// DELETE /api/v1/admin/product/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<()>>> {
    ProductRepository::new(state.pool()).delete(id).await?;

    Ok(Json(ApiResponse::message("product deleted")))
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category.
///
/// POST /api/v1/admin/category
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<CategoryInput>,
) -> Result<Json<ApiResponse<Category>>> {
    let category = CategoryRepository::new(state.pool())
        .create(&input.name, &input.description)
        .await?;

    Ok(Json(ApiResponse::with_message("category created", category)))
}

/// Rename a category.
///
/// PUT /api/v1/admin/category/{id}
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<ApiResponse<Category>>> {
    let category = CategoryRepository::new(state.pool())
        .update(id, &input.name, &input.description)
        .await?;

    Ok(Json(ApiResponse::with_message("category updated", category)))
}

/// Delete a category.
///
/// DELETE /api/v1/admin/category/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<ApiResponse<()>>> {
    CategoryRepository::new(state.pool()).delete(id).await?;

    Ok(Json(ApiResponse::message("category deleted")))
}

// =============================================================================
// Users and orders
// =============================================================================

/// Every registered user.
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;

    Ok(Json(ApiResponse::ok(users)))
}

/// Every order in the system, newest first.
///
/// GET /api/v1/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<OrderSnapshot>>>> {
    let orders = OrderService::new(state.pool()).list_all().await?;

    Ok(Json(ApiResponse::ok(orders)))
}

/// Move an order through the status lifecycle.
///
/// Accepts canonical status names plus the legacy numeric aliases.
///
/// PUT /api/v1/admin/order/status/{order_id}/{status}
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path((order_id, status)): Path<(OrderId, String)>,
) -> Result<Json<ApiResponse<StatusChange>>> {
    let (snapshot, previous_status) = OrderService::new(state.pool())
        .transition(order_id, &status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "order status updated",
        StatusChange {
            order: snapshot,
            previous_status,
        },
    )))
}
