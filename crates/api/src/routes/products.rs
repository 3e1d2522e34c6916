//! Public catalog read handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use storekeeper_core::CategoryId;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::routes::ApiResponse;
use crate::state::AppState;

/// List every product.
///
/// GET /api/v1/products
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(Json(ApiResponse::ok(products)))
}

/// Case-insensitive substring search on product name.
///
/// GET /api/v1/product/{name}
pub async fn search_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = ProductRepository::new(state.pool())
        .search_by_name(&name)
        .await?;

    if products.is_empty() {
        return Err(AppError::NotFound(format!("no products matching '{name}'")));
    }

    Ok(Json(ApiResponse::ok(products)))
}

/// Products in a category.
///
/// GET /api/v1/productBy/cat/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<CategoryId>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_category(category)
        .await?;

    if products.is_empty() {
        return Err(AppError::NotFound(format!(
            "no products in category {category}"
        )));
    }

    Ok(Json(ApiResponse::ok(products)))
}
