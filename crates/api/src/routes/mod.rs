//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Public
//! POST /api/v1/register                 - Create a customer account
//! POST /api/v1/login                    - Login, returns a bearer token
//! GET  /api/v1/products                 - Product listing
//! GET  /api/v1/product/{name}           - Case-insensitive name search
//! GET  /api/v1/productBy/cat/{category} - Products in a category
//!
//! # User (bearer token)
//! GET    /api/v1/user/profile                 - Current profile
//! PUT    /api/v1/user/profile                 - Update profile / password
//! GET    /api/v1/user/cart                    - View cart
//! POST   /api/v1/user/cart/item/{product_id}  - Add to cart
//! DELETE /api/v1/user/cart/{product_id}       - Decrement / remove item
//! DELETE /api/v1/user/cart/cancel             - Clear cart
//! POST   /api/v1/user/cart/checkout           - Checkout
//! GET    /api/v1/user/orders                  - Order history
//! DELETE /api/v1/user/order/cancel/{order_id} - Cancel own order
//!
//! # Admin (bearer token + admin role)
//! POST   /api/v1/admin/product                - Create product
//! PUT    /api/v1/admin/product/{id}           - Update product
//! DELETE /api/v1/admin/product/{id}           - Delete product
//! POST   /api/v1/admin/category               - Create category
//! PUT    /api/v1/admin/category/{id}          - Update category
//! DELETE /api/v1/admin/category/{id}          - Delete category
//! GET    /api/v1/admin/users                  - List users
//! GET    /api/v1/admin/orders                 - List all orders
//! PUT    /api/v1/admin/order/status/{order_id}/{status} - Change order status
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Standard JSON response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying data.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A successful response with data and a human-readable message.
    #[must_use]
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A successful response with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Assemble every `/api/v1` route.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest(
        "/api/v1",
        public_routes().merge(user_routes()).merge(admin_routes()),
    )
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/products", get(products::list))
        .route("/product/{name}", get(products::search_by_name))
        .route("/productBy/cat/{category}", get(products::list_by_category))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/user/cart", get(cart::view))
        .route("/user/cart/item/{product_id}", post(cart::add_item))
        .route("/user/cart/cancel", delete(cart::clear))
        .route("/user/cart/{product_id}", delete(cart::remove_item))
        .route("/user/cart/checkout", post(cart::checkout))
        .route("/user/orders", get(orders::list_mine))
        .route("/user/order/cancel/{order_id}", delete(orders::cancel_mine))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/product", post(admin::create_product))
        .route(
            "/admin/product/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/admin/category", post(admin::create_category))
        .route(
            "/admin/category/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/orders", get(admin::list_orders))
        .route(
            "/admin/order/status/{order_id}/{status}",
            put(admin::update_order_status),
        )
}
