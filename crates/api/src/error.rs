//! Unified error handling.
//!
//! Provides a unified `AppError` type that maps the service-layer error
//! taxonomy onto HTTP statuses and the JSON response envelope. All route
//! handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::orders::OrderError;
use crate::services::payment::PaymentError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input violated a rule; the message echoes the rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (wrong role or not the owner).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// State conflict (duplicate name and similar).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Not enough stock to satisfy the request.
    #[error("out of stock: {0}")]
    OutOfStock(String),

    /// Order status change not allowed by the lifecycle table.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Backing store failed.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::OutOfStock(_) | Self::InvalidTransition(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "internal server error".to_owned(),
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::OutOfStock(msg)
            | Self::InvalidTransition(msg) => msg.clone(),
        };

        let body = Json(json!({ "success": false, "error": message }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvalidCredentials => {
                Self::Unauthorized("invalid email or password".to_owned())
            }
            AuthError::UserAlreadyExists => {
                Self::Conflict("email already registered".to_owned())
            }
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
            AuthError::Token(e) => Self::Internal(format!("token error: {e}")),
            AuthError::Repository(e) => e.into(),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductNotFound => Self::NotFound("product not found".to_owned()),
            CartError::ItemNotFound => Self::NotFound("item is not in the cart".to_owned()),
            CartError::OutOfStock(product) => {
                Self::OutOfStock(format!("product out of stock: {product}"))
            }
            CartError::InvalidQuantity(q) => {
                Self::Validation(format!("quantity must be positive, got {q}"))
            }
            CartError::Repository(e) => e.into(),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound => Self::NotFound("order not found".to_owned()),
            OrderError::UnknownStatus(s) => Self::Validation(format!("invalid status: {s}")),
            OrderError::InvalidTransition { from, to } => Self::InvalidTransition(format!(
                "cannot change order status from '{from}' to '{to}'"
            )),
            OrderError::NotOwner => {
                Self::Forbidden("cannot cancel another user's order".to_owned())
            }
            OrderError::Repository(e) => e.into(),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::Validation("cart is empty".to_owned()),
            CheckoutError::Payment(e) => e.into(),
            CheckoutError::Repository(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthorized("no token".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("not yours".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("missing".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("dup".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::OutOfStock("widget".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::InvalidTransition("x".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_repository_conflict_maps_to_409() {
        let err: AppError = RepositoryError::Conflict("dup".to_owned()).into();
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_ownership_violation_is_forbidden() {
        let err: AppError = OrderError::NotOwner.into();
        assert_eq!(get_status(err), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_transition_maps_to_conflict() {
        use storekeeper_core::OrderStatus;

        let err: AppError = OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        }
        .into();
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }
}
