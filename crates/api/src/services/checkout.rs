//! Checkout orchestrator.
//!
//! Converts the cart's current contents into an immutable order snapshot.
//! The order inserts and the cart clear share one transaction: a failure
//! anywhere leaves the cart exactly as it was, with no partial checkout
//! observable. Stock is not touched here; it was already reserved when each
//! item entered the cart.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use storekeeper_core::UserId;

use super::payment::{METHOD_COD, PaymentError, PaymentGateway, PaymentReceipt, PaymentRequest};
use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::orders::{OrderMetadata, OrderRepository};
use crate::models::{OrderSnapshot, build_order_lines};

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Optional checkout details supplied by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub shipping_address: String,
    /// Defaults to cash on delivery when omitted.
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// A completed checkout: the persisted order plus the payment receipt.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub snapshot: OrderSnapshot,
    pub receipt: PaymentReceipt,
}

/// Checkout orchestrator.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    payment: &'a dyn PaymentGateway,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, payment: &'a dyn PaymentGateway) -> Self {
        Self { pool, payment }
    }

    /// Turn the user's cart into a `pending` order and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the user has no cart or the
    /// cart holds no items, `CheckoutError::Payment` if the charge is
    /// rejected, and `CheckoutError::Repository` if persistence fails.
    pub async fn checkout(
        &self,
        user_id: UserId,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let cart = CartRepository::new(self.pool)
            .get_by_user(user_id)
            .await?
            .ok_or(CheckoutError::EmptyCart)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Snapshot and clear read the same cart state inside the transaction.
        let lines = CartRepository::priced_lines_in(&mut tx, cart.id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let (items, total_amount) = build_order_lines(&lines);

        let payment_method = request
            .payment_method
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| METHOD_COD.to_owned());

        let receipt = self.payment.charge(&PaymentRequest {
            amount: total_amount,
            method: payment_method.clone(),
        })?;

        let metadata = OrderMetadata {
            shipping_address: request.shipping_address,
            payment_method,
            payment_status: receipt.status.clone(),
            payment_transaction_id: receipt.transaction_id.clone(),
            notes: request.notes,
        };

        let snapshot =
            OrderRepository::create_in(&mut tx, user_id, total_amount, &metadata, &items).await?;
        CartRepository::clear_in(&mut tx, cart.id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %snapshot.order.id,
            user_id = %user_id,
            total = %total_amount,
            "order created"
        );

        Ok(CheckoutOutcome { snapshot, receipt })
    }
}
