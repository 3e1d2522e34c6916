//! Inventory ledger.
//!
//! Stock is the single source of availability. Reservations decrement it
//! eagerly (at add-to-cart), restores increment it back when items leave a
//! cart or an order is cancelled. Both operations are single conditional
//! statements in the database, so concurrent carts can never oversell.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use storekeeper_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;

/// Inventory errors.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("insufficient stock")]
    InsufficientStock,

    #[error("product not found")]
    ProductNotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Inventory ledger over the product stock counters.
pub struct InventoryLedger;

impl InventoryLedger {
    /// Reserve `quantity` units inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidQuantity` if `quantity` is not
    /// positive and `InventoryError::InsufficientStock` if the product is
    /// missing or has too little stock.
    pub async fn reserve_in(
        conn: &mut PgConnection,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        if ProductRepository::reserve_stock_in(conn, product_id, quantity).await? {
            Ok(())
        } else {
            Err(InventoryError::InsufficientStock)
        }
    }

    /// Return `quantity` units inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidQuantity` if `quantity` is not
    /// positive and `InventoryError::ProductNotFound` if the product no
    /// longer exists.
    pub async fn restore_in(
        conn: &mut PgConnection,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        if ProductRepository::restore_stock_in(conn, product_id, quantity).await? {
            Ok(())
        } else {
            Err(InventoryError::ProductNotFound)
        }
    }

    /// Return units outside any transaction, logging failures instead of
    /// propagating them.
    ///
    /// Used on order cancellation, where the status change must go through
    /// even if a snapshotted product has since been deleted from the catalog.
    pub async fn restore_best_effort(pool: &PgPool, product_id: ProductId, quantity: i32) {
        let result = async {
            let mut conn = pool.acquire().await?;
            ProductRepository::restore_stock_in(&mut conn, product_id, quantity).await
        }
        .await;

        match result {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    product_id = %product_id,
                    quantity,
                    "stock restore skipped: product no longer exists"
                );
            }
            Err(e) => {
                tracing::warn!(
                    product_id = %product_id,
                    quantity,
                    error = %e,
                    "stock restore failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_quantity_message() {
        let err = InventoryError::InvalidQuantity(0);
        assert_eq!(err.to_string(), "quantity must be positive, got 0");

        let err = InventoryError::InvalidQuantity(-3);
        assert_eq!(err.to_string(), "quantity must be positive, got -3");
    }
}
