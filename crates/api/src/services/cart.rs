//! Cart aggregate.
//!
//! Every cart mutation that touches stock runs inside one transaction: the
//! reservation and the cart write commit together or not at all, so a failed
//! reservation never leaves phantom cart growth and a failed cart write never
//! leaks reserved stock.

use sqlx::PgPool;
use thiserror::Error;

use storekeeper_core::{ProductId, UserId};

use super::inventory::{InventoryError, InventoryLedger};
use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::{Cart, CartItemView, Product};

/// Cart errors.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("product not found")]
    ProductNotFound,

    #[error("item is not in the cart")]
    ItemNotFound,

    #[error("product out of stock: {0}")]
    OutOfStock(String),

    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `quantity` units of a product to the user's cart.
    ///
    /// Reserves stock and merges into any existing line for the same product
    /// in a single transaction. The stored line price is recomputed as
    /// `unit_price * new_quantity`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a non-positive quantity,
    /// `CartError::ProductNotFound` for an unknown product, and
    /// `CartError::OutOfStock` when the reservation fails.
    pub async fn add_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItemView, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let product = self.lookup_product(product_id).await?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let cart = CartRepository::get_or_create_in(&mut tx, user_id).await?;

        InventoryLedger::reserve_in(&mut tx, product_id, quantity)
            .await
            .map_err(|e| match e {
                InventoryError::InsufficientStock | InventoryError::ProductNotFound => {
                    CartError::OutOfStock(product.name.clone())
                }
                InventoryError::InvalidQuantity(q) => CartError::InvalidQuantity(q),
                InventoryError::Repository(r) => CartError::Repository(r),
            })?;

        let item =
            CartRepository::upsert_item_in(&mut tx, cart.id, product_id, quantity, product.price)
                .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(CartItemView::from_product(&product, item.quantity))
    }

    /// Decrement a cart line by one unit, removing the line at zero.
    ///
    /// The freed unit goes back to stock in the same transaction. The
    /// returned view reports the new quantity; 0 means the line was removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the user has no cart or the
    /// product isn't in it.
    pub async fn decrement_or_remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartItemView, CartError> {
        let product = self.lookup_product(product_id).await?;
        let cart = self.existing_cart(user_id).await?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let quantity =
            CartRepository::decrement_item_in(&mut tx, cart.id, product_id, product.price)
                .await?
                .ok_or(CartError::ItemNotFound)?;

        InventoryLedger::restore_in(&mut tx, product_id, 1)
            .await
            .map_err(|e| match e {
                InventoryError::Repository(r) => CartError::Repository(r),
                InventoryError::ProductNotFound
                | InventoryError::InvalidQuantity(_)
                | InventoryError::InsufficientStock => CartError::ProductNotFound,
            })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(CartItemView::from_product(&product, quantity))
    }

    /// Current cart contents, priced from the live catalog.
    ///
    /// A user with no cart yet sees the same thing as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn view_cart(&self, user_id: UserId) -> Result<Vec<CartItemView>, CartError> {
        let carts = CartRepository::new(self.pool);

        let Some(cart) = carts.get_by_user(user_id).await? else {
            return Ok(Vec::new());
        };

        let lines = carts.priced_lines(cart.id).await?;

        Ok(lines.into_iter().map(CartItemView::from).collect())
    }

    /// Delete every line in the user's cart. Idempotent; a user with no cart
    /// or an empty cart gets the same success.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn clear_cart(&self, user_id: UserId) -> Result<(), CartError> {
        let carts = CartRepository::new(self.pool);

        if let Some(cart) = carts.get_by_user(user_id).await? {
            carts.clear(cart.id).await?;
        }

        Ok(())
    }

    async fn lookup_product(&self, product_id: ProductId) -> Result<Product, CartError> {
        ProductRepository::new(self.pool)
            .get_by_id(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)
    }

    async fn existing_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        CartRepository::new(self.pool)
            .get_by_user(user_id)
            .await?
            .ok_or(CartError::ItemNotFound)
    }
}
