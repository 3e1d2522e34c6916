//! Cart repository.
//!
//! Cart items are unique per `(cart_id, product_id)`; repeated adds merge
//! through a single upsert statement so concurrent adds for the same user and
//! product can never produce duplicate rows or lost quantity updates.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use storekeeper_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, PricedCartLine};

/// Internal row type for cart item queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Internal row type for cart lines joined with the current product.
#[derive(Debug, sqlx::FromRow)]
struct PricedLineRow {
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<PricedLineRow> for PricedCartLine {
    fn from(row: PricedLineRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, if one has been created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<(i32, i32)> =
            sqlx::query_as("SELECT id, user_id FROM cart WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(|(id, user_id)| Cart {
            id: CartId::new(id),
            user_id: UserId::new(user_id),
        }))
    }

    /// Get the user's cart, creating it lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create_in(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<Cart, RepositoryError> {
        // The no-op update makes RETURNING yield the row on conflict too.
        let (id, user_id): (i32, i32) = sqlx::query_as(
            "INSERT INTO cart (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING id, user_id",
        )
        .bind(user_id.as_i32())
        .fetch_one(conn)
        .await?;

        Ok(Cart {
            id: CartId::new(id),
            user_id: UserId::new(user_id),
        })
    }

    /// Insert a cart line, or merge into the existing one.
    ///
    /// Merging sums the quantity and recomputes the stored line total as
    /// `unit_price * new_quantity` in the same statement, so concurrent adds
    /// cannot interleave a read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_item_in(
        conn: &mut PgConnection,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<CartItem, RepositoryError> {
        let row: CartItemRow = sqlx::query_as(
            "INSERT INTO cart_item (cart_id, product_id, quantity, price)
             VALUES ($1, $2, $3, $4 * $3)
             ON CONFLICT (cart_id, product_id) DO UPDATE
             SET quantity = cart_item.quantity + EXCLUDED.quantity,
                 price = $4 * (cart_item.quantity + EXCLUDED.quantity),
                 updated_at = now()
             RETURNING id, cart_id, product_id, quantity, price",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }

    /// Decrement a cart line by one unit, deleting the row when it holds the
    /// last unit.
    ///
    /// Returns the remaining quantity (0 means the row was deleted), or
    /// `None` if the line doesn't exist. The quantity >= 1 check constraint
    /// means a stored 0 is never representable, so the last unit is handled
    /// by a delete rather than an update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn decrement_item_in(
        conn: &mut PgConnection,
        cart_id: CartId,
        product_id: ProductId,
        unit_price: Decimal,
    ) -> Result<Option<i32>, RepositoryError> {
        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE cart_item
             SET quantity = quantity - 1, price = $3 * (quantity - 1), updated_at = now()
             WHERE cart_id = $1 AND product_id = $2 AND quantity >= 2
             RETURNING quantity",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(unit_price)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(quantity) = remaining {
            return Ok(Some(quantity));
        }

        let deleted = sqlx::query("DELETE FROM cart_item WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id.as_i32())
            .bind(product_id.as_i32())
            .execute(conn)
            .await?;

        Ok((deleted.rows_affected() > 0).then_some(0))
    }

    /// All lines in a cart joined with the current product name and price,
    /// in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn priced_lines(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<PricedCartLine>, RepositoryError> {
        let rows: Vec<PricedLineRow> = sqlx::query_as(
            "SELECT ci.product_id, p.name AS product_name, ci.quantity,
                    p.price AS unit_price
             FROM cart_item ci
             JOIN product p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.id",
        )
        .bind(cart_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PricedCartLine::from).collect())
    }

    /// Same as [`priced_lines`](Self::priced_lines), but inside a caller-owned
    /// transaction (used by checkout so the snapshot and the clear see the
    /// same cart).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn priced_lines_in(
        conn: &mut PgConnection,
        cart_id: CartId,
    ) -> Result<Vec<PricedCartLine>, RepositoryError> {
        let rows: Vec<PricedLineRow> = sqlx::query_as(
            "SELECT ci.product_id, p.name AS product_name, ci.quantity,
                    p.price AS unit_price
             FROM cart_item ci
             JOIN product p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.id",
        )
        .bind(cart_id.as_i32())
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(PricedCartLine::from).collect())
    }

    /// Delete every line in a cart. Deleting an already-empty cart is fine.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_item WHERE cart_id = $1")
            .bind(cart_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Transactional variant of [`clear`](Self::clear), used by checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_in(conn: &mut PgConnection, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_item WHERE cart_id = $1")
            .bind(cart_id.as_i32())
            .execute(conn)
            .await?;

        Ok(())
    }
}
