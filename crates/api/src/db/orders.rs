//! Order repository.
//!
//! Orders and their item snapshots are written once, in a single transaction
//! owned by the checkout orchestrator. After creation only the status column
//! moves, and only through the order state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use storekeeper_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewOrderItem, Order, OrderItem, OrderSnapshot};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total_amount: Decimal,
    status: String,
    shipping_address: String,
    payment_method: String,
    payment_status: String,
    payment_transaction_id: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total_amount: row.total_amount,
            status,
            shipping_address: row.shipping_address,
            payment_method: row.payment_method,
            payment_status: row.payment_status,
            payment_transaction_id: row.payment_transaction_id,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, total_amount, status, shipping_address, \
     payment_method, payment_status, payment_transaction_id, notes, created_at, updated_at";

fn update_status_sql() -> String {
    format!(
        "UPDATE \"order\" SET status = $3, updated_at = now()
         WHERE id = $1 AND status = $2
         RETURNING {ORDER_COLUMNS}"
    )
}

/// Shipping and payment metadata captured at checkout.
#[derive(Debug, Clone, Default)]
pub struct OrderMetadata {
    pub shipping_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_transaction_id: String,
    pub notes: String,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new `pending` order and its item snapshot.
    ///
    /// Runs inside the caller's transaction so the checkout orchestrator can
    /// clear the cart in the same unit of work.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create_in(
        conn: &mut PgConnection,
        user_id: UserId,
        total_amount: Decimal,
        metadata: &OrderMetadata,
        items: &[NewOrderItem],
    ) -> Result<OrderSnapshot, RepositoryError> {
        let order_row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO \"order\"
                 (user_id, total_amount, status, shipping_address,
                  payment_method, payment_status, payment_transaction_id, notes)
             VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(total_amount)
        .bind(&metadata.shipping_address)
        .bind(&metadata.payment_method)
        .bind(&metadata.payment_status)
        .bind(&metadata.payment_transaction_id)
        .bind(&metadata.notes)
        .fetch_one(&mut *conn)
        .await?;

        let order: Order = order_row.try_into()?;

        let mut stored = Vec::with_capacity(items.len());
        for item in items {
            let row: OrderItemRow = sqlx::query_as(
                "INSERT INTO order_item
                     (order_id, product_id, product_name, quantity, unit_price, subtotal)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id, order_id, product_id, product_name, quantity,
                           unit_price, subtotal",
            )
            .bind(order.id.as_i32())
            .bind(item.product_id.as_i32())
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .fetch_one(&mut *conn)
            .await?;

            stored.push(row.into());
        }

        Ok(OrderSnapshot {
            order,
            items: stored,
        })
    }

    /// Load an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<OrderSnapshot>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order: Order = row.try_into()?;
        let items = self.items_for(order.id).await?;

        Ok(Some(OrderSnapshot { order, items }))
    }

    /// All orders placed by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderSnapshot>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" WHERE user_id = $1 ORDER BY id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// Every order in the system (admin surface), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderSnapshot>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.with_items(rows).await
    }

    /// Persist a new status for an order, guarded by the status the caller
    /// validated against.
    ///
    /// Transition legality is the order service's responsibility; the guard
    /// only ensures its decision still applies at write time. When two
    /// mutations race, exactly one matches the guard and the loser gets
    /// `None` back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&update_status_sql())
            .bind(id.as_i32())
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT id, order_id, product_id, product_name, quantity, unit_price, subtotal
             FROM order_item WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn with_items(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderSnapshot>, RepositoryError> {
        let mut snapshots = Vec::with_capacity(rows.len());
        for row in rows {
            let order: Order = row.try_into()?;
            let items = self.items_for(order.id).await?;
            snapshots.push(OrderSnapshot { order, items });
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_is_guarded_by_previous_status() {
        // Concurrent cancels must not both succeed; the write only lands when
        // the status the caller validated against is still current.
        let sql = update_status_sql();
        assert!(sql.contains("WHERE id = $1 AND status = $2"));
    }
}
