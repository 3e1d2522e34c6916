//! Order state machine.
//!
//! All post-checkout order mutation goes through this service: every status
//! change is validated against the transition table before it is persisted.
//! Cancellation additionally returns the reserved stock, best-effort.

use sqlx::PgPool;
use thiserror::Error;

use storekeeper_core::{OrderId, OrderStatus, UserId};

use super::inventory::InventoryLedger;
use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::OrderSnapshot;

/// Order errors.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order not found")]
    NotFound,

    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    #[error("cannot change order status from '{from}' to '{to}'")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order belongs to another user")]
    NotOwner,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders placed by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderSnapshot>, OrderError> {
        Ok(OrderRepository::new(self.pool)
            .list_for_user(user_id)
            .await?)
    }

    /// Every order in the system (admin surface), newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderSnapshot>, OrderError> {
        Ok(OrderRepository::new(self.pool).list_all().await?)
    }

    /// Move an order to a new status (admin surface).
    ///
    /// `raw_status` accepts canonical names plus the legacy aliases still
    /// sent by older clients. Moving into `cancelled` returns each item's
    /// quantity to stock; a restore failure is logged and does not block the
    /// transition.
    ///
    /// Returns the updated snapshot and the status the order held before.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UnknownStatus` for an unparseable status,
    /// `OrderError::NotFound` for an unknown order, and
    /// `OrderError::InvalidTransition` when the lifecycle table forbids the
    /// move.
    pub async fn transition(
        &self,
        order_id: OrderId,
        raw_status: &str,
    ) -> Result<(OrderSnapshot, OrderStatus), OrderError> {
        let target = OrderStatus::parse_client_input(raw_status)
            .map_err(|e| OrderError::UnknownStatus(e.0))?;

        let mut snapshot = self.load(order_id).await?;
        let previous = snapshot.order.status;

        if !previous.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                from: previous,
                to: target,
            });
        }

        // The guarded write decides who owns the transition; stock is only
        // restored by the winner, so racing cancellations cannot restore the
        // same items twice.
        let Some(order) = OrderRepository::new(self.pool)
            .update_status(order_id, previous, target)
            .await?
        else {
            return Err(OrderError::InvalidTransition {
                from: previous,
                to: target,
            });
        };
        snapshot.order = order;

        if target == OrderStatus::Cancelled {
            self.restore_items(&snapshot).await;
        }

        tracing::info!(
            order_id = %order_id,
            from = %previous,
            to = %target,
            "order status changed"
        );

        Ok((snapshot, previous))
    }

    /// Cancel an order on behalf of its owner.
    ///
    /// Allowed while the order is `pending`, `confirmed`, or `processing`;
    /// once shipped it can no longer be cancelled. Reserved stock goes back
    /// to the catalog, best-effort.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order,
    /// `OrderError::NotOwner` when the order belongs to someone else, and
    /// `OrderError::InvalidTransition` once the order has progressed past
    /// the cancellable states.
    pub async fn cancel(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<OrderSnapshot, OrderError> {
        let mut snapshot = self.load(order_id).await?;

        if snapshot.order.user_id != user_id {
            return Err(OrderError::NotOwner);
        }

        let previous = snapshot.order.status;

        if !previous.is_cancellable() {
            return Err(OrderError::InvalidTransition {
                from: previous,
                to: OrderStatus::Cancelled,
            });
        }

        // Same guarded write as `transition`: if the order moved since the
        // load, this cancel loses the race and restores nothing.
        let Some(order) = OrderRepository::new(self.pool)
            .update_status(order_id, previous, OrderStatus::Cancelled)
            .await?
        else {
            return Err(OrderError::InvalidTransition {
                from: previous,
                to: OrderStatus::Cancelled,
            });
        };
        snapshot.order = order;

        self.restore_items(&snapshot).await;

        tracing::info!(order_id = %order_id, user_id = %user_id, "order cancelled by owner");

        Ok(snapshot)
    }

    async fn load(&self, order_id: OrderId) -> Result<OrderSnapshot, OrderError> {
        OrderRepository::new(self.pool)
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)
    }

    /// Return every item's quantity to stock, logging failures per item.
    async fn restore_items(&self, snapshot: &OrderSnapshot) {
        for item in &snapshot.items {
            InventoryLedger::restore_best_effort(self.pool, item.product_id, item.quantity).await;
        }
    }
}
