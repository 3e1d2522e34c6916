//! Order models and the checkout line math.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use storekeeper_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::cart::PricedCartLine;

/// A completed checkout. Immutable after creation except for `status`
/// (and `payment_status`), which only move through the order state machine.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_transaction_id: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line snapshot within an order.
///
/// Product name and unit price are copied at checkout time so later catalog
/// edits do not retroactively change historical orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// An order together with its item snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSnapshot {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// An order item about to be persisted at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl NewOrderItem {
    /// Snapshot a cart line at its current catalog price.
    #[must_use]
    pub fn from_line(line: &PricedCartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.unit_price * Decimal::from(line.quantity),
        }
    }
}

/// Turn the cart's current lines into order item drafts plus the order total.
#[must_use]
pub fn build_order_lines(lines: &[PricedCartLine]) -> (Vec<NewOrderItem>, Decimal) {
    let items: Vec<NewOrderItem> = lines.iter().map(NewOrderItem::from_line).collect();
    let total = items.iter().map(|item| item.subtotal).sum();
    (items, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i32, name: &str, quantity: i32, unit_price: Decimal) -> PricedCartLine {
        PricedCartLine {
            product_id: ProductId::new(id),
            product_name: name.to_owned(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_subtotal_is_quantity_times_unit_price() {
        let item = NewOrderItem::from_line(&line(1, "tea", 4, Decimal::new(250, 2)));
        assert_eq!(item.subtotal, Decimal::new(1000, 2));
        assert_eq!(item.unit_price, Decimal::new(250, 2));
    }

    #[test]
    fn test_build_order_lines_totals() {
        // Two of P1 at 10.00, one of P2 at 5.00 -> subtotals 20 and 5, total 25.
        let lines = [
            line(1, "p1", 2, Decimal::from(10)),
            line(2, "p2", 1, Decimal::from(5)),
        ];

        let (items, total) = build_order_lines(&lines);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].subtotal, Decimal::from(20));
        assert_eq!(items[1].subtotal, Decimal::from(5));
        assert_eq!(total, Decimal::from(25));
    }

    #[test]
    fn test_build_order_lines_empty() {
        let (items, total) = build_order_lines(&[]);
        assert!(items.is_empty());
        assert_eq!(total, Decimal::ZERO);
    }
}
