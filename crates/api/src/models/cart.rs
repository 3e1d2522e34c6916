//! Cart and cart item models.

use rust_decimal::Decimal;
use serde::Serialize;

use storekeeper_core::{CartId, CartItemId, ProductId, UserId};

use super::Product;

/// A user's cart. One per user, created lazily on the first add; the row
/// survives clears so it can be reused.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
}

/// One product line within a cart.
///
/// `price` is the stored line total (`unit price * quantity`), recomputed on
/// every merge. It is the accounting value used downstream; display views
/// re-read the current catalog price instead.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// Cart line as presented to the client: current catalog name and unit
/// price, with the line total derived from them.
///
/// A `quantity` of 0 signals that the item was just removed from the cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl CartItemView {
    /// Build a view from the current product and a line quantity.
    #[must_use]
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            line_total: product.price * Decimal::from(quantity),
        }
    }
}

impl From<PricedCartLine> for CartItemView {
    fn from(line: PricedCartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.unit_price * Decimal::from(line.quantity),
        }
    }
}

/// A cart line joined with the current catalog product, as read by
/// `view_cart` and the checkout orchestrator.
#[derive(Debug, Clone)]
pub struct PricedCartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn product(price: Decimal) -> Product {
        Product {
            id: ProductId::new(1),
            name: "widget".to_owned(),
            description: String::new(),
            price,
            stock: 10,
            category_id: None,
            category_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_line_total() {
        let view = CartItemView::from_product(&product(Decimal::new(1050, 2)), 3);
        assert_eq!(view.unit_price, Decimal::new(1050, 2));
        assert_eq!(view.line_total, Decimal::new(3150, 2));
    }

    #[test]
    fn test_view_zero_quantity_signals_removal() {
        let view = CartItemView::from_product(&product(Decimal::new(500, 2)), 0);
        assert_eq!(view.quantity, 0);
        assert_eq!(view.line_total, Decimal::ZERO);
    }
}
