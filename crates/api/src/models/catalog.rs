//! Product and category models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeeper_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin payload for creating or replacing a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Admin payload for creating or replacing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl ProductInput {
    /// Check the catalog bounds before the payload reaches storage, so a bad
    /// value is a validation error rather than a check-constraint failure.
    ///
    /// # Errors
    ///
    /// Returns a message naming the violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name must not be empty".to_owned());
        }
        if self.price < Decimal::ZERO {
            return Err(format!("price must not be negative, got {}", self.price));
        }
        if self.stock < 0 {
            return Err(format!("stock must not be negative, got {}", self.stock));
        }
        Ok(())
    }
}

/// A catalog product.
///
/// `stock` is never assigned directly by business logic; it only moves
/// through the inventory ledger's atomic reserve/restore statements.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: Decimal, stock: i32) -> ProductInput {
        ProductInput {
            name: name.to_owned(),
            description: String::new(),
            price,
            stock,
            category_id: None,
        }
    }

    #[test]
    fn test_valid_product_input() {
        assert!(input("tea", Decimal::new(250, 2), 10).validate().is_ok());
        assert!(input("free sample", Decimal::ZERO, 0).validate().is_ok());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let err = input("tea", Decimal::ONE, -5).validate().unwrap_err();
        assert_eq!(err, "stock must not be negative, got -5");
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = input("tea", Decimal::from(-1), 1).validate().unwrap_err();
        assert_eq!(err, "price must not be negative, got -1");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(input("  ", Decimal::ONE, 1).validate().is_err());
    }
}
