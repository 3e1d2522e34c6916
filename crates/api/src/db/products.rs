//! Product repository.
//!
//! Stock columns are only ever written by the conditional reserve/restore
//! statements at the bottom of this file (plus admin catalog edits); business
//! logic never reads a stock value and writes it back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use storekeeper_core::{CategoryId, ProductId};

use super::{RepositoryError, conflict_on_reference, conflict_on_unique};
use crate::models::{Product, ProductInput};

/// Internal row type for product queries (joined with category name).
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    category_id: Option<i32>,
    category_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            category_id: row.category_id.map(CategoryId::new),
            category_name: row.category_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.stock,
            p.category_id, c.name AS category_name, p.created_at, p.updated_at
     FROM product p LEFT JOIN category c ON p.category_id = c.id";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            "INSERT INTO product (name, description, price, stock, category_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, description, price, stock, category_id,
                       NULL::varchar AS category_name, created_at, updated_at",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id.map(|c| c.as_i32()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "product name already exists"))?;

        Ok(row.into())
    }

    /// Replace a product's catalog fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "UPDATE product
             SET name = $2, description = $3, price = $4, stock = $5,
                 category_id = $6, updated_at = now()
             WHERE id = $1
             RETURNING id, name, description, price, stock, category_id,
                       NULL::varchar AS category_name, created_at, updated_at",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id.map(|c| c.as_i32()))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "product name already exists"))?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Order snapshots keep their own copy of the product data, so past sales
    /// never block deletion; only a live cart line does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist and
    /// `RepositoryError::Conflict` if the product sits in someone's cart.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| conflict_on_reference(e, "product is in a customer's cart"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("{PRODUCT_SELECT} ORDER BY p.id"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Case-insensitive substring search on product name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{PRODUCT_SELECT} WHERE p.name ILIKE $1 ORDER BY p.id"
        ))
        .bind(format!("%{name}%"))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{PRODUCT_SELECT} WHERE p.category_id = $1 ORDER BY p.id"
        ))
        .bind(category_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    // =========================================================================
    // Stock counters
    // =========================================================================

    /// Atomically decrement stock if at least `quantity` is available.
    ///
    /// The check and the decrement are one statement; concurrent reservations
    /// on the same product can never both succeed past the available count.
    /// Returns `false` when the product is missing or stock is insufficient.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn reserve_stock_in(
        conn: &mut PgConnection,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE product SET stock = stock - $2 WHERE id = $1 AND stock >= $2")
                .bind(id.as_i32())
                .bind(quantity)
                .execute(conn)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically increment stock. Returns `false` if the product is gone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn restore_stock_in(
        conn: &mut PgConnection,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE product SET stock = stock + $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(quantity)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
