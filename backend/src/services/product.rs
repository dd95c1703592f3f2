//! Product service: catalog CRUD plus the atomic stock adjustment
//!
//! `stock` is guarded by a CHECK constraint at the storage layer and is only
//! ever mutated through [`ProductService::adjust_stock`] or the
//! reconciliation engine's transactional equivalent. Both express the change
//! as a column-level increment so concurrent adjustments serialize in the
//! database instead of racing through application memory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::Product;
use shared::validation::{validate_name, validate_price, validate_stock};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::services::{escape_like, parse_decimal};

/// Product service for stocked items
#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

/// Product listing entry with its category name resolved
#[derive(Debug, Clone, Serialize)]
pub struct ProductInfo {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: i64,
    pub category_name: String,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub price: Decimal,
    pub category_id: i64,
    /// Opening stock level; later changes go through stock adjustment
    pub stock: i64,
}

/// Input for updating a product
///
/// Stock is deliberately absent: levels change only through adjustment.
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
}

fn product_from_row(row: (i64, String, String, i64, i64)) -> AppResult<Product> {
    Ok(Product {
        id: row.0,
        name: row.1,
        price: parse_decimal(&row.2, "products.price")?,
        category_id: row.3,
        stock: row.4,
    })
}

fn info_from_row(row: (i64, String, String, i64, i64, String)) -> AppResult<ProductInfo> {
    Ok(ProductInfo {
        id: row.0,
        name: row.1,
        price: parse_decimal(&row.2, "products.price")?,
        stock: row.3,
        category_id: row.4,
        category_name: row.5,
    })
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get all products with their category names, ordered by name
    pub async fn get_products(&self) -> AppResult<Vec<ProductInfo>> {
        let rows = sqlx::query_as::<_, (i64, String, String, i64, i64, String)>(
            r#"
            SELECT p.id, p.name, p.price, p.stock, p.category_id, c.name
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(info_from_row).collect()
    }

    /// Search products by name substring
    pub async fn search_products(&self, query: &str) -> AppResult<Vec<ProductInfo>> {
        let rows = sqlx::query_as::<_, (i64, String, String, i64, i64, String)>(
            r#"
            SELECT p.id, p.name, p.price, p.stock, p.category_id, c.name
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.name LIKE '%' || ?1 || '%' ESCAPE '\'
            ORDER BY p.name
            "#,
        )
        .bind(escape_like(query))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(info_from_row).collect()
    }

    /// Get all products in one category
    pub async fn get_products_by_category(&self, category_id: i64) -> AppResult<Vec<ProductInfo>> {
        let rows = sqlx::query_as::<_, (i64, String, String, i64, i64, String)>(
            r#"
            SELECT p.id, p.name, p.price, p.stock, p.category_id, c.name
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.category_id = ?1
            ORDER BY p.name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(info_from_row).collect()
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: i64) -> AppResult<Product> {
        let row = sqlx::query_as::<_, (i64, String, String, i64, i64)>(
            "SELECT id, name, price, category_id, stock FROM products WHERE id = ?1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        product_from_row(row)
    }

    /// Create a new product
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        validate_stock(input.stock).map_err(|msg| AppError::Validation {
            field: "stock".to_string(),
            message: msg.to_string(),
        })?;

        // Check the category exists up front for a precise error
        let category_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE id = ?1",
        )
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await?;

        if category_exists == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO products (name, price, category_id, stock) VALUES (?1, ?2, ?3, ?4) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.price.to_string())
        .bind(input.category_id)
        .bind(input.stock)
        .fetch_one(&self.db)
        .await?;

        Ok(Product {
            id,
            name: input.name,
            price: input.price,
            category_id: input.category_id,
            stock: input.stock,
        })
    }

    /// Update a product's name, price, or category
    pub async fn update_product(
        &self,
        product_id: i64,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(product_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let price = input.price.unwrap_or(existing.price);
        let category_id = input.category_id.unwrap_or(existing.category_id);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_price(price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;

        if category_id != existing.category_id {
            let category_exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM categories WHERE id = ?1",
            )
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;

            if category_exists == 0 {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        sqlx::query("UPDATE products SET name = ?1, price = ?2, category_id = ?3 WHERE id = ?4")
            .bind(&name)
            .bind(price.to_string())
            .bind(category_id)
            .bind(product_id)
            .execute(&self.db)
            .await?;

        Ok(Product {
            id: product_id,
            name,
            price,
            category_id,
            stock: existing.stock,
        })
    }

    /// Delete a product (its movements go with it)
    pub async fn delete_product(&self, product_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Apply a signed delta to a product's stock and return the new level
    ///
    /// One conditional increment at the storage engine; a delta that would
    /// take stock negative violates the CHECK constraint and surfaces as
    /// [`AppError::InsufficientStock`] without changing anything.
    pub async fn adjust_stock(&self, product_id: i64, delta: i64) -> AppResult<i64> {
        let stock = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET stock = stock + ?1 WHERE id = ?2 RETURNING stock",
        )
        .bind(delta)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tracing::info!(product_id, delta, stock, "stock adjusted");

        Ok(stock)
    }
}
