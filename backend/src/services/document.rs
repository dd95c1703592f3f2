//! Transaction document service: purchase and order headers
//!
//! Headers are created once with an auto-stamped date and a zero total. From
//! then on the total belongs to the reconciliation engine; nothing here
//! writes it.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{DocumentRef, Order, Purchase};
use shared::types::DateRange;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::services::ledger::{LedgerService, MovementLine};
use crate::services::{escape_like, parse_decimal};

/// Document service for purchases and orders
#[derive(Clone)]
pub struct DocumentService {
    db: SqlitePool,
}

/// Filters for document listings; criteria are optional and AND-combined
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    /// Restrict to one supplier (purchases) or client (orders)
    pub counterparty_id: Option<i64>,
    /// Restrict to document dates inside the inclusive range
    pub date_range: Option<DateRange>,
    /// Substring match on the counterparty name
    pub search: Option<String>,
}

/// Purchase listing entry with its supplier name resolved
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseInfo {
    pub id: i64,
    pub date: NaiveDate,
    pub total: Decimal,
    pub supplier_id: i64,
    pub supplier_name: String,
}

/// Order listing entry with its client name resolved
#[derive(Debug, Clone, Serialize)]
pub struct OrderInfo {
    pub id: i64,
    pub date: NaiveDate,
    pub total: Decimal,
    pub client_id: i64,
    pub client_name: String,
}

/// A purchase header together with its current lines
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithMovements {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub movements: Vec<MovementLine>,
}

/// An order header together with its current lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithMovements {
    #[serde(flatten)]
    pub order: Order,
    pub movements: Vec<MovementLine>,
}

impl DocumentService {
    /// Create a new DocumentService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Purchases (stock-in)
    // ========================================================================

    /// Create a purchase header for a supplier
    ///
    /// The date is stamped once, here; the total starts at zero and is only
    /// ever rewritten by reconciliation.
    pub async fn create_purchase(&self, supplier_id: i64) -> AppResult<Purchase> {
        let supplier_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE id = ?1",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if supplier_exists == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let date = Utc::now().date_naive();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO purchases (date, total, supplier_id) VALUES (?1, '0', ?2) RETURNING id",
        )
        .bind(date)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(Purchase {
            id,
            date,
            total: Decimal::ZERO,
            supplier_id,
        })
    }

    /// Get a purchase header by id
    pub async fn get_purchase(&self, purchase_id: i64) -> AppResult<Purchase> {
        let row = sqlx::query_as::<_, (i64, NaiveDate, String, i64)>(
            "SELECT id, date, total, supplier_id FROM purchases WHERE id = ?1",
        )
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Ok(Purchase {
            id: row.0,
            date: row.1,
            total: parse_decimal(&row.2, "purchases.total")?,
            supplier_id: row.3,
        })
    }

    /// Get a purchase header with its lines
    pub async fn get_purchase_with_movements(
        &self,
        purchase_id: i64,
    ) -> AppResult<PurchaseWithMovements> {
        let purchase = self.get_purchase(purchase_id).await?;
        let movements = LedgerService::new(self.db.clone())
            .get_document_movements(DocumentRef::Purchase(purchase_id))
            .await?;

        Ok(PurchaseWithMovements {
            purchase,
            movements,
        })
    }

    /// List purchases with supplier names, newest first
    pub async fn get_purchases(&self, filter: &DocumentFilter) -> AppResult<Vec<PurchaseInfo>> {
        let rows = sqlx::query_as::<_, (i64, NaiveDate, String, i64, String)>(
            r#"
            SELECT p.id, p.date, p.total, p.supplier_id, s.name
            FROM purchases p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE (?1 IS NULL OR p.supplier_id = ?1)
              AND (?2 IS NULL OR p.date >= ?2)
              AND (?3 IS NULL OR p.date <= ?3)
              AND (?4 IS NULL OR s.name LIKE '%' || ?4 || '%' ESCAPE '\')
            ORDER BY p.date DESC, p.id DESC
            "#,
        )
        .bind(filter.counterparty_id)
        .bind(filter.date_range.map(|r| r.start))
        .bind(filter.date_range.map(|r| r.end))
        .bind(filter.search.as_deref().map(escape_like))
        .fetch_all(&self.db)
        .await?;

        let mut purchases = Vec::with_capacity(rows.len());
        for (id, date, total, supplier_id, supplier_name) in rows {
            purchases.push(PurchaseInfo {
                id,
                date,
                total: parse_decimal(&total, "purchases.total")?,
                supplier_id,
                supplier_name,
            });
        }

        Ok(purchases)
    }

    // ========================================================================
    // Orders (stock-out)
    // ========================================================================

    /// Create an order header for a client
    pub async fn create_order(&self, client_id: i64) -> AppResult<Order> {
        let client_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM clients WHERE id = ?1",
        )
        .bind(client_id)
        .fetch_one(&self.db)
        .await?;

        if client_exists == 0 {
            return Err(AppError::NotFound("Client".to_string()));
        }

        let date = Utc::now().date_naive();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (date, total, client_id) VALUES (?1, '0', ?2) RETURNING id",
        )
        .bind(date)
        .bind(client_id)
        .fetch_one(&self.db)
        .await?;

        Ok(Order {
            id,
            date,
            total: Decimal::ZERO,
            client_id,
        })
    }

    /// Get an order header by id
    pub async fn get_order(&self, order_id: i64) -> AppResult<Order> {
        let row = sqlx::query_as::<_, (i64, NaiveDate, String, i64)>(
            "SELECT id, date, total, client_id FROM orders WHERE id = ?1",
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        Ok(Order {
            id: row.0,
            date: row.1,
            total: parse_decimal(&row.2, "orders.total")?,
            client_id: row.3,
        })
    }

    /// Get an order header with its lines
    pub async fn get_order_with_movements(&self, order_id: i64) -> AppResult<OrderWithMovements> {
        let order = self.get_order(order_id).await?;
        let movements = LedgerService::new(self.db.clone())
            .get_document_movements(DocumentRef::Order(order_id))
            .await?;

        Ok(OrderWithMovements { order, movements })
    }

    /// List orders with client names, newest first
    pub async fn get_orders(&self, filter: &DocumentFilter) -> AppResult<Vec<OrderInfo>> {
        let rows = sqlx::query_as::<_, (i64, NaiveDate, String, i64, String)>(
            r#"
            SELECT o.id, o.date, o.total, o.client_id, c.name
            FROM orders o
            JOIN clients c ON c.id = o.client_id
            WHERE (?1 IS NULL OR o.client_id = ?1)
              AND (?2 IS NULL OR o.date >= ?2)
              AND (?3 IS NULL OR o.date <= ?3)
              AND (?4 IS NULL OR c.name LIKE '%' || ?4 || '%' ESCAPE '\')
            ORDER BY o.date DESC, o.id DESC
            "#,
        )
        .bind(filter.counterparty_id)
        .bind(filter.date_range.map(|r| r.start))
        .bind(filter.date_range.map(|r| r.end))
        .bind(filter.search.as_deref().map(escape_like))
        .fetch_all(&self.db)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for (id, date, total, client_id, client_name) in rows {
            orders.push(OrderInfo {
                id,
                date,
                total: parse_decimal(&total, "orders.total")?,
                client_id,
                client_name,
            });
        }

        Ok(orders)
    }
}
