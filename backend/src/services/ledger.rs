//! Movement ledger: reads for documents and products, tx-scoped writes
//!
//! Reads are a normal pool-backed service. Writes are deliberately not: a
//! movement row is only ever created, requantified, or deleted inside a
//! reconciliation transaction, so the write helpers take the transaction's
//! connection and stay crate-internal.

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{DocumentRef, Movement, MovementKind};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};

/// Movement ledger read service
#[derive(Clone)]
pub struct LedgerService {
    db: SqlitePool,
}

/// A document's line as its form renders it, product name resolved
#[derive(Debug, Clone, Serialize)]
pub struct MovementLine {
    pub id: i64,
    pub kind: MovementKind,
    pub quantity: i64,
    pub date: NaiveDate,
    pub product_id: i64,
    pub product_name: String,
    pub user_id: i64,
}

type MovementRow = (i64, i64, i64, NaiveDate, i64, i64, Option<i64>, Option<i64>);

fn movement_from_row(row: MovementRow) -> AppResult<Movement> {
    let (id, kind_code, quantity, date, product_id, user_id, purchase_id, order_id) = row;

    let kind = MovementKind::from_code(kind_code)
        .ok_or_else(|| anyhow!("unknown movement kind code {} in row {}", kind_code, id))?;

    let document = match (purchase_id, order_id) {
        (Some(purchase_id), None) => DocumentRef::Purchase(purchase_id),
        (None, Some(order_id)) => DocumentRef::Order(order_id),
        _ => return Err(anyhow!("movement {} has no single parent document", id).into()),
    };

    Ok(Movement {
        id,
        kind,
        quantity,
        date,
        product_id,
        user_id,
        document,
    })
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get one document's movements in insertion order
    pub async fn get_document_movements(
        &self,
        document: DocumentRef,
    ) -> AppResult<Vec<MovementLine>> {
        let sql = match document {
            DocumentRef::Purchase(_) => {
                r#"
                SELECT m.id, m.kind, m.quantity, m.date, m.product_id, p.name, m.user_id
                FROM movements m
                JOIN products p ON p.id = m.product_id
                WHERE m.purchase_id = ?1
                ORDER BY m.id
                "#
            }
            DocumentRef::Order(_) => {
                r#"
                SELECT m.id, m.kind, m.quantity, m.date, m.product_id, p.name, m.user_id
                FROM movements m
                JOIN products p ON p.id = m.product_id
                WHERE m.order_id = ?1
                ORDER BY m.id
                "#
            }
        };

        let rows = sqlx::query_as::<_, (i64, i64, i64, NaiveDate, i64, String, i64)>(sql)
            .bind(document.id())
            .fetch_all(&self.db)
            .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for (id, kind_code, quantity, date, product_id, product_name, user_id) in rows {
            let kind = MovementKind::from_code(kind_code)
                .ok_or_else(|| anyhow!("unknown movement kind code {} in row {}", kind_code, id))?;
            lines.push(MovementLine {
                id,
                kind,
                quantity,
                date,
                product_id,
                product_name,
                user_id,
            });
        }

        Ok(lines)
    }

    /// Get one product's movement history, newest first
    pub async fn get_product_movements(&self, product_id: i64) -> AppResult<Vec<Movement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, kind, quantity, date, product_id, user_id, purchase_id, order_id
            FROM movements
            WHERE product_id = ?1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(movement_from_row).collect()
    }

    /// Get a movement by id
    pub async fn get_movement(&self, movement_id: i64) -> AppResult<Movement> {
        let row = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, kind, quantity, date, product_id, user_id, purchase_id, order_id
            FROM movements
            WHERE id = ?1
            "#,
        )
        .bind(movement_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        movement_from_row(row)
    }
}

// ============================================================================
// Transaction-scoped writes (reconciliation engine only)
// ============================================================================

/// Insert a line for a document, stamping kind, user, and date
pub(crate) async fn insert_movement(
    conn: &mut SqliteConnection,
    document: DocumentRef,
    product_id: i64,
    quantity: i64,
    user_id: i64,
    date: NaiveDate,
) -> AppResult<i64> {
    let (purchase_id, order_id) = match document {
        DocumentRef::Purchase(id) => (Some(id), None),
        DocumentRef::Order(id) => (None, Some(id)),
    };

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO movements (kind, quantity, date, product_id, user_id, purchase_id, order_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING id
        "#,
    )
    .bind(document.movement_kind().code())
    .bind(quantity)
    .bind(date)
    .bind(product_id)
    .bind(user_id)
    .bind(purchase_id)
    .bind(order_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Requantify a line, restamping the acting user
pub(crate) async fn update_movement(
    conn: &mut SqliteConnection,
    movement_id: i64,
    quantity: i64,
    user_id: i64,
) -> AppResult<()> {
    sqlx::query("UPDATE movements SET quantity = ?1, user_id = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(user_id)
        .bind(movement_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Delete a line
pub(crate) async fn delete_movement(
    conn: &mut SqliteConnection,
    movement_id: i64,
) -> AppResult<()> {
    sqlx::query("DELETE FROM movements WHERE id = ?1")
        .bind(movement_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
