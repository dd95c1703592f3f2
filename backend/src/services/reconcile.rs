//! Reconciliation engine: applies a document's line-item batch atomically
//!
//! Everything a batch does happens in one transaction: resolving originals,
//! collapsing per-product net deltas, the conditional stock increments, line
//! persistence, and the total recomputation. Either all of it commits or
//! none of it is observable. Stock changes are column-level increments at
//! the storage engine under the non-negative CHECK constraint, so concurrent
//! batches against the same product serialize in the database and a loser
//! surfaces insufficient stock instead of corrupting state.

use std::collections::HashSet;

use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::DocumentRef;
use shared::reconcile::{document_total, net_inventory_deltas, BatchOutcome, LineOp, ResolvedLine};
use shared::validation::validate_line_op;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{ledger, parse_decimal};

/// Reconciliation engine for line-item batches
#[derive(Clone)]
pub struct ReconcileService {
    db: SqlitePool,
}

impl ReconcileService {
    /// Create a new ReconcileService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Apply a batch of line-item operations to one document
    ///
    /// Aborts are all-or-nothing and retryable by the caller: insufficient
    /// stock surfaces as [`AppError::InsufficientStock`], malformed input as
    /// [`AppError::Validation`] before anything is written.
    pub async fn submit_batch(
        &self,
        document: DocumentRef,
        ops: &[LineOp],
        user_id: i64,
    ) -> AppResult<BatchOutcome> {
        // Field-level validation before the transaction starts
        let mut seen = HashSet::new();
        for op in ops {
            validate_line_op(op).map_err(|msg| AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            })?;

            // At most one operation per existing line; editing and deleting
            // the same line in one batch has no coherent meaning
            if let LineOp::Edit { movement_id, .. } | LineOp::Delete { movement_id } = op {
                if !seen.insert(*movement_id) {
                    return Err(AppError::Validation {
                        field: "movement_id".to_string(),
                        message: "Duplicate operation for the same movement".to_string(),
                    });
                }
            }
        }

        let kind = document.movement_kind();
        let mut tx = self.db.begin().await?;

        // First statement is a write against the document row: it doubles as
        // the existence check and makes this transaction a writer before any
        // read, so concurrent batches queue on the database write lock here.
        let touched = match document {
            DocumentRef::Purchase(id) => {
                sqlx::query("UPDATE purchases SET total = total WHERE id = ?1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?
            }
            DocumentRef::Order(id) => {
                sqlx::query("UPDATE orders SET total = total WHERE id = ?1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?
            }
        };
        if touched.rows_affected() == 0 {
            let entity = match document {
                DocumentRef::Purchase(_) => "Purchase",
                DocumentRef::Order(_) => "Order",
            };
            return Err(AppError::NotFound(entity.to_string()));
        }

        let user_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        if user_exists == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        // Resolve every operation against pre-batch ledger state
        let mut resolved = Vec::with_capacity(ops.len());
        for op in ops {
            let line = match *op {
                LineOp::New {
                    product_id,
                    quantity,
                } => {
                    let product_exists =
                        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE id = ?1")
                            .bind(product_id)
                            .fetch_one(&mut *tx)
                            .await?;
                    if product_exists == 0 {
                        return Err(AppError::NotFound("Product".to_string()));
                    }
                    ResolvedLine::New {
                        product_id,
                        quantity,
                    }
                }
                LineOp::Edit {
                    movement_id,
                    quantity,
                } => {
                    let (product_id, original_quantity) =
                        fetch_line(&mut tx, document, movement_id).await?;
                    ResolvedLine::Edit {
                        product_id,
                        original_quantity,
                        new_quantity: quantity,
                    }
                }
                LineOp::Delete { movement_id } => {
                    let (product_id, original_quantity) =
                        fetch_line(&mut tx, document, movement_id).await?;
                    ResolvedLine::Delete {
                        product_id,
                        original_quantity,
                    }
                }
            };
            resolved.push(line);
        }

        // Collapse to one net delta per product and apply each as a
        // conditional increment; an overdraw violates the stock CHECK
        // constraint and aborts the whole batch
        let deltas = net_inventory_deltas(kind, &resolved);
        for (&product_id, &delta) in &deltas {
            let applied = sqlx::query("UPDATE products SET stock = stock + ?1 WHERE id = ?2")
                .bind(delta)
                .bind(product_id)
                .execute(&mut *tx)
                .await;

            if let Err(err) = applied {
                let err = AppError::from(err);
                if let AppError::InsufficientStock(_) = err {
                    tracing::warn!(?document, product_id, delta, "insufficient stock, aborting batch");
                }
                return Err(err);
            }
        }

        // Persist the lines, stamping user and (for new lines) today's date;
        // the kind comes from the document type inside insert_movement
        let date = Utc::now().date_naive();
        for op in ops {
            match *op {
                LineOp::New {
                    product_id,
                    quantity,
                } => {
                    ledger::insert_movement(&mut tx, document, product_id, quantity, user_id, date)
                        .await?;
                }
                LineOp::Edit {
                    movement_id,
                    quantity,
                } => {
                    ledger::update_movement(&mut tx, movement_id, quantity, user_id).await?;
                }
                LineOp::Delete { movement_id } => {
                    ledger::delete_movement(&mut tx, movement_id).await?;
                }
            }
        }

        let new_total = recompute_total(&mut tx, document).await?;

        tx.commit().await?;

        tracing::info!(
            ?document,
            ops = ops.len(),
            products = deltas.len(),
            %new_total,
            "reconciliation batch committed"
        );

        Ok(BatchOutcome {
            new_total,
            applied_deltas: deltas,
        })
    }
}

/// Fetch a movement's product and quantity, checking document ownership
async fn fetch_line(
    conn: &mut SqliteConnection,
    document: DocumentRef,
    movement_id: i64,
) -> AppResult<(i64, i64)> {
    let row = sqlx::query_as::<_, (i64, i64, Option<i64>, Option<i64>)>(
        "SELECT product_id, quantity, purchase_id, order_id FROM movements WHERE id = ?1",
    )
    .bind(movement_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

    let belongs = match document {
        DocumentRef::Purchase(id) => row.2 == Some(id),
        DocumentRef::Order(id) => row.3 == Some(id),
    };
    if !belongs {
        return Err(AppError::Validation {
            field: "movement_id".to_string(),
            message: "Movement does not belong to this document".to_string(),
        });
    }

    Ok((row.0, row.1))
}

/// Recompute a document's cached total from its current lines and store it
///
/// The only write path for a total after header creation. A document with no
/// lines gets zero back, including when the batch just deleted the last one.
async fn recompute_total(conn: &mut SqliteConnection, document: DocumentRef) -> AppResult<Decimal> {
    let sql = match document {
        DocumentRef::Purchase(_) => {
            r#"
            SELECT m.quantity, p.price
            FROM movements m
            JOIN products p ON p.id = m.product_id
            WHERE m.purchase_id = ?1
            "#
        }
        DocumentRef::Order(_) => {
            r#"
            SELECT m.quantity, p.price
            FROM movements m
            JOIN products p ON p.id = m.product_id
            WHERE m.order_id = ?1
            "#
        }
    };

    let rows = sqlx::query_as::<_, (i64, String)>(sql)
        .bind(document.id())
        .fetch_all(&mut *conn)
        .await?;

    let mut lines = Vec::with_capacity(rows.len());
    for (quantity, price) in &rows {
        lines.push((*quantity, parse_decimal(price, "products.price")?));
    }
    let total = document_total(lines)
        .ok_or_else(|| anyhow!("total for {:?} exceeds the decimal range", document))?;

    let update = match document {
        DocumentRef::Purchase(_) => "UPDATE purchases SET total = ?1 WHERE id = ?2",
        DocumentRef::Order(_) => "UPDATE orders SET total = ?1 WHERE id = ?2",
    };
    sqlx::query(update)
        .bind(total.to_string())
        .bind(document.id())
        .execute(&mut *conn)
        .await?;

    Ok(total)
}
