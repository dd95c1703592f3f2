//! Business logic services for the inventory management backend

use anyhow::Context;
use rust_decimal::Decimal;

use crate::error::AppResult;

pub mod catalog;
pub mod document;
pub mod ledger;
pub mod product;
pub mod reconcile;
pub mod user;

pub use catalog::CatalogService;
pub use document::DocumentService;
pub use ledger::LedgerService;
pub use product::ProductService;
pub use reconcile::ReconcileService;
pub use user::UserService;

/// Parse a decimal persisted as TEXT
///
/// SQLite has no native decimal type, so prices and totals are stored as
/// their canonical string form and parsed back at the row boundary.
pub(crate) fn parse_decimal(value: &str, column: &'static str) -> AppResult<Decimal> {
    let parsed = value
        .parse::<Decimal>()
        .with_context(|| format!("invalid decimal in column {}: {}", column, value))?;
    Ok(parsed)
}

/// Escape LIKE wildcards so a search term matches literally
///
/// Bound terms are wrapped in `'%' || ?n || '%'` by the search queries, which
/// must carry `ESCAPE '\'` for the escapes produced here to take effect.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
