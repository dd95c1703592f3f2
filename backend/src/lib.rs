//! Inventory management backend
//!
//! Tracks products, suppliers, clients, purchases (stock-in) and orders
//! (stock-out), and records every stock movement they produce. The core is
//! the reconciliation engine: it applies a batch of line-item changes for one
//! document atomically, adjusts product stock with a non-negative invariant,
//! and recomputes the document total from its lines.
//!
//! This crate is a library; web/admin surfaces are external collaborators
//! that call the service layer directly.

pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Initialize the tracing subscriber
///
/// Safe to call repeatedly; only the first call installs the subscriber, so
/// tests and embedding applications can share it.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
