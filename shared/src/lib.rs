//! Shared types and models for the inventory management backend
//!
//! This crate contains the domain model, pure validation helpers, and the
//! stock-delta arithmetic used by the reconciliation engine. Nothing in here
//! touches a database; everything is unit-testable in isolation.

pub mod models;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use models::*;
pub use reconcile::*;
pub use types::*;
pub use validation::*;
