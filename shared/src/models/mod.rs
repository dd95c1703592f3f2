//! Domain models for the inventory management backend

mod catalog;
mod document;
mod movement;
mod user;

pub use catalog::*;
pub use document::*;
pub use movement::*;
pub use user::*;
