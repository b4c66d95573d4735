//! HTTP handlers for the Wholesale Storefront Platform

pub mod auth;
pub mod health;
pub mod inventory;
pub mod products;
pub mod purchases;
pub mod suppliers;

pub use auth::*;
pub use health::*;
pub use inventory::*;
pub use products::*;
pub use purchases::*;
pub use suppliers::*;
