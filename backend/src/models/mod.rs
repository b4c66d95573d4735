//! Database models for the Wholesale Storefront Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
