//! Business logic services for the Wholesale Storefront Platform

pub mod auth;
pub mod product;
pub mod purchasing;
pub mod replenishment;
pub mod supplier;

pub use auth::AuthService;
pub use product::ProductService;
pub use purchasing::PurchasingService;
pub use replenishment::{
    FixedThresholdStrategy, ReorderStrategy, ReplenishmentService, ThresholdReorderStrategy,
};
pub use supplier::SupplierService;
