//! Configuration management for the Wholesale Storefront Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WSF_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::ReplenishmentPolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Replenishment engine tunables
    pub replenishment: ReplenishmentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

/// Named replenishment constants
///
/// These were inline literals in earlier iterations of the back office;
/// keeping them here makes each one independently tunable and testable.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplenishmentConfig {
    /// Trailing window for the demand estimate, in months
    pub demand_window_months: u32,

    /// Days-per-month assumption for daily demand
    pub days_per_month: u32,

    /// Safety factor applied to lead-time demand
    pub safety_factor: f64,

    /// Lead time assumed when a product has none configured
    pub default_lead_time_days: i32,

    /// Floor for computed reorder quantities
    pub min_reorder_quantity: i32,

    /// Months of projected demand a computed reorder covers
    pub demand_coverage_factor: f64,

    /// Fixed-strategy low-stock threshold
    pub low_stock_threshold: i32,

    /// Fixed-strategy suggested reorder quantity
    pub fixed_reorder_quantity: i32,

    /// Fixed-strategy reported safety stock
    pub fixed_safety_stock: i32,

    /// Fixed-strategy boundary between high and medium urgency
    pub critical_stock_threshold: i32,

    /// Cost ratio for estimating unit cost from sale price
    pub cost_ratio_estimate: f64,

    /// Supplier resolved when a purchase specifies none
    pub fallback_supplier_name: String,
}

impl ReplenishmentConfig {
    /// Materialize the policy consumed by the shared replenishment math
    pub fn policy(&self) -> ReplenishmentPolicy {
        let defaults = ReplenishmentPolicy::default();
        ReplenishmentPolicy {
            demand_window_months: self.demand_window_months,
            days_per_month: self.days_per_month,
            safety_factor: Decimal::from_f64_retain(self.safety_factor)
                .unwrap_or(defaults.safety_factor),
            default_lead_time_days: self.default_lead_time_days,
            min_reorder_quantity: self.min_reorder_quantity,
            demand_coverage_factor: Decimal::from_f64_retain(self.demand_coverage_factor)
                .unwrap_or(defaults.demand_coverage_factor),
            low_stock_threshold: self.low_stock_threshold,
            fixed_reorder_quantity: self.fixed_reorder_quantity,
            fixed_safety_stock: self.fixed_safety_stock,
            critical_stock_threshold: self.critical_stock_threshold,
            cost_ratio_estimate: Decimal::from_f64_retain(self.cost_ratio_estimate)
                .unwrap_or(defaults.cost_ratio_estimate),
            fallback_supplier_name: self.fallback_supplier_name.clone(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WSF_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("replenishment.demand_window_months", 3)?
            .set_default("replenishment.days_per_month", 30)?
            .set_default("replenishment.safety_factor", 1.5)?
            .set_default("replenishment.default_lead_time_days", 7)?
            .set_default("replenishment.min_reorder_quantity", 10)?
            .set_default("replenishment.demand_coverage_factor", 1.5)?
            .set_default("replenishment.low_stock_threshold", 10)?
            .set_default("replenishment.fixed_reorder_quantity", 30)?
            .set_default("replenishment.fixed_safety_stock", 5)?
            .set_default("replenishment.critical_stock_threshold", 3)?
            .set_default("replenishment.cost_ratio_estimate", 0.6)?
            .set_default("replenishment.fallback_supplier_name", "Generic Supplier")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WSF_ prefix)
            .add_source(
                Environment::with_prefix("WSF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
