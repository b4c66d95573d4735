//! Replenishment policy and the pure math behind it
//!
//! Demand estimation, safety stock, reorder point and reorder quantity are
//! plain functions over a [`ReplenishmentPolicy`], so each formula is
//! independently testable and idempotent: unchanged inputs always produce
//! identical outputs. The database-facing orchestration lives in the
//! backend's replenishment service.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tunable constants of the replenishment engine
///
/// Defaults mirror the back-office policy: a 3-month demand window, a 30-day
/// month, a 1.5 safety factor, and the fixed thresholds used by the
/// interactive low-stock path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentPolicy {
    /// Trailing window for the demand estimate, in months
    pub demand_window_months: u32,
    /// Days-per-month assumption when converting monthly demand to daily
    pub days_per_month: u32,
    /// Multiplier applied to lead-time demand when sizing safety stock
    pub safety_factor: Decimal,
    /// Lead time assumed for products with none configured
    pub default_lead_time_days: i32,
    /// Floor for any computed reorder quantity
    pub min_reorder_quantity: i32,
    /// Months of projected demand a computed reorder covers
    pub demand_coverage_factor: Decimal,
    /// Stock level at or below which the fixed strategy flags a product
    pub low_stock_threshold: i32,
    /// Constant suggested quantity used by the fixed strategy
    pub fixed_reorder_quantity: i32,
    /// Constant safety stock reported by the fixed strategy
    pub fixed_safety_stock: i32,
    /// Fixed-strategy boundary between `high` and `medium` urgency
    pub critical_stock_threshold: i32,
    /// Cost ratio used to estimate unit cost from sale price
    pub cost_ratio_estimate: Decimal,
    /// Name of the supplier resolved when none is specified
    pub fallback_supplier_name: String,
}

impl Default for ReplenishmentPolicy {
    fn default() -> Self {
        Self {
            demand_window_months: 3,
            days_per_month: 30,
            safety_factor: Decimal::new(15, 1),
            default_lead_time_days: 7,
            min_reorder_quantity: 10,
            demand_coverage_factor: Decimal::new(15, 1),
            low_stock_threshold: 10,
            fixed_reorder_quantity: 30,
            fixed_safety_stock: 5,
            critical_stock_threshold: 3,
            cost_ratio_estimate: Decimal::new(6, 1),
            fallback_supplier_name: "Generic Supplier".to_string(),
        }
    }
}

/// Urgency tier of a flagged product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
}

impl Urgency {
    /// Sort key: critical first, then high, then medium
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::High => 1,
            Urgency::Medium => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
        }
    }
}

/// A product flagged for replenishment
///
/// Both reorder strategies emit this shape; field names are camelCase on the
/// wire to match the admin UI contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderCandidate {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub stock: i32,
    pub cost_price: Option<Decimal>,
    pub price: Decimal,
    pub reorder_point: i32,
    pub suggested_quantity: i32,
    pub safety_stock: i32,
    pub urgency: Urgency,
}

/// Computed inventory suggestions for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySuggestions {
    pub average_monthly_sales: Decimal,
    pub suggested_safety_stock: i32,
    pub suggested_reorder_point: i32,
    pub suggested_reorder_quantity: i32,
}

/// Average monthly units sold over the demand window
///
/// The divisor is the configured window length, not the number of elapsed
/// months, so products younger than the window are averaged down. No history
/// yields zero, which downstream disables auto-replenishment for the product
/// (zero safety stock, zero reorder point).
pub fn average_monthly_sales(total_units: i64, window_months: u32) -> Decimal {
    if window_months == 0 || total_units <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(total_units) / Decimal::from(window_months)).round_dp(2)
}

/// Suggested safety stock: demand during lead time times the safety factor
pub fn suggested_safety_stock(
    policy: &ReplenishmentPolicy,
    avg_monthly_sales: Decimal,
    lead_time_days: Option<i32>,
) -> i32 {
    let daily = daily_demand(policy, avg_monthly_sales);
    let lead_time = effective_lead_time(policy, lead_time_days);
    ceil_to_units(daily * Decimal::from(lead_time) * policy.safety_factor)
}

/// Reorder point: demand during lead time plus safety stock
///
/// A stored manual safety stock wins; otherwise the safety-stock formula is
/// applied fresh.
pub fn reorder_point(
    policy: &ReplenishmentPolicy,
    avg_monthly_sales: Decimal,
    lead_time_days: Option<i32>,
    stored_safety_stock: Option<i32>,
) -> i32 {
    let daily = daily_demand(policy, avg_monthly_sales);
    let lead_time = effective_lead_time(policy, lead_time_days);
    let demand_during_lead_time = ceil_to_units(daily * Decimal::from(lead_time));
    let safety_stock = stored_safety_stock
        .unwrap_or_else(|| suggested_safety_stock(policy, avg_monthly_sales, lead_time_days));
    demand_during_lead_time.saturating_add(safety_stock)
}

/// Reorder quantity: manual override wins, else enough units to cover the
/// configured months of projected demand, floored at the minimum
pub fn reorder_quantity(
    policy: &ReplenishmentPolicy,
    avg_monthly_sales: Decimal,
    manual_quantity: Option<i32>,
) -> i32 {
    if let Some(quantity) = manual_quantity {
        if quantity > 0 {
            return quantity;
        }
    }
    let suggested = ceil_to_units(avg_monthly_sales * policy.demand_coverage_factor);
    suggested.max(policy.min_reorder_quantity)
}

/// Urgency under the threshold strategy
///
/// `safety_stock` is the stored manual value, zero when unset.
pub fn classify_urgency(stock: i32, safety_stock: i32) -> Urgency {
    if stock == 0 {
        Urgency::Critical
    } else if stock < safety_stock {
        Urgency::High
    } else {
        Urgency::Medium
    }
}

/// Urgency under the fixed-threshold strategy
pub fn classify_urgency_fixed(policy: &ReplenishmentPolicy, stock: i32) -> Urgency {
    if stock == 0 {
        Urgency::Critical
    } else if stock <= policy.critical_stock_threshold {
        Urgency::High
    } else {
        Urgency::Medium
    }
}

fn daily_demand(policy: &ReplenishmentPolicy, avg_monthly_sales: Decimal) -> Decimal {
    if policy.days_per_month == 0 {
        return Decimal::ZERO;
    }
    avg_monthly_sales.max(Decimal::ZERO) / Decimal::from(policy.days_per_month)
}

fn effective_lead_time(policy: &ReplenishmentPolicy, lead_time_days: Option<i32>) -> i32 {
    match lead_time_days {
        Some(days) if days > 0 => days,
        _ => policy.default_lead_time_days,
    }
}

fn ceil_to_units(value: Decimal) -> i32 {
    value
        .ceil()
        .to_i64()
        .map_or(i32::MAX, |v| v.clamp(0, i32::MAX as i64) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ReplenishmentPolicy {
        ReplenishmentPolicy::default()
    }

    #[test]
    fn average_is_total_over_window() {
        assert_eq!(average_monthly_sales(36, 3), Decimal::from(12));
        assert_eq!(average_monthly_sales(10, 3), Decimal::new(333, 2));
        assert_eq!(average_monthly_sales(0, 3), Decimal::ZERO);
    }

    #[test]
    fn safety_stock_and_reorder_point_worked_example() {
        // 12 units/month, 7-day lead time:
        // safety = ceil((12/30) * 7 * 1.5) = ceil(4.2) = 5
        // reorder point = ceil((12/30) * 7) + 5 = 3 + 5 = 8
        let avg = Decimal::from(12);
        assert_eq!(suggested_safety_stock(&policy(), avg, Some(7)), 5);
        assert_eq!(reorder_point(&policy(), avg, Some(7), None), 8);
    }

    #[test]
    fn stored_safety_stock_wins_in_reorder_point() {
        let avg = Decimal::from(12);
        assert_eq!(reorder_point(&policy(), avg, Some(7), Some(20)), 23);
    }

    #[test]
    fn lead_time_defaults_to_seven_days() {
        let avg = Decimal::from(12);
        assert_eq!(
            reorder_point(&policy(), avg, None, None),
            reorder_point(&policy(), avg, Some(7), None),
        );
    }

    #[test]
    fn manual_reorder_quantity_wins() {
        assert_eq!(reorder_quantity(&policy(), Decimal::from(100), Some(25)), 25);
        // A non-positive stored value is not a valid override
        assert_eq!(reorder_quantity(&policy(), Decimal::ZERO, Some(0)), 10);
    }

    #[test]
    fn reorder_quantity_has_a_floor() {
        assert_eq!(reorder_quantity(&policy(), Decimal::ZERO, None), 10);
        assert_eq!(reorder_quantity(&policy(), Decimal::from(2), None), 10);
        // 1.5 months of 40/month demand
        assert_eq!(reorder_quantity(&policy(), Decimal::from(40), None), 60);
    }

    #[test]
    fn zero_history_disables_replenishment() {
        assert_eq!(suggested_safety_stock(&policy(), Decimal::ZERO, Some(7)), 0);
        assert_eq!(reorder_point(&policy(), Decimal::ZERO, Some(7), None), 0);
    }

    #[test]
    fn urgency_tiers() {
        assert_eq!(classify_urgency(0, 5), Urgency::Critical);
        assert_eq!(classify_urgency(3, 5), Urgency::High);
        assert_eq!(classify_urgency(5, 5), Urgency::Medium);
        assert_eq!(classify_urgency(4, 0), Urgency::Medium);

        let p = policy();
        assert_eq!(classify_urgency_fixed(&p, 0), Urgency::Critical);
        assert_eq!(classify_urgency_fixed(&p, 3), Urgency::High);
        assert_eq!(classify_urgency_fixed(&p, 4), Urgency::Medium);
    }
}
