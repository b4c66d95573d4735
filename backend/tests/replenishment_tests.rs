//! Replenishment engine tests
//!
//! Covers the demand estimator, the threshold calculator, and both urgency
//! classifiers:
//! - zero-history products estimate to zero and are never auto-flagged
//! - safety stock and reorder point are always non-negative integers
//! - manual reorder quantities win; computed ones are floored at the minimum
//! - the calculator is idempotent for unchanged inputs

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{
    average_monthly_sales, classify_urgency, classify_urgency_fixed, reorder_point,
    reorder_quantity, suggested_safety_stock, ReplenishmentPolicy, Urgency,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn policy() -> ReplenishmentPolicy {
        ReplenishmentPolicy::default()
    }

    /// No qualifying order lines in the window means exactly zero demand
    #[test]
    fn test_zero_history_estimates_to_zero() {
        assert_eq!(average_monthly_sales(0, 3), Decimal::ZERO);
    }

    /// The divisor is the window length, not elapsed months
    #[test]
    fn test_average_uses_fixed_divisor() {
        assert_eq!(average_monthly_sales(36, 3), dec("12"));
        assert_eq!(average_monthly_sales(10, 3), dec("3.33"));
        assert_eq!(average_monthly_sales(1, 3), dec("0.33"));
    }

    /// Worked example: 12 units/month, 7-day lead time
    #[test]
    fn test_safety_stock_and_reorder_point_example() {
        let p = policy();
        let avg = dec("12");

        // safety = ceil((12/30) * 7 * 1.5) = ceil(4.2) = 5
        assert_eq!(suggested_safety_stock(&p, avg, Some(7)), 5);

        // reorder point = ceil((12/30) * 7) + 5 = 3 + 5 = 8
        assert_eq!(reorder_point(&p, avg, Some(7), None), 8);
    }

    /// Zero demand propagates to zero thresholds, disabling auto-reorder
    #[test]
    fn test_zero_demand_zero_thresholds() {
        let p = policy();
        assert_eq!(suggested_safety_stock(&p, Decimal::ZERO, Some(7)), 0);
        assert_eq!(reorder_point(&p, Decimal::ZERO, Some(7), None), 0);
    }

    /// Unset lead time falls back to the configured default of 7 days
    #[test]
    fn test_lead_time_default() {
        let p = policy();
        let avg = dec("12");
        assert_eq!(
            suggested_safety_stock(&p, avg, None),
            suggested_safety_stock(&p, avg, Some(7))
        );
        assert_eq!(
            reorder_point(&p, avg, None, None),
            reorder_point(&p, avg, Some(7), None)
        );
    }

    /// A stored safety stock replaces the computed one inside the reorder point
    #[test]
    fn test_stored_safety_stock_wins() {
        let p = policy();
        let avg = dec("12");
        // ceil(2.8) + 20
        assert_eq!(reorder_point(&p, avg, Some(7), Some(20)), 23);
    }

    /// A manually configured positive reorder quantity is returned unchanged
    #[test]
    fn test_manual_reorder_quantity_wins() {
        let p = policy();
        assert_eq!(reorder_quantity(&p, dec("100"), Some(25)), 25);
        assert_eq!(reorder_quantity(&p, dec("100"), Some(7)), 7);
    }

    /// A non-positive stored quantity is not a valid override
    #[test]
    fn test_non_positive_manual_quantity_ignored() {
        let p = policy();
        assert_eq!(reorder_quantity(&p, dec("100"), Some(0)), 150);
        assert_eq!(reorder_quantity(&p, Decimal::ZERO, Some(0)), 10);
    }

    /// Computed quantities are floored at the minimum of 10 units
    #[test]
    fn test_reorder_quantity_floor() {
        let p = policy();
        assert_eq!(reorder_quantity(&p, Decimal::ZERO, None), 10);
        assert_eq!(reorder_quantity(&p, dec("2"), None), 10);
        assert_eq!(reorder_quantity(&p, dec("6.5"), None), 10);
        // 1.5 months of coverage once above the floor
        assert_eq!(reorder_quantity(&p, dec("40"), None), 60);
    }

    /// Threshold-strategy urgency tiers
    #[test]
    fn test_threshold_urgency() {
        assert_eq!(classify_urgency(0, 5), Urgency::Critical);
        assert_eq!(classify_urgency(4, 5), Urgency::High);
        assert_eq!(classify_urgency(5, 5), Urgency::Medium);
        // Without a stored safety stock nothing classifies as high
        assert_eq!(classify_urgency(1, 0), Urgency::Medium);
    }

    /// Fixed-strategy urgency tiers
    #[test]
    fn test_fixed_urgency() {
        let p = policy();
        assert_eq!(classify_urgency_fixed(&p, 0), Urgency::Critical);
        assert_eq!(classify_urgency_fixed(&p, 1), Urgency::High);
        assert_eq!(classify_urgency_fixed(&p, 3), Urgency::High);
        assert_eq!(classify_urgency_fixed(&p, 4), Urgency::Medium);
        assert_eq!(classify_urgency_fixed(&p, 10), Urgency::Medium);
    }

    /// Fixed selector boundary: stock 10 is flagged, stock 11 never is
    #[test]
    fn test_fixed_threshold_boundary() {
        let p = policy();
        assert!(10 <= p.low_stock_threshold);
        assert!(11 > p.low_stock_threshold);
    }

    /// Urgency ranks sort critical first, then high, then medium
    #[test]
    fn test_urgency_ordering() {
        let mut urgencies = vec![Urgency::Medium, Urgency::Critical, Urgency::High];
        urgencies.sort_by_key(|u| u.rank());
        assert_eq!(
            urgencies,
            vec![Urgency::Critical, Urgency::High, Urgency::Medium]
        );
    }

    /// The calculator is idempotent: same inputs, same outputs
    #[test]
    fn test_calculator_idempotent() {
        let p = policy();
        let avg = dec("17.33");

        let first = (
            suggested_safety_stock(&p, avg, Some(10)),
            reorder_point(&p, avg, Some(10), Some(4)),
            reorder_quantity(&p, avg, None),
        );
        let second = (
            suggested_safety_stock(&p, avg, Some(10)),
            reorder_point(&p, avg, Some(10), Some(4)),
            reorder_quantity(&p, avg, None),
        );

        assert_eq!(first, second);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn policy() -> ReplenishmentPolicy {
        ReplenishmentPolicy::default()
    }

    /// Strategy for non-negative monthly demand (0.00 to 1000.00)
    fn demand_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for positive lead times
    fn lead_time_strategy() -> impl Strategy<Value = i32> {
        1i32..=120
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Safety stock and reorder point are non-negative for any
        /// non-negative demand and positive lead time
        #[test]
        fn prop_thresholds_non_negative(
            avg in demand_strategy(),
            lead_time in lead_time_strategy()
        ) {
            let p = policy();
            prop_assert!(suggested_safety_stock(&p, avg, Some(lead_time)) >= 0);
            prop_assert!(reorder_point(&p, avg, Some(lead_time), None) >= 0);
        }

        /// The reorder point is never below its safety stock component
        #[test]
        fn prop_reorder_point_covers_safety_stock(
            avg in demand_strategy(),
            lead_time in lead_time_strategy()
        ) {
            let p = policy();
            let safety = suggested_safety_stock(&p, avg, Some(lead_time));
            prop_assert!(reorder_point(&p, avg, Some(lead_time), None) >= safety);
        }

        /// Computed reorder quantities never fall below the minimum
        #[test]
        fn prop_reorder_quantity_floor(avg in demand_strategy()) {
            let p = policy();
            prop_assert!(reorder_quantity(&p, avg, None) >= p.min_reorder_quantity);
        }

        /// A positive manual quantity always wins
        #[test]
        fn prop_manual_quantity_wins(
            avg in demand_strategy(),
            manual in 1i32..=10_000
        ) {
            let p = policy();
            prop_assert_eq!(reorder_quantity(&p, avg, Some(manual)), manual);
        }

        /// Idempotence: two calls with unchanged inputs are identical
        #[test]
        fn prop_calculator_idempotent(
            avg in demand_strategy(),
            lead_time in lead_time_strategy(),
            stored_safety in proptest::option::of(0i32..=500)
        ) {
            let p = policy();
            prop_assert_eq!(
                reorder_point(&p, avg, Some(lead_time), stored_safety),
                reorder_point(&p, avg, Some(lead_time), stored_safety)
            );
        }

        /// Zero stock is always critical under both classifiers
        #[test]
        fn prop_zero_stock_is_critical(safety in 0i32..=500) {
            let p = policy();
            prop_assert_eq!(classify_urgency(0, safety), Urgency::Critical);
            prop_assert_eq!(classify_urgency_fixed(&p, 0), Urgency::Critical);
        }

        /// The demand average is bounded by the raw total
        #[test]
        fn prop_average_bounded(total in 0i64..=1_000_000) {
            let avg = average_monthly_sales(total, 3);
            prop_assert!(avg >= Decimal::ZERO);
            prop_assert!(avg <= Decimal::from(total));
        }
    }
}
