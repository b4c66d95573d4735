//! Purchase order generation tests
//!
//! Covers invoice numbering, unit-cost estimation, and the order-total
//! invariant: `total_amount == Σ(quantity × unit_cost)` with checked
//! arithmetic, where any unrepresentable or negative cost aborts the whole
//! operation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{
    estimate_unit_cost, format_invoice_number, line_total, next_invoice_number, order_total,
    parse_invoice_number, ReplenishmentPolicy,
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

    /// Invoice numbers are zero-padded to six digits
    #[test]
    fn test_invoice_number_format() {
        assert_eq!(format_invoice_number(1), "PO-000001");
        assert_eq!(format_invoice_number(42), "PO-000042");
        assert_eq!(format_invoice_number(999_999), "PO-999999");
        // Wider sequences keep all their digits
        assert_eq!(format_invoice_number(1_000_000), "PO-1000000");
    }

    /// The sequence increments from the most recent number
    #[test]
    fn test_invoice_number_increments() {
        assert_eq!(
            next_invoice_number(Some("PO-000042")).as_deref(),
            Some("PO-000043")
        );
    }

    /// With no prior order the sequence starts at 1
    #[test]
    fn test_invoice_number_starts_at_one() {
        assert_eq!(next_invoice_number(None).as_deref(), Some("PO-000001"));
    }

    /// A legacy number that does not parse is a data error, not a restart
    #[test]
    fn test_unparseable_invoice_number_rejected() {
        assert_eq!(next_invoice_number(Some("INV-000042")), None);
        assert_eq!(next_invoice_number(Some("PO-12x4")), None);
        assert_eq!(next_invoice_number(Some("PO-")), None);
        assert_eq!(parse_invoice_number("garbage"), None);
    }

    /// Scenario: no cost price, price 20.00, quantity 30
    /// unit cost = 20.00 * 0.6 = 12.00, line total = 360.00
    #[test]
    fn test_cost_fallback_scenario() {
        let policy = ReplenishmentPolicy::default();
        let unit_cost = estimate_unit_cost(None, dec("20.00"), policy.cost_ratio_estimate)
            .expect("cost should be representable");
        assert_eq!(unit_cost, dec("12.00"));

        let total = line_total(30, unit_cost).expect("total should be representable");
        assert_eq!(total, dec("360.00"));
    }

    /// A stored cost price is used as-is
    #[test]
    fn test_stored_cost_price_wins() {
        let policy = ReplenishmentPolicy::default();
        let unit_cost =
            estimate_unit_cost(Some(dec("8.50")), dec("20.00"), policy.cost_ratio_estimate);
        assert_eq!(unit_cost, Some(dec("8.50")));
    }

    /// Negative inputs are fatal preconditions, never silently defaulted
    #[test]
    fn test_negative_costs_rejected() {
        let ratio = Decimal::new(6, 1);
        assert_eq!(estimate_unit_cost(Some(dec("-1")), dec("20"), ratio), None);
        assert_eq!(line_total(-1, dec("12.00")), None);
        assert_eq!(line_total(5, dec("-0.01")), None);
    }

    /// Overflowing arithmetic is caught instead of wrapping
    #[test]
    fn test_cost_overflow_rejected() {
        assert_eq!(line_total(i32::MAX, Decimal::MAX), None);
        assert_eq!(order_total(vec![Decimal::MAX, Decimal::MAX]), None);
    }

    /// The order total is exactly the sum of line totals
    #[test]
    fn test_order_total_invariant() {
        let lines = vec![
            line_total(30, dec("12.00")).unwrap(),
            line_total(5, dec("8.50")).unwrap(),
            line_total(12, dec("0.99")).unwrap(),
        ];
        let expected = dec("360.00") + dec("42.50") + dec("11.88");
        assert_eq!(order_total(lines), Some(expected));
    }

    /// An empty purchase has a zero total
    #[test]
    fn test_empty_order_total_is_zero() {
        assert_eq!(order_total(Vec::new()), Some(Decimal::ZERO));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for valid unit costs (0.01 to 10000.00)
    fn cost_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for valid quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=10_000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Formatting then parsing an invoice number is lossless
        #[test]
        fn prop_invoice_number_round_trip(sequence in 1i64..=100_000_000) {
            let formatted = format_invoice_number(sequence);
            prop_assert_eq!(parse_invoice_number(&formatted), Some(sequence));
        }

        /// The next invoice number is always exactly one higher
        #[test]
        fn prop_invoice_number_monotonic(sequence in 1i64..=100_000_000) {
            let current = format_invoice_number(sequence);
            let next = next_invoice_number(Some(&current)).unwrap();
            prop_assert_eq!(parse_invoice_number(&next), Some(sequence + 1));
        }

        /// A line total is exactly quantity times unit cost
        #[test]
        fn prop_line_total_exact(
            quantity in quantity_strategy(),
            unit_cost in cost_strategy()
        ) {
            let total = line_total(quantity, unit_cost).unwrap();
            prop_assert_eq!(total, unit_cost * Decimal::from(quantity));
        }

        /// The order total equals the sum of its line totals exactly
        #[test]
        fn prop_order_total_is_sum(
            lines in prop::collection::vec(
                (quantity_strategy(), cost_strategy()),
                1..20
            )
        ) {
            let totals: Vec<Decimal> = lines
                .iter()
                .map(|(quantity, unit_cost)| line_total(*quantity, *unit_cost).unwrap())
                .collect();

            let expected: Decimal = totals.iter().copied().sum();
            prop_assert_eq!(order_total(totals), Some(expected));
        }

        /// The fallback estimate scales the price by the cost ratio
        #[test]
        fn prop_fallback_cost_is_price_ratio(price in cost_strategy()) {
            let ratio = ReplenishmentPolicy::default().cost_ratio_estimate;
            let unit_cost = estimate_unit_cost(None, price, ratio).unwrap();
            prop_assert_eq!(unit_cost, price * ratio);
        }

        /// A stored cost price is always returned unchanged
        #[test]
        fn prop_stored_cost_wins(
            cost in cost_strategy(),
            price in cost_strategy()
        ) {
            let ratio = ReplenishmentPolicy::default().cost_ratio_estimate;
            prop_assert_eq!(estimate_unit_cost(Some(cost), price, ratio), Some(cost));
        }
    }
}
