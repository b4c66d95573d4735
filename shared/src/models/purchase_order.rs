//! Purchase order models and invoice-number helpers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice number prefix, e.g. `PO-000042`
pub const INVOICE_PREFIX: &str = "PO-";

/// Digits in the zero-padded invoice number suffix
pub const INVOICE_DIGITS: usize = 6;

/// Lifecycle status of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Pending,
    Received,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "PENDING",
            PurchaseOrderStatus::Received => "RECEIVED",
        }
    }
}

/// A purchase order against a supplier
///
/// Created `Pending`; an explicit receive action flips it to `Received` and
/// increments each referenced product's stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub invoice_number: String,
    pub supplier_id: Uuid,
    pub status: PurchaseOrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Format a sequence number as a zero-padded invoice number
pub fn format_invoice_number(sequence: i64) -> String {
    format!("{}{:0width$}", INVOICE_PREFIX, sequence, width = INVOICE_DIGITS)
}

/// Parse the numeric suffix of an invoice number
///
/// Returns `None` for anything that does not match `PO-<digits>`.
pub fn parse_invoice_number(invoice_number: &str) -> Option<i64> {
    let suffix = invoice_number.strip_prefix(INVOICE_PREFIX)?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Invoice number following the most recent one, starting at 1 when there is
/// no prior order
///
/// Returns `None` when the prior number cannot be parsed; callers treat that
/// as a data error rather than silently restarting the sequence.
pub fn next_invoice_number(last: Option<&str>) -> Option<String> {
    match last {
        None => Some(format_invoice_number(1)),
        Some(previous) => parse_invoice_number(previous)
            .map(|sequence| format_invoice_number(sequence + 1)),
    }
}

/// Unit cost for a purchase line: the product's cost price when set, else
/// the sale price scaled by the configured cost ratio
///
/// `None` signals a cost that cannot be represented (overflow) or a negative
/// input; both are fatal preconditions for the whole purchase operation.
pub fn estimate_unit_cost(
    cost_price: Option<Decimal>,
    price: Decimal,
    cost_ratio: Decimal,
) -> Option<Decimal> {
    let unit_cost = match cost_price {
        Some(cost) => cost,
        None => price.checked_mul(cost_ratio)?,
    };
    if unit_cost < Decimal::ZERO {
        return None;
    }
    Some(unit_cost)
}

/// Line total with checked arithmetic
pub fn line_total(quantity: i32, unit_cost: Decimal) -> Option<Decimal> {
    if quantity < 0 || unit_cost < Decimal::ZERO {
        return None;
    }
    unit_cost.checked_mul(Decimal::from(quantity))
}

/// Order total as a checked sum of line totals
pub fn order_total<I>(line_totals: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    line_totals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn invoice_numbers_are_zero_padded() {
        assert_eq!(format_invoice_number(1), "PO-000001");
        assert_eq!(format_invoice_number(42), "PO-000042");
        assert_eq!(format_invoice_number(1_234_567), "PO-1234567");
    }

    #[test]
    fn invoice_sequence_increments() {
        assert_eq!(next_invoice_number(None).as_deref(), Some("PO-000001"));
        assert_eq!(
            next_invoice_number(Some("PO-000042")).as_deref(),
            Some("PO-000043")
        );
        assert_eq!(next_invoice_number(Some("INV-9")), None);
        assert_eq!(next_invoice_number(Some("PO-12x4")), None);
    }

    #[test]
    fn unit_cost_falls_back_to_price_ratio() {
        let price = Decimal::from_str("20.00").unwrap();
        let ratio = Decimal::new(6, 1);
        assert_eq!(
            estimate_unit_cost(None, price, ratio),
            Some(Decimal::from_str("12.000").unwrap())
        );
        assert_eq!(
            estimate_unit_cost(Some(Decimal::from(8)), price, ratio),
            Some(Decimal::from(8))
        );
        assert_eq!(estimate_unit_cost(Some(Decimal::from(-1)), price, ratio), None);
    }

    #[test]
    fn line_and_order_totals() {
        let unit = Decimal::from_str("12.00").unwrap();
        assert_eq!(line_total(30, unit), Some(Decimal::from_str("360.00").unwrap()));
        assert_eq!(line_total(-1, unit), None);

        let total = order_total(vec![Decimal::from(100), Decimal::from(260)]);
        assert_eq!(total, Some(Decimal::from(360)));
    }
}
