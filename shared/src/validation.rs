//! Validation utilities for the Wholesale Storefront Platform

use rust_decimal::Decimal;

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate SKU format (3-32 chars, uppercase alphanumeric plus `-`)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("SKU must be uppercase alphanumeric (dashes allowed)");
    }
    Ok(())
}

/// Validate a monetary amount (non-negative)
pub fn validate_money(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate an order/purchase quantity (strictly positive)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate phone number format (7-15 digits, optional leading `+`)
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let trimmed = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if digits.len() < 7 || digits.len() > 15 {
        return Err("Phone number must be 7-15 digits");
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must contain only digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sku() {
        assert!(validate_sku("EDV-00123").is_ok());
        assert!(validate_sku("ABC").is_ok());
    }

    #[test]
    fn test_invalid_sku() {
        assert!(validate_sku("ab").is_err());
        assert!(validate_sku("lowercase-sku").is_err());
        assert!(validate_sku("HAS SPACE").is_err());
    }

    #[test]
    fn test_money_validation() {
        assert!(validate_money(Decimal::ZERO).is_ok());
        assert!(validate_money(Decimal::from(100)).is_ok());
        assert!(validate_money(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_quantity_validation() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("+593 2 234-5678").is_ok());
        assert!(validate_phone("0991234567").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("not-a-phone").is_err());
    }
}
