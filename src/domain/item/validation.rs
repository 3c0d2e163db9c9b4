//! Item field validation rules

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation errors for item fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemValidationError {
    #[error("Item name is required and cannot exceed 50 characters")]
    NameLength,

    #[error("Price must not be negative")]
    NegativePrice,
}

/// Validate an item name: non-empty, at most 50 characters.
pub fn validate_item_name(name: &str) -> Result<(), ItemValidationError> {
    let len = name.chars().count();
    if len == 0 || len > 50 {
        return Err(ItemValidationError::NameLength);
    }
    Ok(())
}

/// Validate a price: zero or positive.
pub fn validate_price(price: Decimal) -> Result<(), ItemValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ItemValidationError::NegativePrice);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_item_name() {
        assert!(validate_item_name("Épée de Feu").is_ok());
        assert_eq!(validate_item_name(""), Err(ItemValidationError::NameLength));
        assert_eq!(
            validate_item_name(&"x".repeat(51)),
            Err(ItemValidationError::NameLength)
        );
    }

    #[test]
    fn test_price() {
        assert!(validate_price(dec!(0)).is_ok());
        assert!(validate_price(dec!(150.0)).is_ok());
        assert_eq!(
            validate_price(dec!(-1.0)),
            Err(ItemValidationError::NegativePrice)
        );
    }
}
