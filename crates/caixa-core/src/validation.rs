//! # Validation Module
//!
//! Input validation for store actions.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store actions (THIS MODULE)                                  │
//! │  ├── Entity invariants re-checked before any remote write              │
//! │  └── Line items resolved against the snapshot                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend constraints                                          │
//! │  └── NOT NULL / CHECK / foreign keys on the hosted store               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{AppState, SaleLine};

/// Maximum length for product names and token names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a free-text description. May be empty.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates an expense description.
///
/// ## Rules
/// - Must not be empty (an expense with no description is unreadable in reports)
/// - Must be at most 500 characters
pub fn validate_expense_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates a payment-method or tag token name.
pub fn validate_token_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaway items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an expense amount in centavos.
///
/// ## Rules
/// - Must be positive (> 0); a zero expense is a data-entry mistake
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a line-item quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a recurrence day for a recurring fixed expense.
///
/// The day is only meaningful when `category == Fixed && is_recurring`,
/// but whenever supplied it must be a real day of month (1-31).
pub fn validate_recurrence_day(recurrence_day: Option<u8>) -> ValidationResult<()> {
    if let Some(day) = recurrence_day {
        if !(1..=31).contains(&day) {
            return Err(ValidationError::OutOfRange {
                field: "recurrence day".to_string(),
                min: 1,
                max: 31,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Line-Item Validators
// =============================================================================

/// Validates a sale's line items against the current snapshot.
///
/// ## Rules
/// - At least one line item
/// - Every quantity ≥ 1
/// - Every product id resolvable in the snapshot
///
/// This runs inside the store actions, before any remote write: sale rows
/// referencing unknown products never leave the process.
pub fn validate_line_items(state: &AppState, items: &[SaleLine]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::NoLineItems);
    }

    for line in items {
        validate_quantity(line.quantity)?;

        if state.product(&line.product_id).is_none() {
            return Err(ValidationError::UnknownProduct {
                product_id: line.product_id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::types::Product;

    fn state_with_product(id: &str) -> AppState {
        let mut state = AppState::default();
        state.products.push(Product {
            id: id.to_string(),
            user_id: None,
            name: "Coxinha".to_string(),
            description: String::new(),
            price_cents: 500,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        state
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coxinha de frango").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents(1).is_ok());
        assert!(validate_amount_cents(0).is_err());
        assert!(validate_amount_cents(-500).is_err());
    }

    #[test]
    fn test_validate_recurrence_day() {
        assert!(validate_recurrence_day(Some(5)).is_ok());
        assert!(validate_recurrence_day(Some(31)).is_ok());
        assert!(validate_recurrence_day(Some(0)).is_err());
        assert!(validate_recurrence_day(Some(32)).is_err());
        assert!(validate_recurrence_day(None).is_ok());
    }

    #[test]
    fn test_validate_line_items() {
        let state = state_with_product("p1");

        let ok = vec![SaleLine {
            product_id: "p1".to_string(),
            quantity: 2,
        }];
        assert!(validate_line_items(&state, &ok).is_ok());

        assert!(matches!(
            validate_line_items(&state, &[]),
            Err(ValidationError::NoLineItems)
        ));

        let zero_qty = vec![SaleLine {
            product_id: "p1".to_string(),
            quantity: 0,
        }];
        assert!(validate_line_items(&state, &zero_qty).is_err());

        let unknown = vec![SaleLine {
            product_id: "ghost".to_string(),
            quantity: 1,
        }];
        assert!(matches!(
            validate_line_items(&state, &unknown),
            Err(ValidationError::UnknownProduct { .. })
        ));
    }
}
