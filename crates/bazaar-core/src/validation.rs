//! # Validation Module
//!
//! Pre-submit checks on the product form output.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Entry (OptionSet)                                            │
//! │  └── blank / duplicate / separator labels never enter the form         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission (THIS MODULE)                                     │
//! │  ├── quantity: integer >= 0                                            │
//! │  ├── price: decimal >= 0, two places max                               │
//! │  └── variant key present, option names unique                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Server                                                        │
//! │  └── same rules again, plus identity checks                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Variant quantity and price stay free text while the seller types; this
//! module is where they are parsed.

use std::collections::HashSet;

use crate::boundary::ProductSubmission;
use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a variant quantity string and returns its value.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity("quantity", " 12 "), Ok(12));
/// assert!(validate_quantity("quantity", "-1").is_err());
/// assert!(validate_quantity("quantity", "1.5").is_err());
/// ```
pub fn validate_quantity(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if qty < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(qty)
}

/// Validates a variant price string and returns it as [`Money`].
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_price;
///
/// assert_eq!(validate_price("price", "19.99").unwrap().cents(), 1999);
/// assert!(validate_price("price", "0").is_ok());     // free item
/// assert!(validate_price("price", "-2").is_err());
/// assert!(validate_price("price", "1.234").is_err());
/// ```
pub fn validate_price(field: &str, raw: &str) -> ValidationResult<Money> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let price = Money::parse(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a decimal with at most two places".to_string(),
    })?;

    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(price)
}

// =============================================================================
// Submission Validator
// =============================================================================

/// Checks a whole submission and returns every problem found.
///
/// An empty vector means the submission is ready to send.
pub fn validate_submission(submission: &ProductSubmission) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for (i, option) in submission.options.iter().enumerate() {
        let name = option.option_name.trim();
        if name.is_empty() {
            errors.push(ValidationError::Required {
                field: format!("options[{i}].option_name"),
            });
        } else if !names.insert(name) {
            errors.push(ValidationError::Duplicate {
                field: "option name".to_string(),
                value: name.to_string(),
            });
        }
    }

    for (i, variant) in submission.variants.iter().enumerate() {
        if variant.variant_key.trim().is_empty() {
            errors.push(ValidationError::Required {
                field: format!("variants[{i}].variant_key"),
            });
        }
        if let Err(err) = validate_quantity(&format!("variants[{i}].quantity"), &variant.quantity) {
            errors.push(err);
        }
        if let Err(err) = validate_price(&format!("variants[{i}].price"), &variant.price) {
            errors.push(err);
        }
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================
