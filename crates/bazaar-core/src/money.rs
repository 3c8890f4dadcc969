//! # Money Module
//!
//! Integer-cents arithmetic for the string-typed prices the product form
//! carries.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  parseFloat("0.10") + parseFloat("0.20") = 0.30000000000000004  ❌      │
//! │                                                                         │
//! │  OUR SOLUTION: parse the decimal string straight into cents             │
//! │    "0.10" → 10 cents, "0.20" → 20 cents, compared as integers          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices stay strings at the form boundary. They only become `Money` at the
//! point where something is computed from them (validation, price range).
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::parse("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//! assert_eq!(price.to_string(), "10.99");
//!
//! // More than two decimals is not a price
//! assert!(Money::parse("1.999").is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Variant.price ("12.50") ──► Money::parse ──┬──► validation (>= 0)
///                                            └──► VariantSummary min/max
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal price string into cents.
    ///
    /// ## Accepted
    /// - `"12"`, `"12.5"`, `"12.50"`, `".5"`, `"12."`
    /// - Optional leading `+` or `-`, surrounding whitespace
    ///
    /// ## Rejected (returns `None`)
    /// - Empty input, `"."`, more than two decimal places
    /// - Anything that is not ASCII digits around a single dot
    /// - Values that overflow `i64` cents
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::parse("12.5").map(|m| m.cents()), Some(1250));
    /// assert_eq!(Money::parse("-3").map(|m| m.cents()), Some(-300));
    /// assert_eq!(Money::parse("abc"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Money> {
        let s = input.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let major: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };

        let cents = major.checked_mul(100)?.checked_add(minor)?;
        Some(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal form (`"12.50"`), the same shape the form fields carry.
/// No currency symbol: the product form is currency-agnostic.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(Money::parse("12").unwrap().cents(), 1200);
        assert_eq!(Money::parse("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse("12.50").unwrap().cents(), 1250);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("12.").unwrap().cents(), 1200);
        assert_eq!(Money::parse("  0.99 ").unwrap().cents(), 99);
        assert_eq!(Money::parse("+7").unwrap().cents(), 700);
        assert_eq!(Money::parse("-5.50").unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_rejected_forms() {
        assert!(Money::parse("").is_none());
        assert!(Money::parse("   ").is_none());
        assert!(Money::parse(".").is_none());
        assert!(Money::parse("1.999").is_none());
        assert!(Money::parse("1.2.3").is_none());
        assert!(Money::parse("12abc").is_none());
        assert!(Money::parse("1e3").is_none());
        assert!(Money::parse("99999999999999999999").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_negative_and_ordering() {
        assert!(!Money::from_cents(0).is_negative());
        assert!(Money::from_cents(-1).is_negative());
        assert!(Money::parse("0.10").unwrap() < Money::parse("0.2").unwrap());
    }
}
