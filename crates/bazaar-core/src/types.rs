//! # Domain Types
//!
//! The shapes the product form works with.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  User-entered                        Derived                            │
//! │  ┌──────────────────┐                ┌──────────────────────────────┐  │
//! │  │ OptionDefinition │  Cartesian     │ Variant                      │  │
//! │  │  option_id       │  product ───►  │  key ("Red|S")               │  │
//! │  │  name ("Color")  │                │  combination {Color: Red,    │  │
//! │  │  values ─────────┼─► OptionValue  │               Size: S}       │  │
//! │  └──────────────────┘    value_id    │  quantity ("0")              │  │
//! │                          label       │  price ("12.50")             │  │
//! │                                      └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Rules
//! - A variant is identified by its [`CombinationKey`]: the chosen value
//!   labels, in option order, joined with [`KEY_SEPARATOR`].
//! - Option names are NOT part of the key, so renaming an option keeps
//!   every variant's quantity and price.
//! - `option_id`, `value_id` and `variant_id` are persisted identities that
//!   only round-trip to the backend. They never take part in key computation.

use std::borrow::Borrow;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;
use crate::KEY_SEPARATOR;

// =============================================================================
// Option Value
// =============================================================================

/// One candidate value of an option (e.g. "Red" for "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionValue {
    /// Persisted identity, present when editing a saved product.
    #[serde(default)]
    pub value_id: Option<String>,

    /// Display label, unique within its option.
    pub label: String,
}

impl OptionValue {
    /// Creates a freshly entered value (no persisted identity).
    pub fn new(label: impl Into<String>) -> Self {
        OptionValue {
            value_id: None,
            label: label.into(),
        }
    }
}

// =============================================================================
// Option Definition
// =============================================================================

/// A named option with its ordered candidate values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionDefinition {
    /// Persisted identity, present when editing a saved product.
    #[serde(default)]
    pub option_id: Option<String>,

    /// Option name as typed by the seller. May be empty while editing.
    pub name: String,

    /// Candidate values in insertion order.
    #[serde(default)]
    pub values: Vec<OptionValue>,
}

impl OptionDefinition {
    /// Creates an empty option slot.
    pub fn empty() -> Self {
        OptionDefinition::default()
    }

    /// Creates a named option from labels (handy for tests and fixtures).
    pub fn with_values<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionDefinition {
            option_id: None,
            name: name.into(),
            values: labels.into_iter().map(OptionValue::new).collect(),
        }
    }

    /// Whether this option takes part in variant generation:
    /// it needs a non-blank name and at least one value.
    pub fn is_qualifying(&self) -> bool {
        !self.name.trim().is_empty() && !self.values.is_empty()
    }

    /// Case-sensitive label lookup.
    pub fn has_label(&self, label: &str) -> bool {
        self.values.iter().any(|v| v.label == label)
    }

    /// Iterates over the value labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.label.as_str())
    }
}

// =============================================================================
// Combination Key
// =============================================================================

/// The sole identity of a variant: value labels joined by `|`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CombinationKey(String);

impl CombinationKey {
    /// Builds a key from labels in option order.
    ///
    /// ```rust
    /// use bazaar_core::CombinationKey;
    ///
    /// let key = CombinationKey::from_labels(["Red", "S"]);
    /// assert_eq!(key.as_str(), "Red|S");
    /// ```
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut key = String::new();
        for (i, label) in labels.into_iter().enumerate() {
            if i > 0 {
                key.push_str(KEY_SEPARATOR);
            }
            key.push_str(label);
        }
        CombinationKey(key)
    }

    /// Wraps a key string received from outside (e.g. a saved variant).
    pub fn from_raw(key: impl Into<String>) -> Self {
        CombinationKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for CombinationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Combination
// =============================================================================

/// Ordered option-name → value-label pairs of one variant.
///
/// Serialized as a JSON object in option order:
/// `{"Color":"Red","Size":"S"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Combination {
    entries: Vec<(String, String)>,
}

impl Combination {
    pub fn new() -> Self {
        Combination::default()
    }

    /// Appends a pair. A repeated option name replaces the earlier label,
    /// matching JSON object semantics.
    pub fn push(&mut self, option: impl Into<String>, label: impl Into<String>) {
        let option = option.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(name, _)| *name == option) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((option, label)),
        }
    }

    /// Label chosen for an option, if any.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, label)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, l)| (n.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key derived from the labels in stored order.
    pub fn key(&self) -> CombinationKey {
        CombinationKey::from_labels(self.entries.iter().map(|(_, l)| l.as_str()))
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, label) in &self.entries {
            map.serialize_entry(name, label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Combination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CombinationVisitor;

        impl<'de> Visitor<'de> for CombinationVisitor {
            type Value = Combination;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of option name to value label")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Combination, A::Error> {
                let mut combination = Combination::new();
                while let Some((name, label)) = access.next_entry::<String, String>()? {
                    combination.push(name, label);
                }
                Ok(combination)
            }
        }

        deserializer.deserialize_map(CombinationVisitor)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// One saleable point of the Cartesian product.
///
/// `quantity` and `price` stay strings because that is what the form
/// edits and submits. Parse them only where arithmetic happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    /// Persisted identity of a saved variant; carried forward on merge.
    #[serde(default)]
    pub variant_id: Option<String>,

    pub key: CombinationKey,

    #[ts(type = "Record<string, string>")]
    pub combination: Combination,

    /// Non-negative integer as typed, "0" for new combinations.
    pub quantity: String,

    /// Decimal as typed, base price for new combinations.
    pub price: String,
}

impl Variant {
    /// Stock of this variant. Blank, non-numeric and negative input count as 0.
    pub fn stock(&self) -> i64 {
        self.quantity
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|q| *q >= 0)
            .unwrap_or(0)
    }

    /// Price in cents, if the string is a valid decimal.
    pub fn price_money(&self) -> Option<Money> {
        Money::parse(&self.price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifying_option() {
        assert!(!OptionDefinition::empty().is_qualifying());
        assert!(!OptionDefinition::with_values("Color", Vec::<String>::new()).is_qualifying());
        assert!(!OptionDefinition::with_values("   ", ["Red"]).is_qualifying());
        assert!(OptionDefinition::with_values("Color", ["Red"]).is_qualifying());
    }

    #[test]
    fn test_key_from_labels() {
        assert_eq!(CombinationKey::from_labels(["Red", "S"]).as_str(), "Red|S");
        assert_eq!(CombinationKey::from_labels(["Red"]).as_str(), "Red");
        assert_eq!(CombinationKey::from_labels(Vec::<&str>::new()).as_str(), "");
    }

    #[test]
    fn test_combination_preserves_order_in_json() {
        let mut combination = Combination::new();
        combination.push("Size", "M");
        combination.push("Color", "Blue");

        let json = serde_json::to_string(&combination).unwrap();
        assert_eq!(json, r#"{"Size":"M","Color":"Blue"}"#);

        let back: Combination = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key().as_str(), "M|Blue");
        assert_eq!(back.get("Color"), Some("Blue"));
    }

    #[test]
    fn test_combination_repeated_name_replaces() {
        let mut combination = Combination::new();
        combination.push("Color", "Red");
        combination.push("Color", "Blue");
        assert_eq!(combination.len(), 1);
        assert_eq!(combination.get("Color"), Some("Blue"));
    }

    #[test]
    fn test_variant_stock_parsing() {
        let mut variant = Variant {
            variant_id: None,
            key: CombinationKey::from_raw("Red"),
            combination: Combination::new(),
            quantity: "5".to_string(),
            price: "9.99".to_string(),
        };
        assert_eq!(variant.stock(), 5);
        assert_eq!(variant.price_money().map(|m| m.cents()), Some(999));

        variant.quantity = "abc".to_string();
        assert_eq!(variant.stock(), 0);
        variant.quantity = "-4".to_string();
        assert_eq!(variant.stock(), 0);
        variant.quantity = String::new();
        assert_eq!(variant.stock(), 0);
    }
}
