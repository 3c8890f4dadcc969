//! # Variant Reconciler
//!
//! Derives the full variant list from the option snapshot and merges
//! previously entered quantities and prices forward by key.
//!
//! ## Recompute Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  options: [Color: Red, Blue] [Size: S, M] [(blank): X]                  │
//! │       │                                                                 │
//! │       ▼  1. keep qualifying options (name + ≥1 value)                   │
//! │  [Color: Red, Blue] [Size: S, M]                                        │
//! │       │                                                                 │
//! │       ▼  2. Cartesian product, first option varies slowest              │
//! │  Red/S  Red/M  Blue/S  Blue/M                                           │
//! │       │                                                                 │
//! │       ▼  3. key = labels joined by '|'                                  │
//! │  "Red|S" "Red|M" "Blue|S" "Blue|M"                                      │
//! │       │                                                                 │
//! │       ▼  4. merge by key with previous variants                         │
//! │  known key  → keep quantity, price, variant_id                          │
//! │  new key    → quantity "0", price = base price (or "0")                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recomputation is a pure, synchronous function of its inputs. Keys that
//! no longer exist are dropped along with their data; nothing migrates.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::types::{Combination, CombinationKey, OptionDefinition, Variant};

/// Quantity given to combinations that were not known before.
pub const DEFAULT_QUANTITY: &str = "0";

// =============================================================================
// Variant Set
// =============================================================================

/// Ordered variants with a key index.
///
/// ## Invariants
/// - Keys are unique
/// - `index[key]` is the position of that key in `variants`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    variants: Vec<Variant>,
    index: HashMap<CombinationKey, usize>,
}

impl VariantSet {
    pub fn new() -> Self {
        VariantSet::default()
    }

    /// Builds a set from already-keyed variants (e.g. saved ones).
    ///
    /// When a key repeats, the first occurrence wins.
    pub fn from_variants(variants: impl IntoIterator<Item = Variant>) -> Self {
        let mut set = VariantSet::new();
        for variant in variants {
            if set.index.contains_key(&variant.key) {
                debug!(key = %variant.key, "Skipping repeated variant key");
                continue;
            }
            set.index.insert(variant.key.clone(), set.variants.len());
            set.variants.push(variant);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn as_slice(&self) -> &[Variant] {
        &self.variants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.variants.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.index.get(key).map(|&i| &self.variants[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CombinationKey> {
        self.variants.iter().map(|v| &v.key)
    }

    pub fn into_vec(self) -> Vec<Variant> {
        self.variants
    }

    /// Replaces the quantity of one variant. Order and every other
    /// variant stay untouched. Numeric checks belong to validation.
    pub fn update_quantity(&mut self, key: &str, quantity: impl Into<String>) -> CoreResult<()> {
        self.get_mut(key)?.quantity = quantity.into();
        Ok(())
    }

    /// Replaces the price of one variant. Same rules as [`Self::update_quantity`].
    pub fn update_price(&mut self, key: &str, price: impl Into<String>) -> CoreResult<()> {
        self.get_mut(key)?.price = price.into();
        Ok(())
    }

    /// Sum of all variant quantities; blank or non-numeric entries count as 0.
    /// Saturates at `i64::MAX`.
    pub fn total_stock(&self) -> i64 {
        self.variants
            .iter()
            .fold(0i64, |total, v| total.saturating_add(v.stock()))
    }

    fn get_mut(&mut self, key: &str) -> CoreResult<&mut Variant> {
        match self.index.get(key) {
            Some(&i) => Ok(&mut self.variants[i]),
            None => Err(CoreError::VariantNotFound(key.to_string())),
        }
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// What one recomputation did with the previous variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// Keys that existed before and still exist (data kept).
    pub carried: usize,
    /// Keys that appeared (defaults applied).
    pub created: usize,
    /// Keys that disappeared (data discarded).
    pub dropped: usize,
}

/// Number of variants the qualifying options would produce.
///
/// Returns `Some(0)` when nothing qualifies and `None` on overflow.
pub fn variant_count(options: &[OptionDefinition]) -> Option<usize> {
    let mut qualifying = options.iter().filter(|o| o.is_qualifying()).peekable();
    if qualifying.peek().is_none() {
        return Some(0);
    }
    qualifying.try_fold(1usize, |acc, o| acc.checked_mul(o.values.len()))
}

/// Generates every combination of the qualifying options.
///
/// Order matches a nested loop over the options as listed: the first
/// option varies slowest, the last varies fastest.
///
/// ## Example
/// ```rust
/// use bazaar_core::types::OptionDefinition;
/// use bazaar_core::variants::combinations;
///
/// let options = vec![
///     OptionDefinition::with_values("Color", ["Red", "Blue"]),
///     OptionDefinition::with_values("Size", ["S", "M"]),
/// ];
/// let keys: Vec<String> = combinations(&options)
///     .iter()
///     .map(|c| c.key().into_string())
///     .collect();
/// assert_eq!(keys, ["Red|S", "Red|M", "Blue|S", "Blue|M"]);
/// ```
pub fn combinations(options: &[OptionDefinition]) -> Vec<Combination> {
    let groups: Vec<&OptionDefinition> = options.iter().filter(|o| o.is_qualifying()).collect();
    if groups.is_empty() {
        return Vec::new();
    }

    let mut result = vec![Combination::new()];
    for group in groups {
        let mut next = Vec::with_capacity(result.len() * group.values.len());
        for partial in &result {
            for label in group.labels() {
                let mut combination = partial.clone();
                combination.push(group.name.clone(), label);
                next.push(combination);
            }
        }
        result = next;
    }
    result
}

/// Rebuilds the variant set from `options`, merging `previous` by key.
///
/// ## Arguments
/// * `options` - current option snapshot, in display order
/// * `previous` - variants before the change
/// * `base_price` - product price for new keys; blank means `"0"`
/// * `max_variants` - upper bound on the product size
///
/// Options built outside [`crate::options::OptionSet`] may repeat a label
/// or contain the separator, so two combinations can share a key. Only the
/// first of them becomes a variant.
///
/// ## Errors
/// `TooManyVariants` when the product would exceed `max_variants`
/// (including arithmetic overflow). Nothing else can fail.
pub fn recompute(
    options: &[OptionDefinition],
    previous: &VariantSet,
    base_price: &str,
    max_variants: usize,
) -> CoreResult<(VariantSet, Reconciliation)> {
    let count = variant_count(options).ok_or(CoreError::TooManyVariants {
        count: usize::MAX,
        max: max_variants,
    })?;
    if count > max_variants {
        return Err(CoreError::TooManyVariants {
            count,
            max: max_variants,
        });
    }

    let default_price = match base_price.trim() {
        "" => "0",
        _ => base_price,
    };

    let mut next = VariantSet {
        variants: Vec::with_capacity(count),
        index: HashMap::with_capacity(count),
    };
    let mut report = Reconciliation::default();

    for combination in combinations(options) {
        let key = combination.key();
        if next.index.contains_key(&key) {
            debug!(key = %key, "Skipping combination with a repeated key");
            continue;
        }
        let variant = match previous.get(key.as_str()) {
            Some(known) => {
                report.carried += 1;
                Variant {
                    variant_id: known.variant_id.clone(),
                    key,
                    combination,
                    quantity: known.quantity.clone(),
                    price: known.price.clone(),
                }
            }
            None => {
                report.created += 1;
                Variant {
                    variant_id: None,
                    key,
                    combination,
                    quantity: DEFAULT_QUANTITY.to_string(),
                    price: default_price.to_string(),
                }
            }
        };
        next.index.insert(variant.key.clone(), next.variants.len());
        next.variants.push(variant);
    }
    report.dropped = previous.len().saturating_sub(report.carried);

    debug!(
        variants = next.len(),
        carried = report.carried,
        created = report.created,
        dropped = report.dropped,
        "Recomputed variants"
    );
    if report.dropped > 0 {
        if next.is_empty() {
            warn!(
                dropped = report.dropped,
                "No qualifying options left, variant quantities and prices discarded"
            );
        } else {
            warn!(
                dropped = report.dropped,
                "Combinations no longer exist, their quantities and prices discarded"
            );
        }
    }

    Ok((next, report))
}

// =============================================================================
// Unit Tests
// =============================================================================
