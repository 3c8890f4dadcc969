//! # Variant Summary
//!
//! Display figures derived from the variant list: how many variants,
//! total stock, and the price range shown on listing cards
//! ("$12.00 – $18.50").

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::variants::VariantSet;

/// Derived figures; never stored, never submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VariantSummary {
    pub variant_count: usize,

    /// Sum of quantities, unparsable ones counting as zero.
    pub total_stock: i64,

    /// Lowest parsable price, `None` when no price parses.
    pub min_price: Option<Money>,

    /// Highest parsable price, `None` when no price parses.
    pub max_price: Option<Money>,
}

impl VariantSummary {
    /// Whether every variant with a valid price costs the same.
    pub fn has_single_price(&self) -> bool {
        self.min_price == self.max_price
    }
}

impl From<&VariantSet> for VariantSummary {
    fn from(variants: &VariantSet) -> Self {
        let prices = variants.iter().filter_map(|v| v.price_money());
        let (min_price, max_price) = prices.fold((None::<Money>, None::<Money>), |(lo, hi), p| {
            (
                Some(lo.map_or(p, |l| l.min(p))),
                Some(hi.map_or(p, |h| h.max(p))),
            )
        });

        VariantSummary {
            variant_count: variants.len(),
            total_stock: variants.total_stock(),
            min_price,
            max_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionDefinition;
    use crate::variants::recompute;
    use crate::DEFAULT_MAX_VARIANTS;

    fn sizes() -> VariantSet {
        let options = vec![OptionDefinition::with_values("Size", ["S", "M", "L"])];
        recompute(&options, &VariantSet::new(), "12", DEFAULT_MAX_VARIANTS)
            .unwrap()
            .0
    }

    #[test]
    fn test_price_range_and_stock() {
        let mut set = sizes();
        set.update_price("M", "18.50").unwrap();
        set.update_price("L", "not a price").unwrap();
        set.update_quantity("S", "4").unwrap();
        set.update_quantity("M", "6").unwrap();

        let summary = VariantSummary::from(&set);
        assert_eq!(summary.variant_count, 3);
        assert_eq!(summary.total_stock, 10);
        assert_eq!(summary.min_price, Some(Money::from_cents(1200)));
        assert_eq!(summary.max_price, Some(Money::from_cents(1850)));
        assert!(!summary.has_single_price());
    }

    #[test]
    fn test_empty_set() {
        let summary = VariantSummary::from(&VariantSet::new());
        assert_eq!(summary.variant_count, 0);
        assert_eq!(summary.total_stock, 0);
        assert_eq!(summary.min_price, None);
        assert!(summary.has_single_price());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(VariantSummary::from(&sizes())).unwrap();
        assert_eq!(json["variantCount"], 3);
        assert_eq!(json["minPrice"], 1200);
    }
}
