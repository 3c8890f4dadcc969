//! # Load and Submit Shapes
//!
//! Conversion between the product form state and the two shapes the
//! backend speaks: the saved product record (edit flow, inbound) and the
//! submission (both flows, outbound).
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GET product ──► ProductRecord ──► FormSession::from_record             │
//! │                   options[]          │ options (ids kept)               │
//! │                   variants[]         │ saved variants seed the merge    │
//! │                                      ▼                                  │
//! │                                 seller edits                            │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │  POST form ◄── form_fields() ◄── ProductSubmission                      │
//! │                "variants[0][quantity]"   qualifying options only        │
//! │                                          every variant, keyed           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Saved Data Quirks
//! - `variant_combination` is stored as JSON text and may arrive either as a
//!   string or as an already-decoded object.
//! - `quantity` and `price` may arrive as numbers or strings.
//! - Products saved by the direct variant editor carry variants but no
//!   option rows; options are then rebuilt from the variant combinations.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::config::FormConfig;
use crate::error::{CoreError, CoreResult};
use crate::session::FormSession;
use crate::types::{Combination, CombinationKey, OptionDefinition, OptionValue, Variant};
use crate::variants::{VariantSet, DEFAULT_QUANTITY};

// =============================================================================
// Inbound: saved product record
// =============================================================================

/// A JSON scalar that may be sent as a number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// A stored combination: JSON text or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CombinationField {
    Encoded(String),
    Object(Combination),
}

impl CombinationField {
    /// Decodes into a [`Combination`]. Blank text is an empty combination.
    pub fn decode(self) -> CoreResult<Combination> {
        match self {
            CombinationField::Object(combination) => Ok(combination),
            CombinationField::Encoded(text) if text.trim().is_empty() => Ok(Combination::new()),
            CombinationField::Encoded(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

/// Saved product as returned by the product endpoint.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductRecord {
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub product_price: Option<Scalar>,

    #[serde(default)]
    pub options: Vec<OptionRecord>,

    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct OptionRecord {
    #[serde(default)]
    pub option_id: Option<String>,

    #[serde(default)]
    pub option_name: String,

    #[serde(default, alias = "option_values")]
    pub values: Vec<OptionValueRecord>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct OptionValueRecord {
    #[serde(default)]
    pub value_id: Option<String>,

    #[serde(alias = "value")]
    pub option_value: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct VariantRecord {
    #[serde(default)]
    pub variant_id: Option<String>,

    #[serde(default)]
    pub variant_key: String,

    #[serde(default)]
    #[ts(type = "string | Record<string, string> | null")]
    pub variant_combination: Option<CombinationField>,

    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub quantity: Option<Scalar>,

    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub price: Option<Scalar>,
}

impl VariantRecord {
    /// Turns a saved variant into a merge seed.
    ///
    /// Missing quantity becomes "0"; missing price falls back to the
    /// product price, then "0". A blank key is rebuilt from the combination.
    fn into_variant(self, base_price: &str) -> CoreResult<Variant> {
        let combination = match self.variant_combination {
            Some(field) => field.decode()?,
            None => Combination::new(),
        };

        let key = if self.variant_key.trim().is_empty() {
            combination.key()
        } else {
            CombinationKey::from_raw(self.variant_key)
        };

        let quantity = non_blank(self.quantity).unwrap_or_else(|| DEFAULT_QUANTITY.to_string());
        let price = non_blank(self.price).unwrap_or_else(|| match base_price.trim() {
            "" => "0".to_string(),
            _ => base_price.to_string(),
        });

        Ok(Variant {
            variant_id: self.variant_id,
            key,
            combination,
            quantity,
            price,
        })
    }
}

fn non_blank(value: Option<Scalar>) -> Option<String> {
    value.map(Scalar::into_text).filter(|s| !s.trim().is_empty())
}

/// Rebuilds option definitions from saved combinations: option names in
/// first-seen order, labels in first-seen order within each option.
fn options_from_combinations<'a>(
    combinations: impl IntoIterator<Item = &'a Combination>,
) -> Vec<OptionDefinition> {
    let mut options: Vec<OptionDefinition> = Vec::new();
    for combination in combinations {
        for (name, label) in combination.iter() {
            let position = match options.iter().position(|o| o.name == name) {
                Some(position) => position,
                None => {
                    options.push(OptionDefinition {
                        option_id: None,
                        name: name.to_string(),
                        values: Vec::new(),
                    });
                    options.len() - 1
                }
            };
            if !options[position].has_label(label) {
                options[position].values.push(OptionValue::new(label));
            }
        }
    }
    options
}

impl FormSession {
    /// Starts an edit-flow session from a saved product.
    ///
    /// ## Steps
    /// 1. Options are loaded in record order with their ids. Blank,
    ///    duplicate or separator-containing labels are dropped with a
    ///    warning. A repeated option name makes the record malformed.
    /// 2. Saved variants seed the merge, so their quantity, price and
    ///    `variant_id` survive wherever the key still exists.
    /// 3. Variants are recomputed once.
    ///
    /// A record without options starts with one empty slot.
    pub fn from_record(record: ProductRecord, config: FormConfig) -> CoreResult<Self> {
        let mut session = FormSession::new(config);
        session.base_price = record.product_price.map(Scalar::into_text).unwrap_or_default();

        let seeds = record
            .variants
            .into_iter()
            .map(|r| r.into_variant(&session.base_price))
            .collect::<CoreResult<Vec<_>>>()?;

        let definitions: Vec<OptionDefinition> = if record.options.is_empty() {
            options_from_combinations(seeds.iter().map(|v| &v.combination))
        } else {
            record
                .options
                .into_iter()
                .map(|o| OptionDefinition {
                    option_id: o.option_id,
                    name: o.option_name,
                    values: o
                        .values
                        .into_iter()
                        .map(|v| OptionValue {
                            value_id: v.value_id,
                            label: v.option_value,
                        })
                        .collect(),
                })
                .collect()
        };

        session.options.clear();
        for definition in definitions {
            let name = definition.name.clone();
            let skipped = session
                .options
                .push_definition(definition)
                .map_err(|err| CoreError::MalformedRecord {
                    reason: err.to_string(),
                })?;
            for err in skipped {
                warn!(option = %name, error = %err, "Dropped saved option value");
            }
        }
        session.options.ensure_slot();

        session.variants = VariantSet::from_variants(seeds);
        session.reconcile()?;

        debug!(
            options = session.options.len(),
            variants = session.variants.len(),
            carried = session.last_reconciliation.carried,
            dropped = session.last_reconciliation.dropped,
            "Loaded product record"
        );
        Ok(session)
    }

    /// Parses a record from JSON and loads it.
    pub fn from_record_json(json: &str, config: FormConfig) -> CoreResult<Self> {
        let record: ProductRecord = serde_json::from_str(json)?;
        FormSession::from_record(record, config)
    }

    /// Builds the outbound shape: qualifying options and every variant.
    pub fn submission(&self) -> ProductSubmission {
        let options = self
            .options
            .qualifying()
            .map(|o| OptionSubmission {
                option_id: o.option_id.clone(),
                option_name: o.name.clone(),
                values: o
                    .values
                    .iter()
                    .map(|v| OptionValueSubmission {
                        value_id: v.value_id.clone(),
                        option_value: v.label.clone(),
                    })
                    .collect(),
            })
            .collect();

        let variants = self
            .variants
            .iter()
            .map(|v| VariantSubmission {
                variant_id: v.variant_id.clone(),
                variant_key: v.key.as_str().to_string(),
                combination: v.combination.clone(),
                quantity: v.quantity.clone(),
                price: v.price.clone(),
            })
            .collect();

        ProductSubmission { options, variants }
    }
}

// =============================================================================
// Outbound: submission
// =============================================================================

/// Everything the option/variant part of the form contributes to a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSubmission {
    pub options: Vec<OptionSubmission>,
    pub variants: Vec<VariantSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionSubmission {
    pub option_id: Option<String>,
    pub option_name: String,
    pub values: Vec<OptionValueSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionValueSubmission {
    pub value_id: Option<String>,
    pub option_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantSubmission {
    pub variant_id: Option<String>,
    pub variant_key: String,
    #[ts(type = "Record<string, string>")]
    pub combination: Combination,
    pub quantity: String,
    pub price: String,
}

impl ProductSubmission {
    /// Flattens the submission into multipart form fields.
    ///
    /// ## Field Layout
    /// ```text
    /// options[0][option_name]              Color
    /// options[0][option_id]                OPT-00001      (saved only)
    /// options[0][values][0][option_value]  Red
    /// options[0][values][0][value_id]      VAL-00001      (saved only)
    /// variants[0][combination]             {"Color":"Red"}
    /// variants[0][quantity]                5              (blank → 0)
    /// variants[0][price]                   12.50          (blank → base price)
    /// variants[0][variant_key]             Red
    /// variants[0][variant_id]              VAR-00001      (saved only)
    /// ```
    pub fn form_fields(&self, base_price: &str) -> CoreResult<Vec<(String, String)>> {
        let mut fields = Vec::new();

        for (i, option) in self.options.iter().enumerate() {
            fields.push((format!("options[{i}][option_name]"), option.option_name.clone()));
            if let Some(id) = &option.option_id {
                fields.push((format!("options[{i}][option_id]"), id.clone()));
            }
            for (j, value) in option.values.iter().enumerate() {
                fields.push((
                    format!("options[{i}][values][{j}][option_value]"),
                    value.option_value.clone(),
                ));
                if let Some(id) = &value.value_id {
                    fields.push((format!("options[{i}][values][{j}][value_id]"), id.clone()));
                }
            }
        }

        let fallback_price = match base_price.trim() {
            "" => "0",
            _ => base_price,
        };
        for (i, variant) in self.variants.iter().enumerate() {
            let quantity = match variant.quantity.trim() {
                "" => DEFAULT_QUANTITY,
                _ => variant.quantity.as_str(),
            };
            let price = match variant.price.trim() {
                "" => fallback_price,
                _ => variant.price.as_str(),
            };

            fields.push((
                format!("variants[{i}][combination]"),
                serde_json::to_string(&variant.combination)?,
            ));
            fields.push((format!("variants[{i}][quantity]"), quantity.to_string()));
            fields.push((format!("variants[{i}][price]"), price.to_string()));
            fields.push((format!("variants[{i}][variant_key]"), variant.variant_key.clone()));
            if let Some(id) = &variant.variant_id {
                fields.push((format!("variants[{i}][variant_id]"), id.clone()));
            }
        }

        Ok(fields)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn saved_record() -> ProductRecord {
        serde_json::from_value(json!({
            "product_price": "25.00",
            "options": [
                {
                    "option_id": "OPT-00001",
                    "option_name": "Color",
                    "values": [
                        { "value_id": "VAL-00001", "option_value": "Red" },
                        { "value_id": "VAL-00002", "option_value": "Blue" }
                    ]
                },
                {
                    "option_id": "OPT-00002",
                    "option_name": "Size",
                    "option_values": [
                        { "value_id": "VAL-00003", "value": "S" }
                    ]
                }
            ],
            "variants": [
                {
                    "variant_id": "VAR-00001",
                    "variant_key": "Red|S",
                    "variant_combination": "{\"Color\":\"Red\",\"Size\":\"S\"}",
                    "quantity": 7,
                    "price": "27.50"
                },
                {
                    "variant_id": "VAR-00002",
                    "variant_key": "Blue|S",
                    "variant_combination": { "Color": "Blue", "Size": "S" },
                    "quantity": "2",
                    "price": null
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_load_keeps_saved_data_and_ids() {
        let session = FormSession::from_record(saved_record(), FormConfig::default()).unwrap();

        assert_eq!(session.base_price(), "25.00");
        assert_eq!(session.options().len(), 2);
        assert_eq!(session.options()[0].option_id.as_deref(), Some("OPT-00001"));
        assert_eq!(session.options()[1].values[0].value_id.as_deref(), Some("VAL-00003"));

        let red_s = session.variants().get("Red|S").unwrap();
        assert_eq!(red_s.variant_id.as_deref(), Some("VAR-00001"));
        assert_eq!(red_s.quantity, "7");
        assert_eq!(red_s.price, "27.50");

        let blue_s = session.variants().get("Blue|S").unwrap();
        assert_eq!(blue_s.quantity, "2");
        assert_eq!(blue_s.price, "25.00");
        assert_eq!(session.total_stock(), 9);
        assert_eq!(session.last_reconciliation().carried, 2);
    }

    #[test]
    fn test_edit_after_load_mixes_saved_and_new() {
        let mut session = FormSession::from_record(saved_record(), FormConfig::default()).unwrap();
        session.add_value(1, "M").unwrap();

        let submission = session.submission();
        let keys: Vec<&str> = submission.variants.iter().map(|v| v.variant_key.as_str()).collect();
        assert_eq!(keys, vec!["Red|S", "Red|M", "Blue|S", "Blue|M"]);

        assert_eq!(submission.variants[0].variant_id.as_deref(), Some("VAR-00001"));
        assert_eq!(submission.variants[1].variant_id, None);
        assert_eq!(submission.variants[1].price, "25.00");
        assert_eq!(submission.options[1].values[1].value_id, None);
    }

    #[test]
    fn test_options_rebuilt_from_variants() {
        let record: ProductRecord = serde_json::from_value(json!({
            "product_price": 10,
            "variants": [
                { "variant_key": "Red|S", "variant_combination": "{\"Color\":\"Red\",\"Size\":\"S\"}", "quantity": 1 },
                { "variant_key": "Red|M", "variant_combination": "{\"Color\":\"Red\",\"Size\":\"M\"}", "quantity": 2 },
                { "variant_key": "Blue|M", "variant_combination": "{\"Color\":\"Blue\",\"Size\":\"M\"}", "quantity": 3 }
            ]
        }))
        .unwrap();

        let session = FormSession::from_record(record, FormConfig::default()).unwrap();
        let names: Vec<&str> = session.options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Color", "Size"]);
        assert_eq!(session.variants().len(), 4);
        assert_eq!(session.variants().get("Blue|M").unwrap().quantity, "3");
        assert_eq!(session.variants().get("Blue|S").unwrap().quantity, "0");
        assert_eq!(session.variants().get("Blue|S").unwrap().price, "10");
    }

    #[test]
    fn test_empty_record_starts_like_create_flow() {
        let session = FormSession::from_record_json("{}", FormConfig::default()).unwrap();
        assert_eq!(session.options().len(), 1);
        assert!(session.variants().is_empty());
    }

    #[test]
    fn test_duplicate_option_names_are_malformed() {
        let record: ProductRecord = serde_json::from_value(json!({
            "options": [
                { "option_name": "Size", "values": [{ "option_value": "S" }] },
                { "option_name": "Size", "values": [{ "option_value": "M" }] }
            ]
        }))
        .unwrap();
        assert!(matches!(
            FormSession::from_record(record, FormConfig::default()),
            Err(CoreError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_broken_combination_json() {
        let json = r#"{ "variants": [ { "variant_key": "x", "variant_combination": "{not json" } ] }"#;
        assert!(matches!(
            FormSession::from_record_json(json, FormConfig::default()),
            Err(CoreError::Json(_))
        ));
    }

    #[test]
    fn test_submission_skips_non_qualifying_options() {
        let mut session = FormSession::default();
        session.rename_option(0, "Color").unwrap();
        session.add_value(0, "Red").unwrap();
        session.add_option().unwrap();

        let submission = session.submission();
        assert_eq!(submission.options.len(), 1);
        assert_eq!(submission.variants.len(), 1);
    }

    #[test]
    fn test_form_fields_layout() {
        let mut session = FormSession::from_record(saved_record(), FormConfig::default()).unwrap();
        session.update_variant_quantity("Blue|S", " ").unwrap();
        session.update_variant_price("Blue|S", "").unwrap();

        let fields = session.submission().form_fields(session.base_price()).unwrap();
        let get = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("options[0][option_name]"), Some("Color"));
        assert_eq!(get("options[0][option_id]"), Some("OPT-00001"));
        assert_eq!(get("options[1][values][0][option_value]"), Some("S"));
        assert_eq!(get("variants[0][combination]"), Some(r#"{"Color":"Red","Size":"S"}"#));
        assert_eq!(get("variants[0][quantity]"), Some("7"));
        assert_eq!(get("variants[0][variant_id]"), Some("VAR-00001"));
        assert_eq!(get("variants[1][quantity]"), Some("0"));
        assert_eq!(get("variants[1][price]"), Some("25.00"));
        assert_eq!(get("variants[1][variant_key]"), Some("Blue|S"));
    }
}
