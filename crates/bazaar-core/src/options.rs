//! # OptionSet Manager
//!
//! Owns the ordered option slots of one product form and the primitives
//! that mutate them.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    OptionSet Operations                                 │
//! │                                                                         │
//! │  Seller Action            Method              Rejected When             │
//! │  ─────────────            ──────              ─────────────             │
//! │  "Add option"  ─────────► add_option()        already at max_options    │
//! │  "Remove option" ───────► remove_option(i)    it is the last slot       │
//! │  Type option name ──────► rename_option(i,n)  n duplicates another name │
//! │  Enter value ───────────► add_value(i,v)      blank, duplicate, or '|'  │
//! │  Remove value chip ─────► remove_value(i,j)   (never)                   │
//! │                                                                         │
//! │  Out-of-range indices are precondition violations, not rejections.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method either applies fully or leaves the set untouched.
//! This type does not recompute variants; [`crate::session::FormSession`]
//! does that after each successful mutation.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{OptionDefinition, OptionValue};
use crate::{KEY_SEPARATOR, MAX_LABEL_LEN};

/// Ordered collection of option definitions.
///
/// ## Invariants
/// - `1 <= len() <= max_options`
/// - Labels are non-blank, trimmed, unique within their option and never
///   contain the key separator
/// - Non-blank option names are unique (compared trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<OptionDefinition>,
    max_options: usize,
}

impl OptionSet {
    /// Creates a set holding one empty option slot.
    pub fn new(max_options: usize) -> Self {
        OptionSet {
            options: vec![OptionDefinition::empty()],
            max_options: max_options.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn max_options(&self) -> usize {
        self.max_options
    }

    pub fn definitions(&self) -> &[OptionDefinition] {
        &self.options
    }

    pub fn get(&self, index: usize) -> CoreResult<&OptionDefinition> {
        let len = self.options.len();
        self.options
            .get(index)
            .ok_or(CoreError::OptionIndexOutOfRange { index, len })
    }

    /// Options that take part in variant generation, in order.
    pub fn qualifying(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.options.iter().filter(|o| o.is_qualifying())
    }

    // =========================================================================
    // Option slots
    // =========================================================================

    /// Appends an empty option slot and returns its index.
    pub fn add_option(&mut self) -> CoreResult<usize> {
        if self.options.len() >= self.max_options {
            return Err(CoreError::TooManyOptions {
                max: self.max_options,
            });
        }
        self.options.push(OptionDefinition::empty());
        Ok(self.options.len() - 1)
    }

    /// Appends a fully built option (used when loading a saved product).
    ///
    /// The definition goes through the same name and label rules as
    /// interactive input. Offending labels are returned so the caller
    /// can report them; the option is added without them.
    pub(crate) fn push_definition(
        &mut self,
        definition: OptionDefinition,
    ) -> CoreResult<Vec<ValidationError>> {
        if self.options.len() >= self.max_options {
            return Err(CoreError::TooManyOptions {
                max: self.max_options,
            });
        }
        self.check_name_free(&definition.name, None)?;

        let mut slot = OptionDefinition {
            option_id: definition.option_id,
            name: definition.name,
            values: Vec::with_capacity(definition.values.len()),
        };
        let mut skipped = Vec::new();
        for value in definition.values {
            match check_label(&slot, &value.label) {
                Ok(label) => slot.values.push(OptionValue {
                    value_id: value.value_id,
                    label,
                }),
                Err(err) => skipped.push(err),
            }
        }

        self.options.push(slot);
        Ok(skipped)
    }

    /// Drops the placeholder slot a fresh set starts with.
    pub(crate) fn clear(&mut self) {
        self.options.clear();
    }

    /// Restores the one-slot minimum after loading.
    pub(crate) fn ensure_slot(&mut self) {
        if self.options.is_empty() {
            self.options.push(OptionDefinition::empty());
        }
    }

    /// Removes the option at `index` and returns it.
    ///
    /// Variants built from this option disappear on the next recompute,
    /// together with their quantities and prices.
    pub fn remove_option(&mut self, index: usize) -> CoreResult<OptionDefinition> {
        self.get(index)?;
        if self.options.len() <= 1 {
            return Err(CoreError::LastOptionRequired);
        }
        Ok(self.options.remove(index))
    }

    /// Sets the option name.
    ///
    /// Blank names are allowed while typing; the option simply does not
    /// qualify yet. A non-blank name equal (trimmed) to another option's
    /// name is rejected, since two options with one name would collapse
    /// into one entry of the submitted combination map.
    pub fn rename_option(&mut self, index: usize, new_name: impl Into<String>) -> CoreResult<()> {
        self.get(index)?;
        let new_name = new_name.into();
        self.check_name_free(&new_name, Some(index))?;
        self.options[index].name = new_name;
        Ok(())
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Trims `raw_label` and appends it as a new value of option `index`.
    ///
    /// ## Rejections (set unchanged)
    /// - blank after trimming
    /// - case-sensitive duplicate of an existing label
    /// - contains the key separator `|`
    /// - longer than 255 characters
    pub fn add_value(&mut self, index: usize, raw_label: &str) -> CoreResult<()> {
        let option = self.get(index)?;
        let label = check_label(option, raw_label)?;
        self.options[index].values.push(OptionValue::new(label));
        Ok(())
    }

    /// Removes value `value_index` of option `index` and returns it.
    pub fn remove_value(&mut self, index: usize, value_index: usize) -> CoreResult<OptionValue> {
        let len = self.get(index)?.values.len();
        if value_index >= len {
            return Err(CoreError::ValueIndexOutOfRange {
                option: index,
                index: value_index,
                len,
            });
        }
        Ok(self.options[index].values.remove(value_index))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn check_name_free(&self, name: &str, skip: Option<usize>) -> Result<(), ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        if trimmed.chars().count() > MAX_LABEL_LEN {
            return Err(ValidationError::TooLong {
                field: "option name".to_string(),
                max: MAX_LABEL_LEN,
            });
        }
        let taken = self
            .options
            .iter()
            .enumerate()
            .any(|(i, o)| Some(i) != skip && o.name.trim() == trimmed);
        if taken {
            return Err(ValidationError::Duplicate {
                field: "option name".to_string(),
                value: trimmed.to_string(),
            });
        }
        Ok(())
    }
}

/// Trims a label and checks it against the option's existing values.
fn check_label(option: &OptionDefinition, raw_label: &str) -> Result<String, ValidationError> {
    let label = raw_label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "option value".to_string(),
        });
    }
    if label.chars().count() > MAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "option value".to_string(),
            max: MAX_LABEL_LEN,
        });
    }
    if label.contains(KEY_SEPARATOR) {
        return Err(ValidationError::InvalidFormat {
            field: "option value".to_string(),
            reason: format!("must not contain '{}'", KEY_SEPARATOR),
        });
    }
    if option.has_label(label) {
        return Err(ValidationError::Duplicate {
            field: "option value".to_string(),
            value: label.to_string(),
        });
    }

    Ok(label.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn color_set() -> OptionSet {
        let mut set = OptionSet::new(5);
        set.rename_option(0, "Color").unwrap();
        set.add_value(0, "Red").unwrap();
        set.add_value(0, "Blue").unwrap();
        set
    }

    #[test]
    fn test_new_set_has_one_empty_slot() {
        let set = OptionSet::new(5);
        assert_eq!(set.len(), 1);
        assert_eq!(set.definitions()[0], OptionDefinition::empty());
        assert_eq!(set.qualifying().count(), 0);
    }

    #[test]
    fn test_add_option_respects_maximum() {
        let mut set = OptionSet::new(5);
        for expected in 1..5 {
            assert_eq!(set.add_option().unwrap(), expected);
        }
        assert!(matches!(
            set.add_option(),
            Err(CoreError::TooManyOptions { max: 5 })
        ));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_remove_option_keeps_one() {
        let mut set = color_set();
        assert!(matches!(
            set.remove_option(0),
            Err(CoreError::LastOptionRequired)
        ));

        set.add_option().unwrap();
        let removed = set.remove_option(0).unwrap();
        assert_eq!(removed.name, "Color");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_out_of_range_indices() {
        let mut set = color_set();
        assert!(matches!(
            set.remove_option(3),
            Err(CoreError::OptionIndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            set.add_value(1, "Green"),
            Err(CoreError::OptionIndexOutOfRange { .. })
        ));
        assert!(matches!(
            set.remove_value(0, 2),
            Err(CoreError::ValueIndexOutOfRange {
                option: 0,
                index: 2,
                len: 2
            })
        ));
    }

    #[test]
    fn test_add_value_trims_and_rejects() {
        let mut set = color_set();

        set.add_value(0, "  Green  ").unwrap();
        assert_eq!(set.definitions()[0].values[2].label, "Green");
        assert_eq!(set.definitions()[0].values[2].value_id, None);

        let before = set.clone();
        assert!(matches!(
            set.add_value(0, "   "),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            set.add_value(0, "Red"),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert!(matches!(
            set.add_value(0, "Red|Blue"),
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert_eq!(set, before);

        // Case-sensitive: "red" is a different label
        set.add_value(0, "red").unwrap();
        assert_eq!(set.definitions()[0].values.len(), 4);
    }

    #[test]
    fn test_remove_value_preserves_order() {
        let mut set = color_set();
        set.add_value(0, "Green").unwrap();
        let removed = set.remove_value(0, 1).unwrap();
        assert_eq!(removed.label, "Blue");
        let labels: Vec<&str> = set.definitions()[0].labels().collect();
        assert_eq!(labels, vec!["Red", "Green"]);
    }

    #[test]
    fn test_rename_rejects_duplicate_names() {
        let mut set = color_set();
        set.add_option().unwrap();

        assert!(matches!(
            set.rename_option(1, " Color "),
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert_eq!(set.definitions()[1].name, "");

        // Blank names may repeat, and renaming an option to itself is fine
        set.add_option().unwrap();
        set.rename_option(0, "Color").unwrap();
        set.rename_option(1, "Size").unwrap();
        set.rename_option(1, "").unwrap();
        assert_eq!(set.definitions()[1].name, "");
    }

    #[test]
    fn test_push_definition_filters_bad_labels() {
        let mut set = OptionSet::new(5);
        set.clear();

        let mut definition = OptionDefinition::with_values("Size", ["S", "M", "S", " ", "L|XL"]);
        definition.option_id = Some("OPT-00001".to_string());
        definition.values[0].value_id = Some("VAL-00001".to_string());

        let skipped = set.push_definition(definition).unwrap();
        assert_eq!(skipped.len(), 3);

        let loaded = &set.definitions()[0];
        assert_eq!(loaded.option_id.as_deref(), Some("OPT-00001"));
        assert_eq!(loaded.labels().collect::<Vec<_>>(), vec!["S", "M"]);
        assert_eq!(loaded.values[0].value_id.as_deref(), Some("VAL-00001"));

        let duplicate = OptionDefinition::with_values("Size", ["XL"]);
        assert!(set.push_definition(duplicate).is_err());
    }
}
