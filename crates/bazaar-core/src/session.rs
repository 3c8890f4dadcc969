//! # Form Session
//!
//! Explicit state of one product create/edit form: the option set, the
//! derived variants and the base price.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Form Session Operations                              │
//! │                                                                         │
//! │  Option edits                          Variant edits                    │
//! │  ────────────                          ─────────────                    │
//! │  add_option()      ─┐                  update_variant_quantity(key, q)  │
//! │  remove_option(i)   │                  update_variant_price(key, p)     │
//! │  rename_option(i,n) ├─► OptionSet ─┐        │                           │
//! │  add_value(i,v)     │              │        ▼                           │
//! │  remove_value(i,j) ─┘              │   patch one entry in place         │
//! │                                    ▼   (no recompute)                   │
//! │                       variants::recompute(options, variants, base)      │
//! │                                    │                                    │
//! │                     ok ◄───────────┴──────────► too many variants       │
//! │                     keep both                    roll option edit back  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is exclusively owned by one form. Dropping it discards all
//! state; nothing is persisted in between.

use tracing::debug;

use crate::config::FormConfig;
use crate::error::CoreResult;
use crate::options::OptionSet;
use crate::summary::VariantSummary;
use crate::types::{OptionDefinition, OptionValue};
use crate::variants::{self, Reconciliation, VariantSet};

/// State of one product form.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub(crate) options: OptionSet,
    pub(crate) variants: VariantSet,
    pub(crate) base_price: String,
    pub(crate) config: FormConfig,
    pub(crate) last_reconciliation: Reconciliation,
}

impl FormSession {
    /// Starts a create-flow session: one empty option slot, no variants.
    pub fn new(config: FormConfig) -> Self {
        FormSession {
            options: OptionSet::new(config.max_options),
            variants: VariantSet::new(),
            base_price: String::new(),
            config,
            last_reconciliation: Reconciliation::default(),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn options(&self) -> &[OptionDefinition] {
        self.options.definitions()
    }

    pub fn variants(&self) -> &VariantSet {
        &self.variants
    }

    pub fn base_price(&self) -> &str {
        &self.base_price
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Report of the most recent recomputation.
    pub fn last_reconciliation(&self) -> Reconciliation {
        self.last_reconciliation
    }

    /// Sum of variant quantities, for display only.
    pub fn total_stock(&self) -> i64 {
        self.variants.total_stock()
    }

    pub fn summary(&self) -> VariantSummary {
        VariantSummary::from(&self.variants)
    }

    // =========================================================================
    // Product-level fields
    // =========================================================================

    /// Sets the product price used for combinations that appear from now on.
    ///
    /// Existing variants keep their price.
    pub fn set_base_price(&mut self, price: impl Into<String>) {
        self.base_price = price.into();
    }

    // =========================================================================
    // Option edits (each followed by a recompute)
    // =========================================================================

    /// Appends an empty option slot and returns its index.
    pub fn add_option(&mut self) -> CoreResult<usize> {
        self.mutate("add_option", |set| set.add_option())
    }

    /// Removes an option; variants built on it lose their data.
    pub fn remove_option(&mut self, index: usize) -> CoreResult<OptionDefinition> {
        self.mutate("remove_option", |set| set.remove_option(index))
    }

    pub fn rename_option(&mut self, index: usize, name: impl Into<String>) -> CoreResult<()> {
        let name = name.into();
        self.mutate("rename_option", |set| set.rename_option(index, name))
    }

    pub fn add_value(&mut self, index: usize, raw_label: &str) -> CoreResult<()> {
        self.mutate("add_value", |set| set.add_value(index, raw_label))
    }

    pub fn remove_value(&mut self, index: usize, value_index: usize) -> CoreResult<OptionValue> {
        self.mutate("remove_value", |set| set.remove_value(index, value_index))
    }

    // =========================================================================
    // Variant edits (no recompute)
    // =========================================================================

    pub fn update_variant_quantity(&mut self, key: &str, quantity: impl Into<String>) -> CoreResult<()> {
        let quantity = quantity.into();
        debug!(key = %key, quantity = %quantity, "update_variant_quantity");
        self.variants.update_quantity(key, quantity)
    }

    pub fn update_variant_price(&mut self, key: &str, price: impl Into<String>) -> CoreResult<()> {
        let price = price.into();
        debug!(key = %key, price = %price, "update_variant_price");
        self.variants.update_price(key, price)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Applies an option edit, then recomputes. If recomputation fails the
    /// option set is restored, so options and variants never disagree.
    fn mutate<R, F>(&mut self, op: &'static str, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut OptionSet) -> CoreResult<R>,
    {
        let snapshot = self.options.clone();
        let out = f(&mut self.options)?;
        debug!(op, options = self.options.len(), "Option set changed");

        if let Err(err) = self.reconcile() {
            self.options = snapshot;
            return Err(err);
        }
        Ok(out)
    }

    /// Recomputes variants from the current options.
    pub(crate) fn reconcile(&mut self) -> CoreResult<()> {
        let (next, report) = variants::recompute(
            self.options.definitions(),
            &self.variants,
            &self.base_price,
            self.config.max_variants,
        )?;
        self.variants = next;
        self.last_reconciliation = report;
        Ok(())
    }
}

impl Default for FormSession {
    fn default() -> Self {
        FormSession::new(FormConfig::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
