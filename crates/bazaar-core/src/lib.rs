//! # bazaar-core: Product Option & Variant Engine
//!
//! The combinatorial heart of the seller product form. Sellers describe
//! options ("Color": Red, Blue / "Size": S, M); this crate turns them into
//! the full list of saleable variants and keeps per-variant quantity and
//! price across every edit.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Seller Product Form (web front end)                │   │
//! │  │    Details ──► Media ──► Options ──► Variants ──► Review        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands / generated TS types          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  options  │  │ variants  │  │  session  │  │ boundary  │  │   │
//! │  │   │ OptionSet │─►│ recompute │◄─│FormSession│─►│ record /  │  │   │
//! │  │   │           │  │ VariantSet│  │           │  │ submission│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • SYNCHRONOUS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            Marketplace API (create / edit product)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Option, value, combination and variant types
//! - [`options`] - OptionSet manager (add/rename/remove options and values)
//! - [`variants`] - Cartesian generation and merge-by-key reconciliation
//! - [`session`] - One form's explicit state, recomputing after each edit
//! - [`boundary`] - Saved product record in, submission out
//! - [`validation`] - Pre-submit checks on quantity, price, names
//! - [`summary`] - Variant count, total stock, price range
//! - [`money`] - Integer-cents parsing of decimal price strings
//! - [`config`] - Per-session limits
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::FormSession;
//!
//! let mut form = FormSession::default();
//! form.set_base_price("20");
//!
//! form.rename_option(0, "Color").unwrap();
//! form.add_value(0, "Red").unwrap();
//! form.add_value(0, "Blue").unwrap();
//!
//! let size = form.add_option().unwrap();
//! form.rename_option(size, "Size").unwrap();
//! form.add_value(size, "S").unwrap();
//! form.add_value(size, "M").unwrap();
//!
//! let keys: Vec<&str> = form.variants().keys().map(|k| k.as_str()).collect();
//! assert_eq!(keys, ["Red|S", "Red|M", "Blue|S", "Blue|M"]);
//!
//! // Quantities survive later option edits
//! form.update_variant_quantity("Red|S", "5").unwrap();
//! form.add_value(0, "Green").unwrap();
//! assert_eq!(form.variants().len(), 6);
//! assert_eq!(form.variants().get("Red|S").unwrap().quantity, "5");
//! assert_eq!(form.total_stock(), 5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod boundary;
pub mod config;
pub mod error;
pub mod money;
pub mod options;
pub mod session;
pub mod summary;
pub mod types;
pub mod validation;
pub mod variants;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use boundary::{ProductRecord, ProductSubmission};
pub use config::FormConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::FormSession;
pub use summary::VariantSummary;
pub use types::*;
pub use variants::{Reconciliation, VariantSet};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Joins value labels into a combination key (`"Red|S"`).
///
/// Labels may not contain it, otherwise two combinations could share a key.
pub const KEY_SEPARATOR: &str = "|";

/// Maximum option slots per product.
pub const DEFAULT_MAX_OPTIONS: usize = 5;

/// Default cap on the Cartesian product size.
///
/// Options are capped at five but values per option are not, so the
/// product can grow quickly (10 values × 5 options = 100,000 variants).
pub const DEFAULT_MAX_VARIANTS: usize = 1000;

/// Longest accepted option name or value label, in characters.
pub const MAX_LABEL_LEN: usize = 255;
