//! # Form Configuration
//!
//! Limits applied to one product form session.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BAZAAR_*`), read by the binary
//! 2. Defaults (this file)
//!
//! Reading the environment is I/O, so this crate only takes a lookup
//! function. The binary passes `std::env::var`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{DEFAULT_MAX_OPTIONS, DEFAULT_MAX_VARIANTS};

/// Environment variable overriding [`FormConfig::max_options`].
pub const ENV_MAX_OPTIONS: &str = "BAZAAR_MAX_OPTIONS";

/// Environment variable overriding [`FormConfig::max_variants`].
pub const ENV_MAX_VARIANTS: &str = "BAZAAR_MAX_VARIANTS";

/// Per-session limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    /// Maximum number of option slots (Color, Size, ...).
    pub max_options: usize,

    /// Upper bound on the Cartesian product size.
    /// Value counts per option are unbounded, so growth must be capped.
    pub max_variants: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            max_options: DEFAULT_MAX_OPTIONS,
            max_variants: DEFAULT_MAX_VARIANTS,
        }
    }
}

impl FormConfig {
    /// Builds a config from defaults plus overrides found through `lookup`.
    ///
    /// Unparsable or zero overrides are ignored with a warning.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::config::FormConfig;
    ///
    /// let config = FormConfig::from_lookup(|key| match key {
    ///     "BAZAAR_MAX_VARIANTS" => Some("250".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.max_variants, 250);
    /// assert_eq!(config.max_options, 5);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = FormConfig::default();

        if let Some(value) = read_limit(&lookup, ENV_MAX_OPTIONS) {
            config.max_options = value;
        }
        if let Some(value) = read_limit(&lookup, ENV_MAX_VARIANTS) {
            config.max_variants = value;
        }

        config
    }
}

fn read_limit<F>(lookup: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(key = %key, value = %raw, "Ignoring invalid limit override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.max_options, 5);
        assert_eq!(config.max_variants, DEFAULT_MAX_VARIANTS);
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = FormConfig::from_lookup(|key| match key {
            ENV_MAX_OPTIONS => Some("3".to_string()),
            ENV_MAX_VARIANTS => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config.max_options, 3);
        assert_eq!(config.max_variants, DEFAULT_MAX_VARIANTS);

        let config = FormConfig::from_lookup(|key| match key {
            ENV_MAX_OPTIONS => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.max_options, DEFAULT_MAX_OPTIONS);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: FormConfig = serde_json::from_str(r#"{"maxVariants": 64}"#).unwrap();
        assert_eq!(config.max_variants, 64);
        assert_eq!(config.max_options, DEFAULT_MAX_OPTIONS);
    }
}
