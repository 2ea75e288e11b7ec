//! Affiliate deeplink configuration.
//!
//! The configuration file maps a merchant name to a deeplink template and an
//! optional tracking query fragment:
//!
//! ```json
//! {
//!   "amazon": {
//!     "deeplink_base": "https://amazon.com/dp/{slug}",
//!     "utm": "tag=rino-20"
//!   }
//! }
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Placeholder substituted with the page slug in `deeplink_base`.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

/// Link settings for a single merchant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantLink {
    /// URL template containing `{slug}`.
    #[serde(default)]
    pub deeplink_base: Option<String>,

    /// Query string fragment appended to the deeplink.
    #[serde(default)]
    pub utm: Option<String>,
}

/// Merchant name to link settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffiliateConfig {
    merchants: BTreeMap<String, MerchantLink>,
}

impl AffiliateConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse the configuration file at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| CoreError::affiliate(path, e.to_string()))
    }

    /// Link settings for `merchant`.
    #[must_use]
    pub fn get(&self, merchant: &str) -> Option<&MerchantLink> {
        self.merchants.get(merchant)
    }

    /// Whether `merchant` is configured.
    #[must_use]
    pub fn contains(&self, merchant: &str) -> bool {
        self.merchants.contains_key(merchant)
    }

    /// Number of configured merchants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    /// Whether no merchant is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }

    /// Build the affiliate link for `slug` at `merchant`.
    ///
    /// Returns an empty string when the merchant is unknown or has no
    /// deeplink template. The URL is not validated.
    #[must_use]
    pub fn link(&self, merchant: &str, slug: &str) -> String {
        self.get(merchant)
            .map(|m| m.link(slug))
            .unwrap_or_default()
    }
}

impl MerchantLink {
    /// Build the deeplink for `slug`, appending the tracking fragment.
    #[must_use]
    pub fn link(&self, slug: &str) -> String {
        let base = self
            .deeplink_base
            .as_deref()
            .unwrap_or_default()
            .replace(SLUG_PLACEHOLDER, slug);
        let utm = self.utm.as_deref().unwrap_or_default();

        if base.is_empty() || utm.is_empty() {
            return base;
        }

        let sep = if base.contains('?') { '&' } else { '?' };
        format!("{base}{sep}{utm}")
    }
}
