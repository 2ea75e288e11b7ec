//! Item rows, redirect rows and generated page metadata.

use serde::{Deserialize, Serialize};

/// File stem of the generated index page.
pub const INDEX_SLUG: &str = "index";

/// Whether `slug` can name an output file: not the index stem and free of
/// path separators.
#[must_use]
pub fn is_safe_slug(slug: &str) -> bool {
    slug != INDEX_SLUG && !slug.contains(|c: char| c == '/' || c == '\\')
}

/// One row of the item data source.
///
/// Absent columns deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRow {
    pub keyword: String,
    pub entity: String,
    pub attribute: String,
    pub modifier: String,
    pub merchant: String,
    pub deeplink_slug: String,
}

impl ItemRow {
    /// Slug of the page this row produces, or `None` when the row is skipped.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        let slug = self.deeplink_slug.trim();
        (!slug.is_empty()).then_some(slug)
    }

    /// Page title: `"{keyword} | {entity} {attribute}"`, trimmed.
    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "{} | {} {}",
            self.keyword.trim(),
            self.entity.trim(),
            self.attribute.trim()
        )
        .trim()
        .to_string()
    }

    /// Page description.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{} {} — {} 기준으로 정리했어.",
            self.entity.trim(),
            self.attribute.trim(),
            self.modifier.trim()
        )
    }

    /// Fields exposed to templates as `item.<name>`.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("keyword", self.keyword.as_str()),
            ("entity", self.entity.as_str()),
            ("attribute", self.attribute.as_str()),
            ("modifier", self.modifier.as_str()),
            ("merchant", self.merchant.as_str()),
            ("deeplink_slug", self.deeplink_slug.as_str()),
        ]
    }
}

/// One row of the redirect mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectRow {
    pub old_slug: String,
    pub new_slug: String,
}

impl RedirectRow {
    /// `(old, new)` when both slugs are present.
    #[must_use]
    pub fn slugs(&self) -> Option<(&str, &str)> {
        let old = self.old_slug.trim();
        let new = self.new_slug.trim();
        (!old.is_empty() && !new.is_empty()).then_some((old, new))
    }
}

/// Metadata recorded for every generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Output path relative to the output directory (`{slug}.html`).
    pub path: String,
}

impl PageMeta {
    #[must_use]
    pub fn new(slug: &str, title: String, description: String) -> Self {
        Self {
            slug: slug.to_string(),
            title,
            description,
            path: format!("{slug}.html"),
        }
    }
}
