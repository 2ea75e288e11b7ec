//! Sitemap generation.
//!
//! Generates the XML sitemap listing the site root and every generated page.
//! Redirect stubs are never listed.

use std::io::Write;

use autospec_core::{Config, PageMeta};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::html::rfc3339;

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// XML declaration preceding the document.
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>";

/// Sitemap protocol namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Priority of the site root entry.
pub const ROOT_PRIORITY: f32 = 0.8;

/// Priority of generated page entries.
pub const PAGE_PRIORITY: f32 = 0.6;

/// Change frequency declared for every entry.
pub const CHANGEFREQ: &str = "weekly";

/// A sitemap URL entry.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// URL location.
    pub loc: String,

    /// Last modification time.
    pub lastmod: DateTime<Utc>,

    /// Change frequency.
    pub changefreq: &'static str,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
    generated_at: DateTime<Utc>,
}

impl SitemapGenerator {
    /// Create a new sitemap generator stamping every entry with `generated_at`.
    #[must_use]
    pub fn new(config: Config, generated_at: DateTime<Utc>) -> Self {
        Self {
            config,
            generated_at,
        }
    }

    /// Entries for the site root followed by `pages` in order.
    #[must_use]
    pub fn urls(&self, pages: &[PageMeta]) -> Vec<SitemapUrl> {
        let root = SitemapUrl {
            loc: self.config.url_for("/"),
            lastmod: self.generated_at,
            changefreq: CHANGEFREQ,
            priority: ROOT_PRIORITY,
        };

        std::iter::once(root)
            .chain(pages.iter().map(|page| SitemapUrl {
                loc: self.config.url_for(&page.path),
                lastmod: self.generated_at,
                changefreq: CHANGEFREQ,
                priority: PAGE_PRIORITY,
            }))
            .collect()
    }

    /// Generate sitemap XML from pages.
    #[must_use]
    pub fn generate(&self, pages: &[PageMeta]) -> String {
        debug!(count = pages.len(), "generating sitemap");

        let mut xml = String::from(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for url in self.urls(pages) {
            xml.push_str(&url_to_xml(&url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(&self, pages: &[PageMeta], writer: &mut W) -> Result<()> {
        writer.write_all(self.generate(pages).as_bytes())?;
        Ok(())
    }
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
        escape_xml(&url.loc),
        rfc3339(&url.lastmod),
        url.changefreq,
        url.priority
    )
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.site.base_url = "https://example.com".to_string();
        config
    }

    fn generator() -> SitemapGenerator {
        let ts = Utc.with_ymd_and_hms(2025, 9, 19, 5, 12, 0).unwrap();
        SitemapGenerator::new(test_config(), ts)
    }

    fn page(slug: &str) -> PageMeta {
        PageMeta::new(slug, slug.to_uppercase(), String::new())
    }

    #[test]
    fn test_generate_sitemap() {
        let xml = generator().generate(&[page("about"), page("hdmi-21")]);

        assert!(xml.starts_with("<?xml version='1.0' encoding='UTF-8'?>\n"));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/about.html</loc>"));
        assert!(xml.contains("<loc>https://example.com/hdmi-21.html</loc>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("<lastmod>2025-09-19T05:12:00Z</lastmod>").count(), 3);
        assert_eq!(xml.matches("<changefreq>weekly</changefreq>").count(), 3);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_priorities() {
        let urls = generator().urls(&[page("a")]);

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].priority, ROOT_PRIORITY);
        assert_eq!(urls[1].priority, PAGE_PRIORITY);
        assert!(urls.iter().all(|u| u.changefreq == CHANGEFREQ));

        let xml = generator().generate(&[page("a")]);
        assert_eq!(xml.matches("<priority>0.8</priority>").count(), 1);
        assert_eq!(xml.matches("<priority>0.6</priority>").count(), 1);
    }

    #[test]
    fn test_empty_site_lists_root_only() {
        let xml = generator().generate(&[]);
        assert_eq!(xml.matches("<url>").count(), 1);
    }

    #[test]
    fn test_loc_is_escaped() {
        let xml = generator().generate(&[page("a&b")]);
        assert!(xml.contains("<loc>https://example.com/a&amp;b.html</loc>"));
    }

    #[test]
    fn test_write_to() {
        let mut buf = Vec::new();
        generator().write_to(&[page("x")], &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("x.html"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }
}
