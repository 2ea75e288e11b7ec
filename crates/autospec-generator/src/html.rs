//! HTML generation from item rows.
//!
//! Derives titles, descriptions, FAQ copy and structured data from each row
//! and renders the detail, index and redirect templates.

use std::path::{Path, PathBuf};

use autospec_core::{Config, ItemRow, PageMeta};
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::template::{TemplateContext, TemplateError, TemplateRegistry, escape_html};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Structured data serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Fixed answer to the second FAQ question.
pub const FAQ_A2: &str =
    "아니야. 사용 환경과 목적에 따라 다를 수 있어. 본 페이지는 의사결정을 돕기 위한 가이드야.";

/// The two canned question/answer pairs of a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faq {
    pub q1: String,
    pub a1: String,
    pub q2: String,
    pub a2: String,
}

impl Faq {
    /// Fill the canned FAQ templates from `item`.
    #[must_use]
    pub fn for_item(item: &ItemRow) -> Self {
        Self {
            q1: format!("{} {}은(는) 무엇을 의미해?", item.entity, item.attribute),
            a1: format!(
                "{}은(는) {}의 핵심 특성을 정의하는 항목이야.",
                item.attribute, item.entity
            ),
            q2: format!("{}가 모두에게 최선이야?", item.modifier),
            a2: FAQ_A2.to_string(),
        }
    }
}

/// Introductory paragraph of a detail page.
#[must_use]
pub fn body_paragraph(item: &ItemRow) -> String {
    format!(
        "{}의 {} 선택 기준을 한눈에 정리했어. 추천 스펙은 '{}'이야. \
         상황에 따라 다를 수 있으니 실제 상품 상세를 꼭 확인해줘.",
        item.entity, item.attribute, item.modifier
    )
}

/// schema.org `Article` describing a detail page.
#[must_use]
pub fn article_schema(
    title: &str,
    description: &str,
    url: &str,
    author: &str,
    date_modified: &str,
) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": title,
        "description": description,
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "author": { "@type": "Person", "name": author },
        "dateModified": date_modified,
    })
}

/// schema.org `CollectionPage` describing the index.
#[must_use]
pub fn collection_schema(name: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "CollectionPage",
        "name": name,
    })
}

/// Serialize structured data for embedding in a `<script>` element.
pub fn script_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?.replace("</", "<\\/"))
}

/// Format a timestamp as RFC 3339 UTC with seconds precision (`...T05:12:00Z`).
#[must_use]
pub fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
    generated_at: DateTime<Utc>,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the built-in templates.
    #[must_use]
    pub fn new(config: Config, generated_at: DateTime<Utc>) -> Self {
        Self::with_templates(config, TemplateRegistry::new(), generated_at)
    }

    /// Create a generator with custom templates.
    #[must_use]
    pub fn with_templates(
        config: Config,
        templates: TemplateRegistry,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            templates,
            config,
            generated_at,
        }
    }

    /// Metadata of the page `item` produces at `slug`.
    #[must_use]
    pub fn page_meta(&self, item: &ItemRow, slug: &str) -> PageMeta {
        PageMeta::new(slug, item.title(), item.description())
    }

    /// Generate the detail page for `item`.
    pub fn generate_page(&self, item: &ItemRow, meta: &PageMeta, affiliate_url: &str) -> Result<String> {
        debug!(slug = %meta.slug, "generating HTML for page");

        let ctx = self.build_page_context(item, meta, affiliate_url)?;
        Ok(self.templates.render("page", &ctx)?)
    }

    /// Generate the index page listing `pages`.
    pub fn generate_index(&self, pages: &[PageMeta]) -> Result<String> {
        let site = &self.config.site;
        let items_html = pages.iter().map(list_item_html).collect::<Vec<_>>().join("\n");

        let ctx = self
            .base_context()
            .with_var("title", &site.title)
            .with_var("description", &site.description)
            .with_var("canonical", self.config.url_for("/"))
            .with_html("schema_json", script_json(&collection_schema(&site.title))?)
            .with_html("pages", items_html)
            .with_var("page_count", pages.len().to_string());

        Ok(self.templates.render("index", &ctx)?)
    }

    /// Generate a redirect stub pointing at `redirect_url`.
    pub fn generate_redirect(&self, redirect_url: &str) -> Result<String> {
        let ctx = self.base_context().with_var("redirect_url", redirect_url);
        Ok(self.templates.render("redirect", &ctx)?)
    }

    /// Output path of the page for `slug`.
    #[must_use]
    pub fn output_path(&self, slug: &str, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{slug}.html"))
    }

    /// Variables shared by every template.
    fn base_context(&self) -> TemplateContext {
        TemplateContext::new()
            .with_var("lang", &self.config.site.lang)
            .with_var("site_title", &self.config.site.title)
            .with_var("year", self.generated_at.year().to_string())
            .with_var("updated", self.generated_at.format("%Y-%m-%d").to_string())
    }

    /// Build template context for a detail page.
    fn build_page_context(
        &self,
        item: &ItemRow,
        meta: &PageMeta,
        affiliate_url: &str,
    ) -> Result<TemplateContext> {
        let canonical = self.config.page_url(&meta.slug);
        let schema = article_schema(
            &meta.title,
            &meta.description,
            &canonical,
            &self.config.site.author,
            &rfc3339(&self.generated_at),
        );
        let faq = Faq::for_item(item);

        let mut ctx = self
            .base_context()
            .with_var("title", &meta.title)
            .with_var("h1", &meta.title)
            .with_var("description", &meta.description)
            .with_var("subtitle", &meta.description)
            .with_var("canonical", &canonical)
            .with_html("schema_json", script_json(&schema)?)
            .with_var("body_paragraph", body_paragraph(item))
            .with_var("affiliate_url", affiliate_url)
            .with_var("faq_q1", &faq.q1)
            .with_var("faq_a1", &faq.a1)
            .with_var("faq_q2", &faq.q2)
            .with_var("faq_a2", &faq.a2);

        for (name, value) in item.fields() {
            ctx.insert(format!("item.{name}"), value);
        }

        if !affiliate_url.is_empty() {
            ctx.insert_html(
                "affiliate_html",
                format!(
                    r#"<p class="cta"><a href="{}" rel="sponsored nofollow noopener" target="_blank">{}</a></p>"#,
                    escape_html(affiliate_url),
                    escape_html(&item.merchant)
                ),
            );
        }

        Ok(ctx)
    }
}

/// Generate HTML for an index list item.
#[must_use]
pub fn list_item_html(page: &PageMeta) -> String {
    format!(
        r#"    <li><a href="{}">{}</a><p>{}</p></li>"#,
        escape_html(&page.path),
        escape_html(&page.title),
        escape_html(&page.description)
    )
}
