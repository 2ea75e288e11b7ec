//! Build orchestration.
//!
//! Runs the full pipeline: load inputs, render detail pages and the index,
//! emit redirect stubs, then write ads.txt, robots.txt and sitemap.xml.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
    time::Instant,
};

use autospec_core::{AffiliateConfig, Config, ItemRow, PageMeta, is_safe_slug};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    ads::{AdsError, AdsGenerator},
    html::{HtmlError, HtmlGenerator},
    loader::{self, LoaderError},
    robots::{RobotsError, RobotsGenerator},
    sitemap::{SitemapError, SitemapGenerator},
    template::{TemplateError, TemplateRegistry},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input loading error.
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Template loading error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// ads.txt generation error.
    #[error("ads.txt error: {0}")]
    Ads(#[from] AdsError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of distinct pages generated.
    pub pages: usize,

    /// Rows skipped for lacking a slug or having an unusable one.
    pub skipped_rows: usize,

    /// Rows whose slug was already generated earlier in the run.
    pub duplicate_slugs: usize,

    /// Number of redirect stubs generated.
    pub redirects: usize,

    /// Complete redirect rows that were not emitted.
    pub skipped_redirects: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    generated_at: DateTime<Utc>,
}

impl Builder {
    /// Create a new builder stamped with the current time.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            generated_at: Utc::now(),
        }
    }

    /// Use a fixed build timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();
        let paths = &self.config.paths;
        let output_dir = paths.output.as_path();

        info!(
            items = %paths.items.display(),
            output = %output_dir.display(),
            base_url = %self.config.site.base_url,
            "starting build"
        );

        fs::create_dir_all(output_dir)?;

        // 1. Load inputs
        let templates = TemplateRegistry::from_dir(&paths.templates)?;
        let items = loader::load_items(&paths.items)?;
        let affiliates = loader::load_affiliates(&paths.affiliates);
        let generator =
            HtmlGenerator::with_templates(self.config.clone(), templates, self.generated_at);

        // 2. Detail pages
        let pages = self.generate_pages(&generator, &items, &affiliates, output_dir, &mut stats)?;
        stats.pages = pages.len();

        // 3. Index
        let index_html = generator.generate_index(&pages)?;
        fs::write(output_dir.join("index.html"), index_html)?;

        // 4. Redirect stubs
        self.generate_redirects(&generator, &pages, output_dir, &mut stats)?;

        // 5. Crawler and ad assets
        AdsGenerator::new(self.config.ads.clone()).generate(output_dir)?;
        RobotsGenerator::new(self.config.clone()).generate(output_dir)?;
        self.generate_sitemap(&pages, output_dir)?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            skipped_rows = stats.skipped_rows,
            duplicate_slugs = stats.duplicate_slugs,
            redirects = stats.redirects,
            skipped_redirects = stats.skipped_redirects,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Render one page per row with a slug and return the page manifest.
    ///
    /// A repeated slug overwrites the earlier file and replaces its manifest
    /// entry in place, so every output file is listed once.
    fn generate_pages(
        &self,
        generator: &HtmlGenerator,
        items: &[ItemRow],
        affiliates: &AffiliateConfig,
        output_dir: &Path,
        stats: &mut BuildStats,
    ) -> Result<Vec<PageMeta>> {
        let mut pages: Vec<PageMeta> = Vec::with_capacity(items.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        info!(count = items.len(), "generating HTML pages");

        for item in items {
            let Some(slug) = item.slug() else {
                debug!(keyword = %item.keyword, "skipping row without slug");
                stats.skipped_rows += 1;
                continue;
            };
            if !is_safe_slug(slug) {
                warn!(slug, "skipping row whose slug is reserved or contains a path separator");
                stats.skipped_rows += 1;
                continue;
            }

            let meta = generator.page_meta(item, slug);
            let affiliate_url = affiliates.link(&item.merchant, slug);
            let html = generator.generate_page(item, &meta, &affiliate_url)?;

            let output_path = generator.output_path(slug, output_dir);
            fs::write(&output_path, html)?;
            debug!(path = %output_path.display(), "wrote page");

            match positions.get(slug) {
                Some(&idx) => {
                    warn!(slug, "duplicate slug, later row overwrites earlier page");
                    stats.duplicate_slugs += 1;
                    pages[idx] = meta;
                }
                None => {
                    positions.insert(slug.to_string(), pages.len());
                    pages.push(meta);
                }
            }
        }

        Ok(pages)
    }

    /// Generate redirect stubs for renamed slugs.
    ///
    /// A stub never replaces a generated page or the index, so every sitemap
    /// entry still resolves to real content.
    fn generate_redirects(
        &self,
        generator: &HtmlGenerator,
        pages: &[PageMeta],
        output_dir: &Path,
        stats: &mut BuildStats,
    ) -> Result<()> {
        let redirects = loader::load_redirects(&self.config.paths.redirects)?;
        let generated: HashSet<&str> = pages.iter().map(|p| p.slug.as_str()).collect();

        for redirect in &redirects {
            let Some((old_slug, new_slug)) = redirect.slugs() else {
                continue;
            };

            if !is_safe_slug(old_slug) || !is_safe_slug(new_slug) {
                warn!(
                    from = old_slug,
                    to = new_slug,
                    "skipping redirect with a reserved slug or a path separator"
                );
                stats.skipped_redirects += 1;
                continue;
            }
            if generated.contains(old_slug) {
                warn!(slug = old_slug, "skipping redirect whose source is a generated page");
                stats.skipped_redirects += 1;
                continue;
            }
            if !generated.contains(new_slug) {
                warn!(from = old_slug, to = new_slug, "redirect target is not a generated page");
            }

            let redirect_url = self.config.page_url(new_slug);
            let html = generator.generate_redirect(&redirect_url)?;
            fs::write(generator.output_path(old_slug, output_dir), html)?;
            stats.redirects += 1;

            debug!(from = old_slug, target = %redirect_url, "generated redirect");
        }

        Ok(())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, pages: &[PageMeta], output_dir: &Path) -> Result<()> {
        let generator = SitemapGenerator::new(self.config.clone(), self.generated_at);
        let output_path = output_dir.join("sitemap.xml");
        let mut file = fs::File::create(&output_path)?;
        generator.write_to(pages, &mut file)?;

        info!(path = %output_path.display(), urls = pages.len() + 1, "generated sitemap");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.site.base_url = "https://example.com".to_string();
        config.paths.items = root.join("items.csv");
        config.paths.redirects = root.join("redirects.csv");
        config.paths.affiliates = root.join("affiliates.json");
        config.paths.templates = root.join("templates");
        config.paths.output = root.join("dist");
        config
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 19, 5, 12, 0).unwrap()
    }

    #[test]
    fn test_build_empty_site() {
        let root = TempDir::new().unwrap();
        let config = test_config(root.path());
        let out = config.paths.output.clone();

        let stats = Builder::new(config).build().unwrap();

        assert_eq!(stats.pages, 0);
        assert_eq!(stats.redirects, 0);
        for file in ["index.html", "ads.txt", "robots.txt", "sitemap.xml"] {
            assert!(out.join(file).exists(), "{file} should exist");
        }
    }

    #[test]
    fn test_build_with_items() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("items.csv"),
            "keyword,entity,attribute,modifier,merchant,deeplink_slug\n\
             hdmi cable,HDMI,bandwidth,48Gbps,amazon,hdmi-21\n\
             orphan,x,y,z,amazon,\n\
             ssd,SSD,interface,NVMe,unknown,ssd-nvme\n",
        )
        .unwrap();
        let config = test_config(root.path());
        let out = config.paths.output.clone();

        let stats = Builder::new(config)
            .with_timestamp(fixed_time())
            .build()
            .unwrap();

        assert_eq!(stats.pages, 2);
        assert_eq!(stats.skipped_rows, 1);
        assert!(out.join("hdmi-21.html").exists());
        assert!(out.join("ssd-nvme.html").exists());

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("hdmi-21.html"));
        assert!(index.contains("ssd-nvme.html"));
        assert!(!index.contains("orphan"));
    }

    #[test]
    fn test_duplicate_slug_last_write_wins() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("items.csv"),
            "keyword,entity,attribute,modifier,merchant,deeplink_slug\n\
             first,A,B,C,,dup\n\
             second,A,B,C,,dup\n",
        )
        .unwrap();
        let config = test_config(root.path());
        let out = config.paths.output.clone();

        let stats = Builder::new(config).build().unwrap();

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.duplicate_slugs, 1);
        let page = fs::read_to_string(out.join("dup.html")).unwrap();
        assert!(page.contains("second | A B"));
        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("dup.html").count(), 1);
    }

    #[test]
    fn test_build_uses_template_overrides() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::write(
            root.path().join("templates/index.html"),
            "<h1>{{ title }}</h1>{{ page_count }}",
        )
        .unwrap();
        let config = test_config(root.path());
        let out = config.paths.output.clone();

        Builder::new(config).build().unwrap();

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert_eq!(index, "<h1>AutoSpec</h1>0");
    }

    #[test]
    fn test_build_fails_on_missing_template_variable() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::write(root.path().join("templates/index.html"), "{{ nope }}").unwrap();

        let result = Builder::new(test_config(root.path())).build();

        assert!(matches!(result, Err(BuildError::Html(_))));
    }

    #[test]
    fn test_unsafe_slugs_are_skipped() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("items.csv"),
            "keyword,entity,attribute,modifier,merchant,deeplink_slug\n\
             takeover,A,B,C,,index\n\
             escape,A,B,C,,../outside\n\
             fine,A,B,C,,fine\n",
        )
        .unwrap();
        let config = test_config(root.path());
        let out = config.paths.output.clone();

        let stats = Builder::new(config).build().unwrap();

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.skipped_rows, 2);
        assert!(!root.path().join("outside.html").exists());
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("fine.html"));
        assert!(!index.contains("takeover"));
    }

    #[test]
    fn test_redirects_never_replace_pages() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("items.csv"),
            "keyword,entity,attribute,modifier,merchant,deeplink_slug\n\
             a,A,B,C,,live\n\
             b,A,B,C,,target\n",
        )
        .unwrap();
        fs::write(
            root.path().join("redirects.csv"),
            "old_slug,new_slug\n\
             live,target\n\
             index,target\n\
             sub/dir,target\n\
             gone,target\n",
        )
        .unwrap();
        let config = test_config(root.path());
        let out = config.paths.output.clone();

        let stats = Builder::new(config).build().unwrap();

        assert_eq!(stats.redirects, 1);
        assert_eq!(stats.skipped_redirects, 3);
        assert!(out.join("gone.html").exists());
        assert!(!out.join("sub").exists());
        let live = fs::read_to_string(out.join("live.html")).unwrap();
        assert!(!live.contains("http-equiv=\"refresh\""));
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("live.html"));
    }

    #[test]
    fn test_build_stats() {
        let stats = BuildStats::default();
        assert_eq!(stats.pages, 0);
        assert_eq!(stats.duration_ms, 0);
    }
}
