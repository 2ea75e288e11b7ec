//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Environment variable overriding `site.base_url`.
pub const ENV_BASE_URL: &str = "BASE_URL";

/// Environment variable overriding the ads.txt line.
pub const ENV_ADS_TXT_LINE: &str = "ADS_TXT_LINE";

/// Environment variable overriding the sitemap URL announced by `ping`.
pub const ENV_SITEMAP_URL: &str = "SITEMAP_URL";

/// Main configuration structure for AutoSpec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// ads.txt settings.
    #[serde(default)]
    pub ads: AdsConfig,

    /// Search engine ping settings.
    #[serde(default)]
    pub ping: PingConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL for the site (e.g., "https://example.com"), without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Site title, used by the index page.
    #[serde(default = "default_title")]
    pub title: String,

    /// Site description, used by the index page.
    #[serde(default = "default_description")]
    pub description: String,

    /// Author name embedded in structured data.
    #[serde(default = "default_author")]
    pub author: String,

    /// Document language code.
    #[serde(default = "default_lang")]
    pub lang: String,
}

/// Input and output paths, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Item rows (`keyword,entity,attribute,modifier,merchant,deeplink_slug`).
    #[serde(default = "default_items_path")]
    pub items: PathBuf,

    /// Optional redirect mapping (`old_slug,new_slug`).
    #[serde(default = "default_redirects_path")]
    pub redirects: PathBuf,

    /// Optional affiliate configuration keyed by merchant.
    #[serde(default = "default_affiliates_path")]
    pub affiliates: PathBuf,

    /// Directory with template overrides.
    #[serde(default = "default_templates_dir")]
    pub templates: PathBuf,

    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

/// ads.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    /// Override line; takes precedence over `default_line` when non-blank.
    #[serde(default)]
    pub line: Option<String>,

    /// Line written when no override is configured.
    #[serde(default = "default_ads_line")]
    pub default_line: String,
}

/// Search engine ping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingConfig {
    /// Sitemap location to announce.
    #[serde(default)]
    pub sitemap_url: Option<String>,

    /// Ping endpoint prefixes; the encoded sitemap URL is appended.
    #[serde(default = "default_ping_endpoints")]
    pub endpoints: Vec<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_ping_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_base_url() -> String {
    "https://rinosene.github.io".to_string()
}

fn default_title() -> String {
    "AutoSpec".to_string()
}

fn default_description() -> String {
    "사양·호환·규격 모음".to_string()
}

fn default_author() -> String {
    "AutoSpec".to_string()
}

fn default_lang() -> String {
    "ko".to_string()
}

fn default_items_path() -> PathBuf {
    PathBuf::from("data/items.csv")
}

fn default_redirects_path() -> PathBuf {
    PathBuf::from("data/redirects.csv")
}

fn default_affiliates_path() -> PathBuf {
    PathBuf::from("config/affiliates.json")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_ads_line() -> String {
    "google.com, pub-4919301978364078, DIRECT, f08c47fec0942fa0".to_string()
}

fn default_ping_endpoints() -> Vec<String> {
    vec![
        "https://www.google.com/ping?sitemap=".to_string(),
        "https://www.bing.com/ping?sitemap=".to_string(),
    ]
}

fn default_ping_timeout() -> u64 {
    10
}

/// Sitemap URL announced when nothing else is configured.
pub const DEFAULT_PING_SITEMAP_URL: &str = "https://example.com/sitemap.xml";

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            title: default_title(),
            description: default_description(),
            author: default_author(),
            lang: default_lang(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            items: default_items_path(),
            redirects: default_redirects_path(),
            affiliates: default_affiliates_path(),
            templates: default_templates_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            line: None,
            default_line: default_ads_line(),
        }
    }
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            sitemap_url: None,
            endpoints: default_ping_endpoints(),
            timeout_secs: default_ping_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus the process environment.
    ///
    /// Precedence (lowest to highest): built-in defaults, the file at `path`
    /// if it exists, `AUTOSPEC_*` variables (`AUTOSPEC_SITE__BASE_URL`), and
    /// finally `BASE_URL`, `ADS_TXT_LINE` and `SITEMAP_URL`.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "reading configuration file");
        } else {
            tracing::debug!(path = %path.display(), "configuration file not found, using defaults");
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("AUTOSPEC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut config: Config = settings.try_deserialize().map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.apply_env(|key| std::env::var(key).ok());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply the well-known environment overrides using `lookup`.
    ///
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = non_blank(ENV_BASE_URL) {
            self.site.base_url = base_url;
        }
        if let Some(line) = non_blank(ENV_ADS_TXT_LINE) {
            self.ads.line = Some(line);
        }
        if let Some(sitemap_url) = non_blank(ENV_SITEMAP_URL) {
            self.ping.sitemap_url = Some(sitemap_url);
        }
    }

    /// Strip whitespace and trailing slashes from the base URL.
    pub fn normalize(&mut self) {
        let trimmed = self.site.base_url.trim().trim_end_matches('/');
        self.site.base_url = trimmed.to_string();
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if !self.site.base_url.starts_with("http://") && !self.site.base_url.starts_with("https://")
        {
            tracing::warn!(base_url = %self.site.base_url, "site.base_url has no http(s) scheme");
        }

        if self.ping.timeout_secs == 0 {
            return Err(CoreError::config("ping.timeout_secs must be positive"));
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.site.base_url)
    }

    /// Canonical URL of the page generated for `slug`.
    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/{slug}.html", self.site.base_url)
    }

    /// URL of the generated sitemap.
    pub fn sitemap_url(&self) -> String {
        self.url_for("sitemap.xml")
    }

    /// Sitemap URL announced by the ping command.
    pub fn ping_sitemap_url(&self) -> &str {
        self.ping
            .sitemap_url
            .as_deref()
            .unwrap_or(DEFAULT_PING_SITEMAP_URL)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.site.base_url, "https://rinosene.github.io");
        assert_eq!(config.site.title, "AutoSpec");
        assert_eq!(config.site.author, "AutoSpec");
        assert_eq!(config.paths.items, PathBuf::from("data/items.csv"));
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert!(config.ads.line.is_none());
        assert_eq!(config.ping.endpoints.len(), 2);
        assert_eq!(config.ping.timeout_secs, 10);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("autospec.toml");
        std::fs::write(
            &config_path,
            r#"
[site]
base_url = "https://specs.example.org/"
title = "Spec Site"

[paths]
output = "public"

[ads]
default_line = "example.com, pub-1, DIRECT"

[ping]
timeout_secs = 3
"#,
        )
        .expect("write");

        let config = Config::load(&config_path).expect("load config");

        // BASE_URL may be set in the environment running the tests.
        if std::env::var(ENV_BASE_URL).is_err() {
            assert_eq!(config.site.base_url, "https://specs.example.org");
        }
        assert_eq!(config.site.title, "Spec Site");
        assert_eq!(config.site.lang, "ko");
        assert_eq!(config.paths.output, PathBuf::from("public"));
        assert_eq!(config.paths.items, PathBuf::from("data/items.csv"));
        assert_eq!(config.ads.default_line, "example.com, pub-1, DIRECT");
        assert_eq!(config.ping.timeout_secs, 3);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config::load(&dir.path().join("missing.toml")).expect("load config");

        assert_eq!(config.site.title, "AutoSpec");
        assert_eq!(config.paths.output, PathBuf::from("dist"));
    }

    #[test]
    fn test_apply_env_overrides() {
        let vars = env(&[
            (ENV_BASE_URL, "https://example.com/"),
            (ENV_ADS_TXT_LINE, "adnet.example, 42, RESELLER"),
            (ENV_SITEMAP_URL, "https://example.com/sitemap.xml"),
        ]);
        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).cloned());
        config.normalize();

        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.ads.line.as_deref(), Some("adnet.example, 42, RESELLER"));
        assert_eq!(config.ping_sitemap_url(), "https://example.com/sitemap.xml");
    }

    #[test]
    fn test_apply_env_ignores_blank_values() {
        let vars = env(&[(ENV_BASE_URL, "   "), (ENV_ADS_TXT_LINE, "")]);
        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).cloned());

        assert_eq!(config.site.base_url, "https://rinosene.github.io");
        assert!(config.ads.line.is_none());
        assert_eq!(config.ping_sitemap_url(), DEFAULT_PING_SITEMAP_URL);
    }

    #[test]
    fn test_url_helpers() {
        let mut config = Config::default();
        config.site.base_url = "https://example.com".to_string();

        assert_eq!(config.url_for("/a/b"), "https://example.com/a/b");
        assert_eq!(config.url_for("a/b"), "https://example.com/a/b");
        assert_eq!(config.page_url("bar"), "https://example.com/bar.html");
        assert_eq!(config.sitemap_url(), "https://example.com/sitemap.xml");
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = Config::default();
        config.site.base_url = "/".to_string();
        config.normalize();

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("base_url cannot be empty")
        );
    }
}
