//! Ping command - announce the sitemap to search engines

use std::path::Path;

use autospec_core::Config;
use autospec_ping::{PingOutcome, Pinger};
use color_eyre::eyre::{Result, WrapErr};

/// Sitemap URL to announce: the flag wins over configuration.
fn resolve_sitemap_url<'a>(flag: Option<&'a str>, config: &'a Config) -> &'a str {
    flag.map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| config.ping_sitemap_url())
}

/// Run the ping command.
///
/// Individual endpoint failures are reported but never fail the command.
pub fn run(config_path: &Path, sitemap_url: Option<&str>) -> Result<()> {
    let config = Config::load(config_path).wrap_err("Failed to load configuration")?;
    let sitemap_url = resolve_sitemap_url(sitemap_url, &config);

    tracing::info!(sitemap_url, endpoints = config.ping.endpoints.len(), "Pinging search engines");

    let pinger = Pinger::from_config(&config.ping).wrap_err("Failed to create HTTP client")?;
    let outcomes = pinger.ping_all(sitemap_url);

    for outcome in &outcomes {
        match outcome {
            PingOutcome::Ok { url, status } => println!("Pinged: {url} {status}"),
            PingOutcome::Failed { url, error } => println!("Fail: {url} {error}"),
        }
    }

    let ok = outcomes.iter().filter(|o| o.is_ok()).count();
    tracing::info!(ok, failed = outcomes.len() - ok, "Ping finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_run_succeeds_when_every_endpoint_fails() {
        let root = TempDir::new().unwrap();
        let config_path = root.path().join("autospec.toml");
        fs::write(
            &config_path,
            "[ping]\n\
             endpoints = ['http://127.0.0.1:1/ping?sitemap=', 'http://127.0.0.1:1/other?sitemap=']\n\
             timeout_secs = 2\n",
        )
        .unwrap();

        assert!(run(&config_path, Some("https://example.com/sitemap.xml")).is_ok());
    }

    #[test]
    fn test_flag_overrides_config() {
        let mut config = Config::default();
        config.ping.sitemap_url = Some("https://site.example/sitemap.xml".to_string());

        assert_eq!(
            resolve_sitemap_url(Some("https://flag.example/sitemap.xml"), &config),
            "https://flag.example/sitemap.xml"
        );
        assert_eq!(
            resolve_sitemap_url(None, &config),
            "https://site.example/sitemap.xml"
        );
    }

    #[test]
    fn test_blank_flag_ignored() {
        let config = Config::default();
        assert_eq!(
            resolve_sitemap_url(Some("  "), &config),
            "https://example.com/sitemap.xml"
        );
    }
}
