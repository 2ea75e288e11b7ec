//! Robots.txt generation.
//!
//! Grants every crawler full access and points it at the sitemap.

use std::{fs, path::Path};

use autospec_core::Config;
use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render robots.txt.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}\n",
            self.config.sitemap_url()
        )
    }

    /// Write robots.txt into `output_dir`.
    pub fn generate(&self, output_dir: &Path) -> Result<()> {
        info!("generating robots.txt");
        fs::write(output_dir.join("robots.txt"), self.render())?;
        Ok(())
    }
}
