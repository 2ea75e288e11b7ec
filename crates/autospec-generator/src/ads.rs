//! ads.txt generation.
//!
//! Writes the single authorized-seller declaration line.

use std::{fs, path::Path};

use autospec_core::config::AdsConfig;
use thiserror::Error;
use tracing::info;

/// ads.txt generation errors.
#[derive(Debug, Error)]
pub enum AdsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ads.txt generation.
pub type Result<T> = std::result::Result<T, AdsError>;

/// ads.txt generator.
#[derive(Debug)]
pub struct AdsGenerator {
    config: AdsConfig,
}

impl AdsGenerator {
    /// Create a new ads.txt generator.
    #[must_use]
    pub fn new(config: AdsConfig) -> Self {
        Self { config }
    }

    /// The declaration line: the override when non-blank, else the default.
    #[must_use]
    pub fn line(&self) -> &str {
        self.config
            .line
            .as_deref()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .unwrap_or_else(|| self.config.default_line.trim())
    }

    /// Render ads.txt, terminated by exactly one newline.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}\n", self.line())
    }

    /// Write ads.txt into `output_dir`.
    pub fn generate(&self, output_dir: &Path) -> Result<()> {
        info!(overridden = self.config.line.is_some(), "generating ads.txt");
        fs::write(output_dir.join("ads.txt"), self.render())?;
        Ok(())
    }
}
