//! Input loading.
//!
//! Reads the item and redirect CSV files and the affiliate configuration.
//! Every input is optional: a missing file is an empty input.

use std::path::{Path, PathBuf};

use autospec_core::{AffiliateConfig, ItemRow, RedirectRow};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Input loading errors.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV record.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Load item rows from `path`. A missing file yields no rows.
pub fn load_items(path: &Path) -> Result<Vec<ItemRow>> {
    let items: Vec<ItemRow> = read_csv(path)?;
    info!(path = %path.display(), count = items.len(), "loaded items");
    Ok(items)
}

/// Load redirect rows from `path`. A missing file yields no rows.
pub fn load_redirects(path: &Path) -> Result<Vec<RedirectRow>> {
    let redirects: Vec<RedirectRow> = read_csv(path)?;
    if !redirects.is_empty() {
        info!(path = %path.display(), count = redirects.len(), "loaded redirects");
    }
    Ok(redirects)
}

/// Load the affiliate configuration from `path`.
///
/// Never fails: a missing or malformed file yields an empty configuration.
pub fn load_affiliates(path: &Path) -> AffiliateConfig {
    if !path.exists() {
        debug!(path = %path.display(), "no affiliate config");
        return AffiliateConfig::new();
    }

    match AffiliateConfig::from_path(path) {
        Ok(config) => {
            info!(path = %path.display(), merchants = config.len(), "loaded affiliate config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable affiliate config");
            AffiliateConfig::new()
        }
    }
}

/// Deserialize all records of a headed CSV file.
///
/// Short records are padded with empty fields up to the header width so
/// absent trailing columns read as empty strings; extra fields are ignored.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        info!(path = %path.display(), "input not found, treating as empty");
        return Ok(Vec::new());
    }

    let csv_err = |source: csv::Error| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let mut record = record.map_err(csv_err)?;
        if record.len() < headers.len() {
            debug!(
                path = %path.display(),
                line = record.position().map(|p| p.line()),
                fields = record.len(),
                "padding short record"
            );
            while record.len() < headers.len() {
                record.push_field("");
            }
        }
        rows.push(record.deserialize(Some(&headers)).map_err(csv_err)?);
    }

    Ok(rows)
}
