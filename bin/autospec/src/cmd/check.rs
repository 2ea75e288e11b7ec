//! Check command - validate configuration, inputs and templates

use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
};

use autospec_core::{AffiliateConfig, Config, is_safe_slug};
use autospec_generator::{TemplateRegistry, loader};
use color_eyre::eyre::{Result, bail};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration, CSV inputs, affiliate coverage and template
/// overrides without writing any output.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and inputs");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    match Config::load(config_path) {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            check_config_values(&config, &mut result);
            check_inputs(&config, &mut result);
            check_templates(&config, &mut result);
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check configuration values the loader accepts but are likely mistakes.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    let base_url = &config.site.base_url;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        result.add_warning(format!("site.base_url has no http(s) scheme: {base_url}"));
    }

    if config.ping.endpoints.is_empty() {
        result.add_warning("ping.endpoints is empty; ping will do nothing");
    }
}

/// Check item rows, affiliate coverage and redirect rows.
fn check_inputs(config: &Config, result: &mut ValidationResult) {
    let paths = &config.paths;

    println!("\nChecking items...");
    let items = match loader::load_items(&paths.items) {
        Ok(items) => items,
        Err(e) => {
            result.add_error(format!("{e}"));
            return;
        }
    };

    if !paths.items.exists() {
        result.add_warning(format!("Items file not found: {}", paths.items.display()));
    }

    let affiliates = if paths.affiliates.exists() {
        match AffiliateConfig::from_path(&paths.affiliates) {
            Ok(affiliates) => affiliates,
            Err(e) => {
                result.add_warning(format!("{e}; affiliate links disabled"));
                AffiliateConfig::new()
            }
        }
    } else {
        AffiliateConfig::new()
    };

    let mut slugs = HashSet::new();
    let mut duplicates = BTreeSet::new();
    let mut unlinked = BTreeSet::new();
    let mut without_slug = 0;

    for item in &items {
        let Some(slug) = item.slug() else {
            without_slug += 1;
            continue;
        };
        if !is_safe_slug(slug) {
            result.add_warning(format!("Slug '{slug}' is reserved or contains a path separator"));
            continue;
        }
        if !slugs.insert(slug) {
            duplicates.insert(slug);
        }
        if !item.merchant.is_empty() && !affiliates.contains(&item.merchant) {
            unlinked.insert(item.merchant.as_str());
        }
    }

    println!("  Rows:           {}", items.len());
    println!("  Pages:          {}", slugs.len());
    println!("  Without slug:   {without_slug}");

    for slug in &duplicates {
        result.add_warning(format!("Duplicate slug '{slug}': later rows overwrite earlier ones"));
    }
    for merchant in &unlinked {
        result.add_warning(format!("Merchant '{merchant}' has no affiliate config"));
    }

    println!("\nChecking redirects...");
    let redirects = match loader::load_redirects(&paths.redirects) {
        Ok(redirects) => redirects,
        Err(e) => {
            result.add_error(format!("{e}"));
            return;
        }
    };
    println!("  Redirects:      {}", redirects.len());

    for (idx, redirect) in redirects.iter().enumerate() {
        match redirect.slugs() {
            None => result.add_warning(format!("Redirect row {} is missing a slug", idx + 1)),
            Some((old_slug, new_slug)) if !is_safe_slug(old_slug) || !is_safe_slug(new_slug) => {
                result.add_warning(format!(
                    "Redirect '{old_slug}' -> '{new_slug}' uses a reserved slug or a path separator"
                ));
            }
            Some((old_slug, new_slug)) => {
                if !slugs.contains(new_slug) {
                    result.add_warning(format!(
                        "Redirect '{old_slug}' targets '{new_slug}', which is not a generated page"
                    ));
                }
                if slugs.contains(old_slug) {
                    result.add_warning(format!(
                        "Redirect '{old_slug}' shadows a generated page and will be skipped"
                    ));
                }
            }
        }
    }
}

/// Check template overrides parse.
fn check_templates(config: &Config, result: &mut ValidationResult) {
    println!("\nChecking templates...");
    match TemplateRegistry::from_dir(&config.paths.templates) {
        Ok(_) => println!("  ✓ Templates valid"),
        Err(e) => {
            println!("  ✗ {e}");
            result.add_error(format!("{e}"));
        }
    }
}
