//! Build command - generates the static site

use std::{path::Path, time::Instant};

use autospec_core::Config;
use autospec_generator::Builder;
use color_eyre::eyre::{Result, WrapErr};

/// Files written on every run besides detail pages and redirects.
const FIXED_OUTPUTS: usize = 4;

/// Run the build command.
///
/// Renders every item row to the output directory together with the index,
/// redirect stubs, ads.txt, robots.txt and sitemap.xml.
pub fn run(config_path: &Path, output: Option<&Path>, base_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?base_url, "Starting build");

    let mut config = Config::load(config_path).wrap_err("Failed to load configuration")?;

    // Override output directory if specified
    if let Some(dir) = output {
        config.paths.output = dir.to_path_buf();
    }

    // Override base URL if specified via CLI
    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base URL from CLI");
        config.site.base_url = url.to_string();
        config.normalize();
        config.validate().wrap_err("Invalid --base-url")?;
    }

    tracing::debug!(?config, "Loaded configuration");

    let output_dir = config.paths.output.clone();
    let stats = Builder::new(config).build().wrap_err("Build failed")?;

    let duration = start.elapsed();
    let files = stats.pages + stats.redirects + FIXED_OUTPUTS;

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Skipped:    {}", stats.skipped_rows);
    println!("  Redirects:  {}", stats.redirects);
    println!("  Files:      {files}");
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_dir.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
