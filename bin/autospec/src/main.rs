//! AutoSpec CLI
//!
//! Single binary static site generator for spec and compatibility pages.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for AutoSpec.
#[derive(Parser)]
#[command(
    name = "autospec",
    version,
    about = "Generate spec pages, sitemap and crawler files from a CSV catalogue"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "autospec.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory (overrides paths.output)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Notify search engines of the sitemap location
    Ping {
        /// Sitemap URL to announce
        #[arg(long)]
        sitemap_url: Option<String>,
    },
    /// Validate configuration, inputs and templates
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    autospec::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output, base_url } => {
            autospec::cmd::build::run(&cli.config, output.as_deref(), base_url.as_deref())?;
        }
        Commands::Ping { sitemap_url } => {
            autospec::cmd::ping::run(&cli.config, sitemap_url.as_deref())?;
        }
        Commands::Check { strict } => {
            autospec::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
