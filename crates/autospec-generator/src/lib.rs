//! AutoSpec Generator Library
//!
//! Static site generation engine for AutoSpec.
//!
//! # Modules
//!
//! - [`loader`] - CSV and affiliate config loading
//! - [`template`] - HTML template system with variable interpolation
//! - [`html`] - Detail, index and redirect page generation
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - robots.txt generation
//! - [`ads`] - ads.txt generation
//! - [`build`] - Build orchestration

pub mod ads;
pub mod build;
pub mod html;
pub mod loader;
pub mod robots;
pub mod sitemap;
pub mod template;

pub use ads::AdsGenerator;
pub use build::{BuildError, BuildStats, Builder};
pub use html::HtmlGenerator;
pub use robots::RobotsGenerator;
pub use sitemap::SitemapGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
