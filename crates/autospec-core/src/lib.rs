//! AutoSpec Core Library
//!
//! Core types, configuration, and error handling for the AutoSpec site generator.

pub mod affiliate;
pub mod config;
pub mod error;
pub mod item;

pub use affiliate::{AffiliateConfig, MerchantLink};
pub use config::Config;
pub use error::{CoreError, Result};
pub use item::{INDEX_SLUG, ItemRow, PageMeta, RedirectRow, is_safe_slug};
