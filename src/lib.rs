//! Sitemap-Scout: sitemap discovery and traversal for SEO audits
//!
//! This crate locates a site's sitemaps (robots.txt directives or well-known
//! default paths), expands sitemap indexes into a flat list of page URLs and
//! reports per-sitemap outcomes, tolerating partial failures along the way.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Scout operations
///
/// Per-sitemap failures never surface here; they are recorded on the
/// corresponding [`sitemap::SitemapResult`]. This type covers the failures
/// that stop a run before traversal begins.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid root URL: {0}")]
    InvalidRootUrl(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::NodeState,
        to: state::NodeState,
    },

    #[error("Report error: {0}")]
    Report(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitemap-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{audit_site, dedupe_pages, traverse, Fetch, HttpFetcher};
pub use robots::{locate_sitemaps, Located};
pub use sitemap::{PageEntry, Provenance, SitemapResult, SitemapSource, TraversalEntry};
pub use state::{NodeState, VisitedSet};
