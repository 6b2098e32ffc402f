//! Configuration module for Sitemap-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table is optional; omitted values fall back to the defaults documented
//! on each type.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Fetch timeout: {}s", config.fetch.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, TraversalConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
