//! Configuration module for Product-Snap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: every key has a default.
//!
//! # Example
//!
//! ```no_run
//! use product_snap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("product-snap.toml")).unwrap();
//! println!("Attempt ceiling: {}", config.retry.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, RetryConfig, ServerConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, ATTEMPT_CEILING};
