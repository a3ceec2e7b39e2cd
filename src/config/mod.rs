//! Configuration module for Episode Sweeper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file section falls back to defaults
//! tuned for the default target site.
//!
//! # Example
//!
//! ```no_run
//! use episode_sweeper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweeper.toml")).unwrap();
//! println!("Sweeping: {}", config.target.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, ReaderConfig, RunMode, SelectorConfig, SessionConfig,
    TapPoint, TargetConfig, TimingConfig, DEFAULT_TAP_POINT, DEFAULT_TARGET_URL,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
