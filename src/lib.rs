//! Episode Sweeper: a reading-session automaton
//!
//! This crate restores an authenticated browser session, discovers unread
//! episodes on a listing page, and simulates human reading of each one so the
//! remote service records it as read. The sweep repeats until the listing
//! reports nothing unread or the iteration cap is reached.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod reader;
pub mod session;
pub mod timing;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

/// Main error type for Episode Sweeper operations
#[derive(Debug, Error)]
pub enum SweeperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operator prompt failed: {0}")]
    Prompt(String),
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

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Episode Sweeper operations
pub type Result<T> = std::result::Result<T, SweeperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use browser::Browser;
pub use config::{Config, RunMode};
pub use crawler::{run_sweep, Coordinator, CrawlState, EpisodeItem, VisitedSet};
pub use output::{CrawlReport, Outcome};
pub use reader::{ReadReport, ReadingMode, ReadingSimulator};
pub use session::{CookieSource, SessionManager, StoredCookie};
pub use timing::{DelayPolicy, Pacing, Sleeper};
