//! Browser session handle
//!
//! Every component that touches the remote surface receives the browser as
//! an explicit `&mut dyn Browser`. The handle is owned by the sweep for the
//! whole run and released once at the end.
//!
//! The trait exposes only the operations the sweep needs; selectors are plain
//! CSS strings from configuration.

mod webdriver;

pub use webdriver::WebDriverBrowser;

use crate::session::StoredCookie;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Errors raised by the browser backend
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to start browser session: {0}")]
    Connect(String),

    #[error("Browser command failed: {0}")]
    Command(String),

    #[error("No element matches {selector}")]
    NoSuchElement { selector: String },

    #[error("Unexpected value from page: {0}")]
    UnexpectedValue(String),
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Operations the sweep performs against a live page
#[async_trait]
pub trait Browser: Send {
    /// Navigates to `url` and waits for the load to finish
    async fn goto(&mut self, url: &str) -> BrowserResult<()>;

    /// Reloads the current page
    async fn refresh(&mut self) -> BrowserResult<()>;

    /// URL of the current page, after redirects
    async fn current_url(&mut self) -> BrowserResult<Url>;

    /// Serialized DOM of the current page
    async fn page_source(&mut self) -> BrowserResult<String>;

    /// Adds one cookie to the current browsing context
    async fn add_cookie(&mut self, cookie: &StoredCookie) -> BrowserResult<()>;

    /// All cookies visible to the current page
    async fn cookies(&mut self) -> BrowserResult<Vec<StoredCookie>>;

    /// `class` attribute of the first element matching `selector`.
    ///
    /// `Ok(None)` when nothing matches or the element has no class.
    async fn class_list(&mut self, selector: &str) -> BrowserResult<Option<String>>;

    /// Number of elements matching `selector`
    async fn count_elements(&mut self, selector: &str) -> BrowserResult<usize>;

    /// Clicks the first element matching `selector`.
    ///
    /// Fails with [`BrowserError::NoSuchElement`] when nothing matches.
    async fn click(&mut self, selector: &str) -> BrowserResult<()>;

    /// Scrolls the window to vertical offset `position`
    async fn scroll_to(&mut self, position: u64) -> BrowserResult<()>;

    /// Total scrollable height of the document
    async fn scroll_height(&mut self) -> BrowserResult<u64>;

    /// Inner width and height of the viewport
    async fn viewport(&mut self) -> BrowserResult<(u64, u64)>;

    /// Clicks whatever sits at viewport coordinates `(x, y)`
    async fn tap(&mut self, x: u64, y: u64) -> BrowserResult<()>;

    /// Ends the browser session
    async fn quit(&mut self) -> BrowserResult<()>;
}
