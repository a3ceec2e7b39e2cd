//! Session persistence and restoration
//!
//! An authenticated session is a cookie collection. It can come from:
//! - an environment variable holding a base64 blob (unattended runs)
//! - a local cookie store file (interactive runs, reused across runs)
//!
//! Sources are tried in [`CookieSource::ORDER`]; a broken source is logged and
//! skipped, never fatal.

mod manager;
mod store;

pub use manager::{export_blob, SessionManager};
pub use store::{
    decode_blob, encode_blob, read_store, write_store, SameSitePolicy, StoredCookie,
};

use crate::browser::BrowserError;
use thiserror::Error;

/// Errors that can occur while loading or saving cookies
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cookie blob is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Cookie data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cookie store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Where a restored session came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieSource {
    /// Base64 blob in an environment variable
    Environment,
    /// Cookie store file on local disk
    LocalStore,
}

impl CookieSource {
    /// Restoration order: the environment wins over the local store
    pub const ORDER: [CookieSource; 2] = [CookieSource::Environment, CookieSource::LocalStore];
}

impl std::fmt::Display for CookieSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::LocalStore => write!(f, "local cookie store"),
        }
    }
}
