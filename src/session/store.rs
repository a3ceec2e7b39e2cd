//! Cookie serialization
//!
//! The store file holds a JSON array of [`StoredCookie`] in WebDriver field
//! naming. The environment blob is the base64 encoding of the same bytes, so
//! a store file can be exported verbatim into the variable.

use crate::session::SessionResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// A cookie in portable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,

    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Unix timestamp in seconds; absent for session cookies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSitePolicy>,
}

impl StoredCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expiry: None,
            secure: None,
            http_only: None,
            same_site: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Encodes cookies as a base64 blob for the environment variable
pub fn encode_blob(cookies: &[StoredCookie]) -> SessionResult<String> {
    let bytes = serde_json::to_vec(cookies)?;
    Ok(STANDARD.encode(bytes))
}

/// Decodes a base64 blob back into cookies
///
/// Surrounding whitespace is ignored; CI secrets often carry a trailing newline.
pub fn decode_blob(blob: &str) -> SessionResult<Vec<StoredCookie>> {
    let bytes = STANDARD.decode(blob.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Reads the cookie store file
pub fn read_store(path: &Path) -> SessionResult<Vec<StoredCookie>> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Writes the cookie store file, creating parent directories as needed
pub fn write_store(path: &Path, cookies: &[StoredCookie]) -> SessionResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let bytes = serde_json::to_vec_pretty(cookies)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
