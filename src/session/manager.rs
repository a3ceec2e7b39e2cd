//! Session manager: restores and persists the authenticated cookie set

use crate::browser::{Browser, BrowserError};
use crate::config::{Config, RunMode};
use crate::session::store::{decode_blob, read_store, write_store, StoredCookie};
use crate::session::{CookieSource, SessionResult};
use crate::timing::Pacing;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Owns the session state for one run
///
/// The session is "restored" once a [`CookieSource`] has been applied to the
/// browser; [`SessionManager::restored_from`] reports which one.
#[derive(Debug)]
pub struct SessionManager {
    mode: RunMode,
    env_var: String,
    env_blob: Option<String>,
    store_path: PathBuf,
    open_settle: Duration,
    restore_settle: Duration,
    restored_from: Option<CookieSource>,
}

impl SessionManager {
    /// Creates a manager with an explicit environment blob
    ///
    /// Empty or whitespace-only blobs count as absent.
    pub fn new(config: &Config, mode: RunMode, env_blob: Option<String>) -> Self {
        Self {
            mode,
            env_var: config.session.cookie_env_var.clone(),
            env_blob: env_blob.filter(|blob| !blob.trim().is_empty()),
            store_path: PathBuf::from(&config.session.cookie_store),
            open_settle: config.timing.open_settle(),
            restore_settle: config.timing.restore_settle(),
            restored_from: None,
        }
    }

    /// Creates a manager reading the blob from the configured environment variable
    pub fn from_env(config: &Config, mode: RunMode) -> Self {
        let blob = std::env::var(&config.session.cookie_env_var).ok();
        Self::new(config, mode, blob)
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Source that restored the session, if any
    pub fn restored_from(&self) -> Option<CookieSource> {
        self.restored_from
    }

    /// Restores the session on `target_url`
    ///
    /// Navigates to the target first (cookies only apply to the current
    /// domain), then tries each source in [`CookieSource::ORDER`]. A source
    /// that is missing or unreadable is skipped. The first usable source is
    /// applied cookie by cookie, the page refreshed, and `true` returned.
    ///
    /// # Errors
    ///
    /// Only navigation and refresh failures propagate; those mean the browser
    /// itself is unusable.
    pub async fn restore(
        &mut self,
        browser: &mut dyn Browser,
        pacing: &mut Pacing,
        target_url: &str,
    ) -> Result<bool, BrowserError> {
        browser.goto(target_url).await?;
        pacing.settle(self.open_settle).await;

        for source in CookieSource::ORDER {
            let cookies = match self.load(source) {
                Ok(Some(cookies)) => cookies,
                Ok(None) => {
                    tracing::debug!("No cookies available from {}", source);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to restore cookies from {}: {}", source, e);
                    continue;
                }
            };

            tracing::info!("Restoring session from {}", source);
            let applied = apply_cookies(browser, &cookies).await;
            tracing::debug!("Applied {}/{} cookies", applied, cookies.len());

            browser.refresh().await?;
            pacing.settle(self.restore_settle).await;

            self.restored_from = Some(source);
            return Ok(true);
        }

        Ok(false)
    }

    /// Saves the browser's cookies to the local store
    ///
    /// Unattended runs skip the write: the file would not survive to the next
    /// run, so it is never touched there.
    pub async fn persist(&self, browser: &mut dyn Browser) -> SessionResult<()> {
        if self.mode.is_unattended() {
            tracing::trace!("Unattended run, not writing {}", self.store_path.display());
            return Ok(());
        }

        let cookies = browser.cookies().await?;
        write_store(&self.store_path, &cookies)?;
        tracing::debug!(
            "Saved {} cookies to {}",
            cookies.len(),
            self.store_path.display()
        );
        Ok(())
    }

    /// Evaluates one source: `Ok(None)` when it is simply not there
    fn load(&self, source: CookieSource) -> SessionResult<Option<Vec<StoredCookie>>> {
        match source {
            CookieSource::Environment => match &self.env_blob {
                Some(blob) => Ok(Some(decode_blob(blob)?)),
                None => Ok(None),
            },
            CookieSource::LocalStore => {
                if self.store_path.exists() {
                    Ok(Some(read_store(&self.store_path)?))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

/// Applies cookies one at a time; a rejected cookie is skipped
async fn apply_cookies(browser: &mut dyn Browser, cookies: &[StoredCookie]) -> usize {
    let mut applied = 0;
    for cookie in cookies {
        match browser.add_cookie(cookie).await {
            Ok(()) => applied += 1,
            Err(e) => tracing::debug!("Skipping cookie {}: {}", cookie.name, e),
        }
    }
    applied
}

/// Reads a cookie store and encodes it for the environment variable
///
/// The store is parsed first so a corrupt file is reported here rather than
/// silently skipped by a later unattended run.
pub fn export_blob(path: &Path) -> SessionResult<String> {
    let bytes = std::fs::read(path)?;
    let _: Vec<StoredCookie> = serde_json::from_slice(&bytes)?;
    Ok(STANDARD.encode(bytes))
}
