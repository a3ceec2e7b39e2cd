//! Crawler module: the sweep loop
//!
//! This module contains the core sweep logic, including:
//! - Listing scans for unread episodes
//! - Loop state and iteration bounds
//! - Operator prompts for manual login
//! - Overall sweep coordination

mod coordinator;
mod listing;
mod prompt;
mod state;

pub use coordinator::Coordinator;
pub use listing::ListingScanner;
pub use prompt::{OperatorPrompt, StdinPrompt};
pub use state::{CrawlState, EpisodeItem, LoopPhase, VisitedSet, MAX_ITERATIONS};

use crate::browser::{Browser, WebDriverBrowser};
use crate::config::{Config, RunMode};
use crate::output::CrawlReport;
use crate::session::SessionManager;
use crate::timing::Pacing;
use crate::SweeperError;

/// Runs a complete sweep against a real browser
///
/// This is the main entry point for starting a sweep. It will:
/// 1. Build the session manager from the configured environment variable
/// 2. Connect to the WebDriver endpoint
/// 3. Run the coordinator until it reaches a terminal outcome
/// 4. Quit the browser
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `mode` - Whether an operator is present
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The sweep ran; the report carries its outcome
/// * `Err(SweeperError)` - Setup failed before any browser work
pub async fn run_sweep(config: Config, mode: RunMode) -> Result<CrawlReport, SweeperError> {
    let session = SessionManager::from_env(&config, mode);
    let mut coordinator = Coordinator::new(
        &config,
        mode,
        session,
        Pacing::realtime(),
        Box::new(StdinPrompt),
    )?;

    let mut browser = WebDriverBrowser::connect(&config.browser, mode).await?;
    Ok(sweep(&mut coordinator, &mut browser).await)
}

/// Runs `coordinator` and then quits `browser`, whatever the outcome
pub async fn sweep(coordinator: &mut Coordinator, browser: &mut dyn Browser) -> CrawlReport {
    let report = coordinator.run(browser).await;

    if let Err(e) = browser.quit().await {
        tracing::warn!("Failed to shut down browser: {}", e);
    }

    report
}
