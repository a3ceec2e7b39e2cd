//! Crawl coordinator - the sweep's control loop
//!
//! This module drives a run through its phases:
//! - restoring the session (or waiting for a manual login)
//! - scanning the listing for unread episodes
//! - reading each queued episode and saving cookies after it
//! - stopping when nothing is unread or the iteration cap is hit
//!
//! Errors that reach this level abort the run; everything recoverable has
//! already been handled by the session manager and reader.

use crate::browser::Browser;
use crate::config::{Config, RunMode, TimingConfig};
use crate::crawler::listing::ListingScanner;
use crate::crawler::prompt::OperatorPrompt;
use crate::crawler::state::{CrawlState, LoopPhase};
use crate::output::{CrawlReport, Outcome};
use crate::reader::ReadingSimulator;
use crate::session::SessionManager;
use crate::timing::Pacing;
use crate::SweeperError;
use chrono::Utc;

/// Owns everything a run needs except the browser, which is lent per call
pub struct Coordinator {
    target_url: String,
    mode: RunMode,
    timing: TimingConfig,
    session: SessionManager,
    reader: ReadingSimulator,
    scanner: ListingScanner,
    pacing: Pacing,
    prompt: Box<dyn OperatorPrompt>,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Errors
    ///
    /// Fails if the unread-link selector does not parse.
    pub fn new(
        config: &Config,
        mode: RunMode,
        session: SessionManager,
        pacing: Pacing,
        prompt: Box<dyn OperatorPrompt>,
    ) -> Result<Self, SweeperError> {
        let scanner =
            ListingScanner::new(&config.selectors.unread_link, config.crawler.title_limit)?;

        Ok(Self {
            target_url: config.target.url.clone(),
            mode,
            timing: config.timing.clone(),
            session,
            reader: ReadingSimulator::new(config),
            scanner,
            pacing,
            prompt,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Runs the sweep to completion
    ///
    /// Never fails: an unrecoverable error ends the run with
    /// [`Outcome::Aborted`] and whatever was read so far.
    pub async fn run(&mut self, browser: &mut dyn Browser) -> CrawlReport {
        let started_at = Utc::now();
        let mut state = CrawlState::new();
        tracing::info!("Starting {} sweep of {}", self.mode, self.target_url);

        let outcome = match self.drive(browser, &mut state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Sweep aborted: {}", e);
                Outcome::Aborted(e.to_string())
            }
        };

        CrawlReport::new(outcome, &state, started_at, Utc::now())
    }

    async fn drive(
        &mut self,
        browser: &mut dyn Browser,
        state: &mut CrawlState,
    ) -> Result<Outcome, SweeperError> {
        let mut phase = LoopPhase::SessionRestore;

        loop {
            phase = match phase {
                LoopPhase::SessionRestore => self.restore_session(browser).await?,
                LoopPhase::LoginWait => self.wait_for_login(browser).await?,
                LoopPhase::Iterate => self.iterate(browser, state).await?,
                LoopPhase::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn restore_session(
        &mut self,
        browser: &mut dyn Browser,
    ) -> Result<LoopPhase, SweeperError> {
        let restored = self
            .session
            .restore(browser, &mut self.pacing, &self.target_url)
            .await?;

        if restored {
            tracing::info!("Logged in, starting sweep");
            return Ok(LoopPhase::Iterate);
        }

        if self.mode.is_unattended() {
            tracing::error!(
                "No usable session in an unattended run. Set {} to a cookie blob (see --export-cookies).",
                self.session.env_var()
            );
            return Ok(LoopPhase::Done(Outcome::SessionUnavailable));
        }

        Ok(LoopPhase::LoginWait)
    }

    async fn wait_for_login(
        &mut self,
        browser: &mut dyn Browser,
    ) -> Result<LoopPhase, SweeperError> {
        tracing::info!("Opening {} for manual login", self.target_url);
        browser.goto(&self.target_url).await?;
        self.prompt.wait_for_login(&self.target_url).await?;
        self.save_session(browser).await;
        Ok(LoopPhase::Iterate)
    }

    /// One listing pass: scan, read every queued episode, count the pass
    async fn iterate(
        &mut self,
        browser: &mut dyn Browser,
        state: &mut CrawlState,
    ) -> Result<LoopPhase, SweeperError> {
        tracing::info!("Checking listing {}", self.target_url);
        browser.goto(&self.target_url).await?;
        self.pacing.settle(self.timing.listing_settle()).await;

        let base = browser.current_url().await?;
        let html = browser.page_source().await?;
        state.scans += 1;
        state.current_queue = self.scanner.scan(&html, &base, &state.visited);

        if state.current_queue.is_empty() {
            tracing::info!("No unread episodes left");
            return Ok(LoopPhase::Done(Outcome::NoUnread));
        }

        let total = state.current_queue.len();
        tracing::info!("Found {} unread episodes", total);

        for (index, episode) in state.current_queue.clone().iter().enumerate() {
            tracing::info!("[{}/{}] {}", index + 1, total, episode.title);
            browser.goto(&episode.url).await?;
            self.pacing.settle(self.timing.episode_settle()).await;

            let report = self.reader.read(browser, &mut self.pacing).await;
            if report.failed_interactions > 0 {
                tracing::debug!(
                    "  {} of {} interactions failed",
                    report.failed_interactions,
                    report.interactions
                );
            }

            state.record_processed(episode);
            self.save_session(browser).await;
            self.pacing.pause(&self.timing.inter_episode).await;
        }

        tracing::info!("Returning to listing");
        self.pacing.settle(self.timing.return_home()).await;

        if state.complete_iteration() {
            tracing::warn!(
                "Stopping after {} passes; the listing may still show unread episodes",
                state.iteration_count
            );
            return Ok(LoopPhase::Done(Outcome::IterationCap));
        }

        Ok(LoopPhase::Iterate)
    }

    /// Persists cookies; a failed save costs only the next run's login
    async fn save_session(&mut self, browser: &mut dyn Browser) {
        if let Err(e) = self.session.persist(browser).await {
            tracing::warn!(
                "Failed to save session to {}: {}",
                self.session.store_path().display(),
                e
            );
        }
    }
}
