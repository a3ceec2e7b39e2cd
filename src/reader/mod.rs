//! Reading simulation
//!
//! The remote service marks an episode as read after it has seen a plausible
//! reading session: the whole strip scrolled through (vertical viewer) or
//! every page turned (horizontal viewer). This module detects which viewer is
//! showing and drives it to the end.
//!
//! Nothing in here fails. Inspection errors fall back to the horizontal
//! viewer, and each scroll step or page turn is best effort.

mod horizontal;
mod vertical;

pub use horizontal::PageTurn;

use crate::browser::Browser;
use crate::config::{Config, ReaderConfig, SelectorConfig};
use crate::timing::{DelayPolicy, Pacing};
use std::time::Duration;

/// How the viewer presents an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingMode {
    /// One continuous strip, read by scrolling
    Vertical,
    /// Discrete pages, read by turning
    Horizontal,
}

impl std::fmt::Display for ReadingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// What a single [`ReadingSimulator::read`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReport {
    pub mode: ReadingMode,

    /// Scroll steps (vertical) or page turns attempted (horizontal)
    pub interactions: usize,

    /// Interactions where every strategy failed
    pub failed_interactions: usize,
}

/// Drives the episode viewer until the episode counts as read
#[derive(Debug, Clone)]
pub struct ReadingSimulator {
    reader: ReaderConfig,
    selectors: SelectorConfig,
    scroll_pause: DelayPolicy,
    page_turn: DelayPolicy,
    post_read_settle: Duration,
}

impl ReadingSimulator {
    pub fn new(config: &Config) -> Self {
        Self {
            reader: config.reader.clone(),
            selectors: config.selectors.clone(),
            scroll_pause: config.timing.scroll_pause,
            page_turn: config.timing.page_turn,
            post_read_settle: config.timing.post_read_settle(),
        }
    }

    /// Reads the episode currently open in `browser`
    pub async fn read(&self, browser: &mut dyn Browser, pacing: &mut Pacing) -> ReadReport {
        let mode = self.detect_mode(browser).await;
        tracing::info!("  reading mode: {}", mode);

        let report = match mode {
            ReadingMode::Vertical => {
                match vertical::scroll_through(browser, pacing, &self.reader, &self.scroll_pause)
                    .await
                {
                    Ok(report) => report,
                    Err(e) => {
                        tracing::warn!("  could not measure strip, paging instead: {}", e);
                        self.page_through(browser, pacing).await
                    }
                }
            }
            ReadingMode::Horizontal => self.page_through(browser, pacing).await,
        };

        tracing::info!(
            "  finished {} interactions, waiting for read tracking",
            report.interactions
        );
        pacing.settle(self.post_read_settle).await;
        report
    }

    async fn page_through(&self, browser: &mut dyn Browser, pacing: &mut Pacing) -> ReadReport {
        horizontal::page_through(
            browser,
            pacing,
            &self.reader,
            &self.selectors,
            &self.page_turn,
        )
        .await
    }

    /// Inspects the viewer's class list for the vertical marker
    ///
    /// Any failure, including a missing viewer, means horizontal.
    pub async fn detect_mode(&self, browser: &mut dyn Browser) -> ReadingMode {
        match browser.class_list(&self.selectors.viewer).await {
            Ok(Some(classes)) if has_class(&classes, &self.reader.vertical_marker) => {
                ReadingMode::Vertical
            }
            Ok(_) => ReadingMode::Horizontal,
            Err(e) => {
                tracing::warn!("  could not inspect viewer, assuming horizontal: {}", e);
                ReadingMode::Horizontal
            }
        }
    }
}

fn has_class(class_list: &str, class: &str) -> bool {
    class_list.split_whitespace().any(|c| c == class)
}
