//! Sweep report generation

use crate::crawler::{CrawlState, EpisodeItem};
use crate::SweeperError;
use chrono::{DateTime, Utc};

/// How a sweep ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The listing showed nothing unread
    NoUnread,

    /// Stopped after the maximum number of listing passes
    IterationCap,

    /// Unattended run with no usable session source
    SessionUnavailable,

    /// An unrecoverable error ended the run
    Aborted(String),
}

impl Outcome {
    /// Whether the sweep ended normally
    ///
    /// Hitting the iteration cap counts: the loop did all it is allowed to.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::NoUnread | Self::IterationCap)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoUnread => write!(f, "all episodes read"),
            Self::IterationCap => write!(f, "iteration cap reached"),
            Self::SessionUnavailable => write!(f, "no session available"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Summary of a finished sweep
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: Outcome,

    /// Completed listing passes
    pub iterations: u32,

    /// Listing scans, including the final empty one
    pub scans: u32,

    /// Episodes read, in processing order
    pub episodes: Vec<EpisodeItem>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Builds a report from the loop state at the end of a run
    pub fn new(
        outcome: Outcome,
        state: &CrawlState,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            outcome,
            iterations: state.iteration_count,
            scans: state.scans,
            episodes: state.processed.clone(),
            started_at,
            finished_at,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// One-line summary printed when the CLI exits
    pub fn status_line(&self) -> String {
        let marker = if self.outcome.is_success() { "✓" } else { "✗" };
        format!(
            "{} Sweep finished: {} ({} episodes read in {} passes)",
            marker,
            self.outcome,
            self.episodes.len(),
            self.iterations
        )
    }
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Sweep Report ===\n");

    println!("Overview:");
    println!("  Outcome: {}", report.outcome);
    println!("  Listing passes: {}", report.iterations);
    println!("  Listing scans: {}", report.scans);
    println!("  Episodes read: {}", report.episodes.len());
    println!("  Duration: {}s", report.duration_seconds());
    println!();

    if !report.episodes.is_empty() {
        println!("Episodes:");
        for episode in &report.episodes {
            println!("  - {} ({})", episode.title, episode.url);
        }
        println!();
    }

    println!("{}", report.status_line());
}

/// Status line for a sweep that never got a browser
pub fn startup_failure_line(error: &SweeperError) -> String {
    format!("✗ Sweep finished: could not start ({})", error)
}
