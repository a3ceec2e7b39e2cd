//! Crawl state: discovered episodes, visit history, and loop phases

use crate::output::Outcome;
use std::collections::HashSet;

/// Hard cap on listing passes per run
///
/// The listing is not trusted to ever report empty (a badge can stick after
/// the episode was read), so the loop stops after this many passes no matter
/// what it shows.
pub const MAX_ITERATIONS: u32 = 6;

/// An unread episode found on the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeItem {
    /// Absolute episode URL; identifies the episode
    pub url: String,

    /// Short label from the link text, for progress output
    pub title: String,
}

/// URLs processed so far in this run
///
/// Only grows. Not persisted: every run starts empty.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url`; returns false if it was already present
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Per-run loop bookkeeping
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Completed listing passes (scan plus processing of its queue)
    pub iteration_count: u32,

    pub max_iterations: u32,

    /// Queue built by the latest scan
    pub current_queue: Vec<EpisodeItem>,

    /// Listing scans performed, including a final empty one
    pub scans: u32,

    /// Episodes read, in order
    pub processed: Vec<EpisodeItem>,

    pub visited: VisitedSet,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            iteration_count: 0,
            max_iterations: MAX_ITERATIONS,
            current_queue: Vec::new(),
            scans: 0,
            processed: Vec::new(),
            visited: VisitedSet::new(),
        }
    }

    /// Counts a finished pass; true once the cap is reached
    pub fn complete_iteration(&mut self) -> bool {
        self.iteration_count += 1;
        self.current_queue.clear();
        self.iteration_count >= self.max_iterations
    }

    /// Marks an episode as read
    pub fn record_processed(&mut self, episode: &EpisodeItem) {
        if self.visited.insert(&episode.url) {
            self.processed.push(episode.clone());
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

/// Phases of the crawl loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    /// Restoring cookies from the configured sources
    SessionRestore,

    /// Waiting for an operator to log in by hand (interactive runs only)
    LoginWait,

    /// Scanning the listing and reading its queue
    Iterate,

    /// Finished; no further transitions
    Done(Outcome),
}
