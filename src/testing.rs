//! Test doubles shared by unit tests
//!
//! [`FakeBrowser`] is a scripted in-memory page: tests set its public fields
//! to shape what the "remote" returns and inspect them afterwards to see what
//! the code under test did. [`RecordingSleeper`] records pauses instead of
//! sleeping.

use crate::browser::{Browser, BrowserError, BrowserResult};
use crate::session::StoredCookie;
use crate::timing::{Pacing, Sleeper};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct FakeBrowser {
    pub url: String,
    pub visits: Vec<String>,
    pub refreshes: usize,
    pub fail_goto: bool,
    pub source: String,

    pub cookies: Vec<StoredCookie>,
    pub rejected_cookies: HashSet<String>,
    pub fail_cookie_read: bool,

    /// `Err(())` makes mode inspection fail
    pub viewer_class: Result<Option<String>, ()>,
    /// `None` makes page enumeration fail
    pub page_count: Option<usize>,
    pub has_next_control: bool,
    pub tap_hits: bool,
    pub next_clicks: usize,
    pub taps: Vec<(u64, u64)>,

    /// Successive `scroll_height` answers; the last one repeats
    pub heights: VecDeque<u64>,
    pub fail_height: bool,
    pub scroll_positions: Vec<u64>,
    pub viewport: (u64, u64),

    pub quit_calls: usize,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            visits: Vec::new(),
            refreshes: 0,
            fail_goto: false,
            source: String::new(),
            cookies: Vec::new(),
            rejected_cookies: HashSet::new(),
            fail_cookie_read: false,
            viewer_class: Ok(None),
            page_count: Some(0),
            has_next_control: true,
            tap_hits: true,
            next_clicks: 0,
            taps: Vec::new(),
            heights: VecDeque::from(vec![0]),
            fail_height: false,
            scroll_positions: Vec::new(),
            viewport: (375, 812),
            quit_calls: 0,
        }
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookie_names(&self) -> Vec<&str> {
        self.cookies.iter().map(|c| c.name.as_str()).collect()
    }
}

fn failure(what: &str) -> BrowserError {
    BrowserError::Command(format!("scripted failure: {}", what))
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        if self.fail_goto {
            return Err(failure("goto"));
        }
        self.url = url.to_string();
        self.visits.push(url.to_string());
        Ok(())
    }

    async fn refresh(&mut self) -> BrowserResult<()> {
        self.refreshes += 1;
        Ok(())
    }

    async fn current_url(&mut self) -> BrowserResult<Url> {
        Url::parse(&self.url).map_err(|e| BrowserError::UnexpectedValue(e.to_string()))
    }

    async fn page_source(&mut self) -> BrowserResult<String> {
        Ok(self.source.clone())
    }

    async fn add_cookie(&mut self, cookie: &StoredCookie) -> BrowserResult<()> {
        if self.rejected_cookies.contains(&cookie.name) {
            return Err(failure("invalid cookie domain"));
        }
        self.cookies.push(cookie.clone());
        Ok(())
    }

    async fn cookies(&mut self) -> BrowserResult<Vec<StoredCookie>> {
        if self.fail_cookie_read {
            return Err(failure("cookies"));
        }
        Ok(self.cookies.clone())
    }

    async fn class_list(&mut self, _selector: &str) -> BrowserResult<Option<String>> {
        self.viewer_class.clone().map_err(|_| failure("class_list"))
    }

    async fn count_elements(&mut self, _selector: &str) -> BrowserResult<usize> {
        self.page_count.ok_or_else(|| failure("count_elements"))
    }

    async fn click(&mut self, selector: &str) -> BrowserResult<()> {
        if !self.has_next_control {
            return Err(BrowserError::NoSuchElement {
                selector: selector.to_string(),
            });
        }
        self.next_clicks += 1;
        Ok(())
    }

    async fn scroll_to(&mut self, position: u64) -> BrowserResult<()> {
        self.scroll_positions.push(position);
        Ok(())
    }

    async fn scroll_height(&mut self) -> BrowserResult<u64> {
        if self.fail_height {
            return Err(failure("scroll_height"));
        }
        let height = if self.heights.len() > 1 {
            self.heights.pop_front()
        } else {
            self.heights.front().copied()
        };
        height.ok_or_else(|| failure("scroll_height"))
    }

    async fn viewport(&mut self) -> BrowserResult<(u64, u64)> {
        Ok(self.viewport)
    }

    async fn tap(&mut self, x: u64, y: u64) -> BrowserResult<()> {
        if !self.tap_hits {
            return Err(failure("tap"));
        }
        self.taps.push((x, y));
        Ok(())
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        self.quit_calls += 1;
        Ok(())
    }
}

/// Records requested pauses and returns immediately
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.recorded().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&mut self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Seeded pacing that never actually waits
pub fn instant_pacing() -> Pacing {
    Pacing::seeded(Box::new(RecordingSleeper::new()), 0x5eed)
}
