//! Simulated reading site and helpers shared by the integration tests

use async_trait::async_trait;
use episode_sweeper::browser::{Browser, BrowserError, BrowserResult};
use episode_sweeper::config::{Config, RunMode};
use episode_sweeper::crawler::{Coordinator, OperatorPrompt};
use episode_sweeper::session::{SessionManager, StoredCookie};
use episode_sweeper::timing::{Pacing, Sleeper};
use episode_sweeper::SweeperError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

pub const LISTING: &str = "https://reader.example.com/";

/// Produces the unread hrefs shown by the n-th listing scan (1-based)
pub type ListingScript = Box<dyn FnMut(u32) -> Vec<String> + Send>;

/// An in-memory stand-in for the reading site behind a browser
pub struct SimulatedSite {
    listing: ListingScript,
    current: String,
    pub scans: u32,
    pub visits: Vec<String>,
    pub cookies: Vec<StoredCookie>,
    pub page_turns: usize,
    pub quit_calls: usize,
    /// Listing scan that fails with a browser error
    pub fail_on_scan: Option<u32>,
}

impl SimulatedSite {
    pub fn new(listing: ListingScript) -> Self {
        Self {
            listing,
            current: "about:blank".to_string(),
            scans: 0,
            visits: Vec::new(),
            cookies: Vec::new(),
            page_turns: 0,
            quit_calls: 0,
            fail_on_scan: None,
        }
    }

    /// Shows `hrefs` on the first scan and nothing afterwards
    pub fn once(hrefs: Vec<String>) -> Self {
        Self::new(Box::new(move |scan| {
            if scan == 1 {
                hrefs.clone()
            } else {
                Vec::new()
            }
        }))
    }

    /// Shows the same `hrefs` on every scan
    pub fn always(hrefs: Vec<String>) -> Self {
        Self::new(Box::new(move |_| hrefs.clone()))
    }

    /// Visits that opened an episode rather than the listing
    pub fn episode_visits(&self) -> Vec<&str> {
        self.visits
            .iter()
            .map(String::as_str)
            .filter(|url| *url != LISTING)
            .collect()
    }

    fn render_listing(&mut self) -> String {
        self.scans += 1;
        let links: String = (self.listing)(self.scans)
            .iter()
            .enumerate()
            .map(|(i, href)| {
                format!(
                    r#"<a class="c-point-item" href="{}"><p>Episode {}</p></a>"#,
                    href,
                    i + 1
                )
            })
            .collect();
        format!("<html><body><nav><a href=\"/about\">About</a></nav>{}</body></html>", links)
    }
}

fn failure(what: &str) -> BrowserError {
    BrowserError::Command(format!("simulated failure: {}", what))
}

#[async_trait]
impl Browser for SimulatedSite {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        self.current = url.to_string();
        self.visits.push(url.to_string());
        Ok(())
    }

    async fn refresh(&mut self) -> BrowserResult<()> {
        Ok(())
    }

    async fn current_url(&mut self) -> BrowserResult<Url> {
        Url::parse(&self.current).map_err(|e| BrowserError::UnexpectedValue(e.to_string()))
    }

    async fn page_source(&mut self) -> BrowserResult<String> {
        if self.current != LISTING {
            return Ok("<html><body><div class=\"c-viewer\"></div></body></html>".to_string());
        }
        if self.fail_on_scan == Some(self.scans + 1) {
            return Err(failure("page_source"));
        }
        Ok(self.render_listing())
    }

    async fn add_cookie(&mut self, cookie: &StoredCookie) -> BrowserResult<()> {
        self.cookies.push(cookie.clone());
        Ok(())
    }

    async fn cookies(&mut self) -> BrowserResult<Vec<StoredCookie>> {
        Ok(self.cookies.clone())
    }

    async fn class_list(&mut self, _selector: &str) -> BrowserResult<Option<String>> {
        Ok(Some("c-viewer".to_string()))
    }

    async fn count_elements(&mut self, _selector: &str) -> BrowserResult<usize> {
        Ok(2)
    }

    async fn click(&mut self, _selector: &str) -> BrowserResult<()> {
        self.page_turns += 1;
        Ok(())
    }

    async fn scroll_to(&mut self, _position: u64) -> BrowserResult<()> {
        Ok(())
    }

    async fn scroll_height(&mut self) -> BrowserResult<u64> {
        Ok(812)
    }

    async fn viewport(&mut self) -> BrowserResult<(u64, u64)> {
        Ok((375, 812))
    }

    async fn tap(&mut self, _x: u64, _y: u64) -> BrowserResult<()> {
        self.page_turns += 1;
        Ok(())
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        self.quit_calls += 1;
        Ok(())
    }
}

/// Records pauses instead of sleeping
#[derive(Debug, Clone, Default)]
pub struct InstantSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl InstantSleeper {
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&mut self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Operator who is already logged in when asked
#[derive(Debug, Clone, Default)]
pub struct ReadyOperator {
    pub calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl OperatorPrompt for ReadyOperator {
    async fn wait_for_login(&mut self, url: &str) -> Result<(), SweeperError> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Default configuration pointed at the simulated site and a private store
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.target.url = LISTING.to_string();
    config.session.cookie_store = dir
        .path()
        .join("sweeper_cookies.json")
        .to_string_lossy()
        .into_owned();
    config
}

pub struct Harness {
    pub coordinator: Coordinator,
    pub sleeper: InstantSleeper,
    pub operator: ReadyOperator,
}

pub fn harness(config: &Config, mode: RunMode, env_blob: Option<String>) -> Harness {
    let sleeper = InstantSleeper::default();
    let operator = ReadyOperator::default();
    let session = SessionManager::new(config, mode, env_blob);
    let coordinator = Coordinator::new(
        config,
        mode,
        session,
        Pacing::seeded(Box::new(sleeper.clone()), 42),
        Box::new(operator.clone()),
    )
    .expect("default selectors are valid");

    Harness {
        coordinator,
        sleeper,
        operator,
    }
}

pub fn episode_hrefs(scan: u32, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("/episode/{}-{}", scan, i))
        .collect()
}
