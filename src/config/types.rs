use crate::timing::DelayPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Listing page the sweep starts from when nothing else is configured
pub const DEFAULT_TARGET_URL: &str = "https://pocket.shonenmagazine.com/";

/// Mobile user agent; the listing only exposes unread badges to phones
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Relative viewport position tapped when the viewer has no "next" control.
///
/// This is tuned to one site's paged viewer, where a tap near the left edge
/// turns the page forward (right-to-left reading order). It is a workaround
/// for that layout and nothing more.
pub const DEFAULT_TAP_POINT: TapPoint = TapPoint {
    x_ratio: 0.1,
    y_ratio: 0.5,
};

/// Main configuration structure for Episode Sweeper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target: TargetConfig,
    pub browser: BrowserConfig,
    pub session: SessionConfig,
    pub timing: TimingConfig,
    pub reader: ReaderConfig,
    pub selectors: SelectorConfig,
    pub crawler: CrawlerConfig,
}

/// The listing surface to sweep
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Listing URL that shows unread episodes
    pub url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARGET_URL.to_string(),
        }
    }
}

/// WebDriver connection and window setup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver endpoint (chromedriver, geckodriver, selenium)
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// Run without a visible window
    pub headless: bool,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "window-width")]
    pub window_width: u32,

    #[serde(rename = "window-height")]
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            headless: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_width: 375,
            window_height: 812,
        }
    }
}

/// Where authenticated cookies come from and go to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Environment variable holding a base64 cookie blob
    #[serde(rename = "cookie-env-var")]
    pub cookie_env_var: String,

    /// Local cookie store file, reused across interactive runs
    #[serde(rename = "cookie-store")]
    pub cookie_store: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_env_var: "SWEEPER_COOKIES_BASE64".to_string(),
            cookie_store: "sweeper_cookies.json".to_string(),
        }
    }
}

/// Settle delays and randomized pauses, in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause after the first navigation to the target
    #[serde(rename = "open-settle-ms")]
    pub open_settle_ms: u64,

    /// Pause after cookies are applied and the page refreshed
    #[serde(rename = "restore-settle-ms")]
    pub restore_settle_ms: u64,

    /// Pause after reloading the listing
    #[serde(rename = "listing-settle-ms")]
    pub listing_settle_ms: u64,

    /// Pause after opening an episode
    #[serde(rename = "episode-settle-ms")]
    pub episode_settle_ms: u64,

    /// Pause after reading so completion tracking can register
    #[serde(rename = "post-read-settle-ms")]
    pub post_read_settle_ms: u64,

    /// Pause after a queue is exhausted, before going back to the listing
    #[serde(rename = "return-home-ms")]
    pub return_home_ms: u64,

    #[serde(rename = "inter-episode")]
    pub inter_episode: DelayPolicy,

    #[serde(rename = "scroll-pause")]
    pub scroll_pause: DelayPolicy,

    #[serde(rename = "page-turn")]
    pub page_turn: DelayPolicy,
}

impl TimingConfig {
    pub fn open_settle(&self) -> Duration {
        Duration::from_millis(self.open_settle_ms)
    }

    pub fn restore_settle(&self) -> Duration {
        Duration::from_millis(self.restore_settle_ms)
    }

    pub fn listing_settle(&self) -> Duration {
        Duration::from_millis(self.listing_settle_ms)
    }

    pub fn episode_settle(&self) -> Duration {
        Duration::from_millis(self.episode_settle_ms)
    }

    pub fn post_read_settle(&self) -> Duration {
        Duration::from_millis(self.post_read_settle_ms)
    }

    pub fn return_home(&self) -> Duration {
        Duration::from_millis(self.return_home_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            open_settle_ms: 1_000,
            restore_settle_ms: 3_000,
            listing_settle_ms: 5_000,
            episode_settle_ms: 3_000,
            post_read_settle_ms: 4_000,
            return_home_ms: 2_000,
            inter_episode: DelayPolicy::from_millis(2_000, 5_000),
            scroll_pause: DelayPolicy::from_millis(500, 1_200),
            page_turn: DelayPolicy::from_millis(600, 1_200),
        }
    }
}

/// Reading simulation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Smallest scroll advance in vertical mode (CSS pixels)
    #[serde(rename = "scroll-step-min")]
    pub scroll_step_min: u64,

    /// Largest scroll advance in vertical mode (CSS pixels)
    #[serde(rename = "scroll-step-max")]
    pub scroll_step_max: u64,

    /// Pages turned in horizontal mode when they cannot be counted
    #[serde(rename = "default-page-count")]
    pub default_page_count: usize,

    /// Class token on the viewer marking vertical (scroll) mode
    #[serde(rename = "vertical-marker")]
    pub vertical_marker: String,

    #[serde(rename = "tap-point")]
    pub tap_point: TapPoint,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            scroll_step_min: 300,
            scroll_step_max: 700,
            default_page_count: 25,
            vertical_marker: "is-vertical".to_string(),
            tap_point: DEFAULT_TAP_POINT,
        }
    }
}

/// A point expressed as fractions of the viewport size
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TapPoint {
    #[serde(rename = "x-ratio")]
    pub x_ratio: f64,

    #[serde(rename = "y-ratio")]
    pub y_ratio: f64,
}

impl TapPoint {
    /// Resolves the point against a viewport of `width` x `height`
    pub fn resolve(&self, width: u64, height: u64) -> (u64, u64) {
        let x = (width as f64 * self.x_ratio) as u64;
        let y = (height as f64 * self.y_ratio) as u64;
        (x, y)
    }
}

impl Default for TapPoint {
    fn default() -> Self {
        DEFAULT_TAP_POINT
    }
}

/// CSS selectors forming the contract with the remote markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Viewer container carrying the reading mode marker
    pub viewer: String,

    /// One element per page in horizontal mode
    #[serde(rename = "page-item")]
    pub page_item: String,

    /// "Next page" control in horizontal mode
    #[serde(rename = "next-page")]
    pub next_page: String,

    /// Links to unread episodes on the listing
    #[serde(rename = "unread-link")]
    pub unread_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            viewer: ".c-viewer".to_string(),
            page_item: ".c-viewer__pages-item".to_string(),
            next_page: ".c-viewer__pager-next".to_string(),
            unread_link: "a.c-point-item".to_string(),
        }
    }
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum characters kept from an episode's link text
    #[serde(rename = "title-limit")]
    pub title_limit: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self { title_limit: 20 }
    }
}

/// Whether an operator is present to complete a login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// A terminal is attached; missing sessions can be fixed by hand
    Interactive,
    /// CI or scheduled runs; nothing can be typed and local files do not survive
    Unattended,
}

impl RunMode {
    /// Picks unattended mode when forced or when `CI` is set to a non-empty value
    pub fn detect(force_unattended: bool) -> Self {
        Self::from_ci_value(force_unattended, std::env::var("CI").ok().as_deref())
    }

    fn from_ci_value(force_unattended: bool, ci: Option<&str>) -> Self {
        if force_unattended || ci.map_or(false, |v| !v.is_empty()) {
            Self::Unattended
        } else {
            Self::Interactive
        }
    }

    pub fn is_unattended(&self) -> bool {
        matches!(self, Self::Unattended)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interactive => write!(f, "interactive"),
            Self::Unattended => write!(f, "unattended"),
        }
    }
}
