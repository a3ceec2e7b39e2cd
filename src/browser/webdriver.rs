//! WebDriver backend built on fantoccini
//!
//! Connects to an already running WebDriver endpoint (chromedriver or a
//! selenium server). Installing or spawning the driver is left to the
//! environment.

use crate::browser::{Browser, BrowserError, BrowserResult};
use crate::config::{BrowserConfig, RunMode};
use crate::session::{SameSitePolicy, StoredCookie};
use async_trait::async_trait;
use cookie::SameSite;
use fantoccini::cookies::Cookie;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Value};
use time::OffsetDateTime;
use url::Url;

const SCROLL_TO_SCRIPT: &str = "window.scrollTo(0, arguments[0]);";
const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";
const VIEWPORT_SCRIPT: &str = "return [window.innerWidth, window.innerHeight];";
const TAP_SCRIPT: &str = r#"
const x = arguments[0], y = arguments[1];
const target = document.elementFromPoint(x, y);
if (!target) { return false; }
for (const type of ["pointerdown", "mousedown", "pointerup", "mouseup", "click"]) {
    target.dispatchEvent(new MouseEvent(type, { bubbles: true, cancelable: true, clientX: x, clientY: y, view: window }));
}
return true;
"#;

/// A fantoccini client driving one browser window
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Opens a new session on the configured WebDriver endpoint
    ///
    /// Unattended runs are always headless; there is nobody to look at a window.
    pub async fn connect(config: &BrowserConfig, mode: RunMode) -> BrowserResult<Self> {
        let headless = config.headless || mode.is_unattended();

        let mut args = vec![
            format!("--user-agent={}", config.user_agent),
            format!("--window-size={},{}", config.window_width, config.window_height),
        ];
        if headless {
            tracing::info!("Starting browser in headless mode");
            args.push("--headless=new".to_string());
            args.push("--no-sandbox".to_string());
            args.push("--disable-dev-shm-usage".to_string());
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| BrowserError::Connect(format!("{}: {}", config.webdriver_url, e)))?;

        tracing::debug!("Connected to WebDriver at {}", config.webdriver_url);
        Ok(Self { client })
    }

    async fn first(&self, selector: &str) -> BrowserResult<Option<Element>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().next())
    }

    async fn script(&self, script: &str, args: Vec<Value>) -> BrowserResult<Value> {
        Ok(self.client.execute(script, args).await?)
    }
}

impl From<CmdError> for BrowserError {
    fn from(error: CmdError) -> Self {
        BrowserError::Command(error.to_string())
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        Ok(self.client.goto(url).await?)
    }

    async fn refresh(&mut self) -> BrowserResult<()> {
        Ok(self.client.refresh().await?)
    }

    async fn current_url(&mut self) -> BrowserResult<Url> {
        Ok(self.client.current_url().await?)
    }

    async fn page_source(&mut self) -> BrowserResult<String> {
        Ok(self.client.source().await?)
    }

    async fn add_cookie(&mut self, cookie: &StoredCookie) -> BrowserResult<()> {
        Ok(self.client.add_cookie(to_webdriver_cookie(cookie)).await?)
    }

    async fn cookies(&mut self) -> BrowserResult<Vec<StoredCookie>> {
        let cookies = self.client.get_all_cookies().await?;
        Ok(cookies.iter().map(from_webdriver_cookie).collect())
    }

    async fn class_list(&mut self, selector: &str) -> BrowserResult<Option<String>> {
        match self.first(selector).await? {
            Some(element) => Ok(element.attr("class").await?),
            None => Ok(None),
        }
    }

    async fn count_elements(&mut self, selector: &str) -> BrowserResult<usize> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements.len())
    }

    async fn click(&mut self, selector: &str) -> BrowserResult<()> {
        let element = self
            .first(selector)
            .await?
            .ok_or_else(|| BrowserError::NoSuchElement {
                selector: selector.to_string(),
            })?;
        element.click().await?;
        Ok(())
    }

    async fn scroll_to(&mut self, position: u64) -> BrowserResult<()> {
        self.script(SCROLL_TO_SCRIPT, vec![json!(position)]).await?;
        Ok(())
    }

    async fn scroll_height(&mut self) -> BrowserResult<u64> {
        let value = self.script(SCROLL_HEIGHT_SCRIPT, Vec::new()).await?;
        as_pixels(&value)
    }

    async fn viewport(&mut self) -> BrowserResult<(u64, u64)> {
        let value = self.script(VIEWPORT_SCRIPT, Vec::new()).await?;
        match value.as_array().map(Vec::as_slice) {
            Some([width, height]) => Ok((as_pixels(width)?, as_pixels(height)?)),
            _ => Err(BrowserError::UnexpectedValue(format!(
                "viewport size: {}",
                value
            ))),
        }
    }

    async fn tap(&mut self, x: u64, y: u64) -> BrowserResult<()> {
        let hit = self.script(TAP_SCRIPT, vec![json!(x), json!(y)]).await?;
        if hit.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(BrowserError::NoSuchElement {
                selector: format!("point ({}, {})", x, y),
            })
        }
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        Ok(self.client.clone().close().await?)
    }
}

/// Reads a JS number as whole pixels; layouts may report fractions
fn as_pixels(value: &Value) -> BrowserResult<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
        .ok_or_else(|| BrowserError::UnexpectedValue(format!("expected pixels, got {}", value)))
}

fn to_webdriver_cookie(stored: &StoredCookie) -> Cookie<'static> {
    let mut cookie = Cookie::new(stored.name.clone(), stored.value.clone());
    if let Some(domain) = &stored.domain {
        cookie.set_domain(domain.clone());
    }
    if let Some(path) = &stored.path {
        cookie.set_path(path.clone());
    }
    if let Some(secure) = stored.secure {
        cookie.set_secure(secure);
    }
    if let Some(http_only) = stored.http_only {
        cookie.set_http_only(http_only);
    }
    if let Some(same_site) = stored.same_site {
        cookie.set_same_site(match same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        });
    }
    if let Some(expiry) = stored.expiry {
        if let Ok(at) = OffsetDateTime::from_unix_timestamp(expiry) {
            cookie.set_expires(at);
        }
    }
    cookie
}

fn from_webdriver_cookie(cookie: &Cookie<'static>) -> StoredCookie {
    StoredCookie {
        name: cookie.name().to_string(),
        value: cookie.value().to_string(),
        domain: cookie.domain().map(str::to_string),
        path: cookie.path().map(str::to_string),
        expiry: cookie.expires_datetime().map(|at| at.unix_timestamp()),
        secure: cookie.secure(),
        http_only: cookie.http_only(),
        same_site: cookie.same_site().map(|same_site| match same_site {
            SameSite::Strict => SameSitePolicy::Strict,
            SameSite::Lax => SameSitePolicy::Lax,
            _ => SameSitePolicy::None,
        }),
    }
}
