//! Horizontal viewer: turn every page

use crate::browser::{Browser, BrowserResult};
use crate::config::{ReaderConfig, SelectorConfig};
use crate::reader::{ReadReport, ReadingMode};
use crate::timing::{DelayPolicy, Pacing};

/// Ways to advance one page, tried in [`PageTurn::ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    /// Click the viewer's "next" control
    NextControl,
    /// Tap the configured point of the viewport
    Tap,
}

impl PageTurn {
    pub const ORDER: [PageTurn; 2] = [PageTurn::NextControl, PageTurn::Tap];

    async fn attempt(
        self,
        browser: &mut dyn Browser,
        reader: &ReaderConfig,
        selectors: &SelectorConfig,
    ) -> BrowserResult<()> {
        match self {
            PageTurn::NextControl => browser.click(&selectors.next_page).await,
            PageTurn::Tap => {
                let (width, height) = browser.viewport().await?;
                let (x, y) = reader.tap_point.resolve(width, height);
                browser.tap(x, y).await
            }
        }
    }
}

/// Turns as many pages as the viewer reports
///
/// When the pages cannot be counted, `default_page_count` turns are made.
pub(super) async fn page_through(
    browser: &mut dyn Browser,
    pacing: &mut Pacing,
    reader: &ReaderConfig,
    selectors: &SelectorConfig,
    pause: &DelayPolicy,
) -> ReadReport {
    let pages = match browser.count_elements(&selectors.page_item).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(
                "  could not count pages, assuming {}: {}",
                reader.default_page_count,
                e
            );
            reader.default_page_count
        }
    };
    tracing::info!("  turning {} pages", pages);

    let mut failed = 0;
    for page in 1..=pages {
        match turn_page(browser, reader, selectors).await {
            Some(turn) => tracing::debug!("  page {}/{} via {:?}", page, pages, turn),
            None => {
                tracing::debug!("  page {}/{} could not be turned", page, pages);
                failed += 1;
            }
        }
        pacing.pause(pause).await;
    }

    ReadReport {
        mode: ReadingMode::Horizontal,
        interactions: pages,
        failed_interactions: failed,
    }
}

/// Runs the page-turn strategies until one works
async fn turn_page(
    browser: &mut dyn Browser,
    reader: &ReaderConfig,
    selectors: &SelectorConfig,
) -> Option<PageTurn> {
    for turn in PageTurn::ORDER {
        match turn.attempt(browser, reader, selectors).await {
            Ok(()) => return Some(turn),
            Err(e) => tracing::trace!("  {:?} failed: {}", turn, e),
        }
    }
    None
}
