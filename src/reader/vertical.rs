//! Vertical viewer: scroll the strip to the bottom

use crate::browser::{Browser, BrowserError};
use crate::config::ReaderConfig;
use crate::reader::{ReadReport, ReadingMode};
use crate::timing::{DelayPolicy, Pacing};

/// Scrolls down in random steps until the position reaches the page extent
///
/// The extent is re-measured after every step because the strip loads lazily
/// and grows while scrolling. Termination holds because the step is at least
/// one pixel and the real page length is finite.
///
/// # Errors
///
/// Fails only when the initial extent cannot be measured; the caller then
/// falls back to paging.
pub(super) async fn scroll_through(
    browser: &mut dyn Browser,
    pacing: &mut Pacing,
    reader: &ReaderConfig,
    pause: &DelayPolicy,
) -> Result<ReadReport, BrowserError> {
    let mut extent = browser.scroll_height().await?;
    tracing::debug!("  scrolling through {}px", extent);

    let mut position = 0u64;
    let mut steps = 0;
    let mut failed = 0;

    while position < extent {
        let step = pacing
            .draw(reader.scroll_step_min, reader.scroll_step_max)
            .max(1);
        position = position.saturating_add(step);
        steps += 1;

        if let Err(e) = browser.scroll_to(position).await {
            tracing::debug!("  scroll to {} failed: {}", position, e);
            failed += 1;
        }

        match browser.scroll_height().await {
            Ok(height) => extent = height,
            Err(e) => tracing::debug!("  keeping extent {}px: {}", extent, e),
        }

        pacing.pause(pause).await;
    }

    Ok(ReadReport {
        mode: ReadingMode::Vertical,
        interactions: steps,
        failed_interactions: failed,
    })
}
