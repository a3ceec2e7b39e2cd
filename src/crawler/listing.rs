//! Listing scanner: finds unread episode links in the listing HTML
//!
//! # Link Rules
//!
//! **Include:** elements matching the unread-link selector whose `href`
//! resolves to an http(s) URL against the listing URL.
//!
//! **Skip:** anchors without an `href`, fragment-only and `javascript:` links,
//! URLs already visited in this run, and repeats within the same scan.

use crate::crawler::state::{EpisodeItem, VisitedSet};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Scans listing pages with a fixed selector
#[derive(Debug, Clone)]
pub struct ListingScanner {
    selector: Selector,
    title_limit: usize,
}

impl ListingScanner {
    pub fn new(selector: &str, title_limit: usize) -> Result<Self, ConfigError> {
        let selector = Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("unread_link selector '{}': {}", selector, e))
        })?;
        Ok(Self {
            selector,
            title_limit,
        })
    }

    /// Builds the queue of unread episodes, in document order
    ///
    /// # Arguments
    ///
    /// * `html` - Listing page source
    /// * `base` - Listing URL, for resolving relative links
    /// * `visited` - Episodes already read in this run; these are left out
    pub fn scan(&self, html: &str, base: &Url, visited: &VisitedSet) -> Vec<EpisodeItem> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut queue = Vec::new();

        for element in document.select(&self.selector) {
            let Some(url) = resolve_href(element.value().attr("href"), base) else {
                tracing::trace!("Skipping unread link without usable href");
                continue;
            };

            if visited.contains(&url) || !seen.insert(url.clone()) {
                continue;
            }

            queue.push(EpisodeItem {
                title: snippet(element, self.title_limit),
                url,
            });
        }

        queue
    }
}

fn resolve_href(href: Option<&str>, base: &Url) -> Option<String> {
    let href = href?.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

/// Link text on one line, cut to `limit` characters
fn snippet(element: ElementRef<'_>, limit: usize) -> String {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.chars().take(limit).collect()
}
