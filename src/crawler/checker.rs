//! Per-page checks over deduplicated sitemap pages
//!
//! Each page listed in a sitemap should answer with a 2xx status, should not
//! be a draft, and should not be blocked by the site's own robots.txt.

use crate::crawler::Fetch;
use crate::robots::ParsedRobots;
use crate::sitemap::PageEntry;
use futures::stream::{self, StreamExt};
use serde::Serialize;

/// Outcome of checking one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCheck {
    pub page: String,
    /// Sitemap the page was listed in
    pub source: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PageCheck {
    fn new(entry: &PageEntry) -> Self {
        Self {
            page: entry.page.clone(),
            source: entry.source.clone(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if the check found anything worth reporting
    pub fn is_flagged(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// Checks a single page
///
/// # Arguments
///
/// * `fetch` - The fetch capability
/// * `entry` - The page to check
/// * `robots` - The site's robots.txt, if it has one
/// * `user_agent` - Product token matched against robots.txt groups
pub async fn check_page(
    fetch: &dyn Fetch,
    entry: &PageEntry,
    robots: Option<&ParsedRobots>,
    user_agent: &str,
) -> PageCheck {
    let mut check = PageCheck::new(entry);

    if entry.page.contains("draft") {
        check
            .warnings
            .push(format!("Detected draft file: {}", entry.page));
    }

    if let Some(robots) = robots {
        if !robots.is_allowed(&entry.page, user_agent) {
            check.warnings.push("Disallowed by robots.txt".to_string());
        }
    }

    match fetch.get(&entry.page).await {
        Ok(response) if response.is_success() => {}
        Ok(response) => check.errors.push(format!(
            "must return 2xx but returns {}",
            response.status
        )),
        Err(e) => check
            .errors
            .push(format!("{} returns error {}", entry.page, e)),
    }

    if check.is_flagged() {
        tracing::debug!(
            "{}: {} error(s), {} warning(s)",
            entry.page,
            check.errors.len(),
            check.warnings.len()
        );
    }

    check
}

/// Checks every page concurrently, at most `max_concurrent` at a time
///
/// Results come back in completion order.
pub async fn check_pages(
    fetch: &dyn Fetch,
    pages: &[PageEntry],
    robots: Option<&ParsedRobots>,
    user_agent: &str,
    max_concurrent: usize,
) -> Vec<PageCheck> {
    tracing::info!("Checking {} page(s)", pages.len());

    stream::iter(pages)
        .map(|entry| check_page(fetch, entry, robots, user_agent))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
}
