//! Page deduplication and output splitting
//!
//! Pages are keyed by their URL exactly as listed: no normalization, so case
//! and trailing-slash variants count as different pages.

use crate::sitemap::{PageEntry, SitemapResult, TraversalEntry};
use std::collections::HashSet;

/// Anything that may carry a [`PageEntry`]
pub trait IntoPageEntry {
    fn into_page_entry(self) -> Option<PageEntry>;
}

impl IntoPageEntry for PageEntry {
    fn into_page_entry(self) -> Option<PageEntry> {
        Some(self)
    }
}

impl IntoPageEntry for TraversalEntry {
    fn into_page_entry(self) -> Option<PageEntry> {
        match self {
            TraversalEntry::Page(entry) => Some(entry),
            TraversalEntry::Sitemap(_) => None,
        }
    }
}

/// Reduces entries to unique pages in a single pass
///
/// Accepts raw traversal output (sitemap results are dropped) or a page
/// list. The first occurrence of a page wins and keeps its source; since
/// traversal output is in completion order, which source that is, is best
/// effort.
///
/// # Examples
///
/// ```
/// use sitemap_scout::crawler::dedupe_pages;
/// use sitemap_scout::PageEntry;
///
/// let pages = vec![
///     PageEntry::new("https://example.com/a", "https://example.com/s1.xml"),
///     PageEntry::new("https://example.com/a", "https://example.com/s2.xml"),
/// ];
/// let unique = dedupe_pages(pages);
/// assert_eq!(unique.len(), 1);
/// assert_eq!(unique[0].source, "https://example.com/s1.xml");
/// ```
pub fn dedupe_pages<I>(entries: I) -> Vec<PageEntry>
where
    I: IntoIterator,
    I::Item: IntoPageEntry,
{
    let mut seen: HashSet<String> = HashSet::new();
    entries
        .into_iter()
        .filter_map(IntoPageEntry::into_page_entry)
        .filter(|entry| seen.insert(entry.page.clone()))
        .collect()
}

/// Separates traversal output into sitemap results and page entries
pub fn split_entries(entries: Vec<TraversalEntry>) -> (Vec<SitemapResult>, Vec<PageEntry>) {
    let mut sitemaps = Vec::new();
    let mut pages = Vec::new();
    for entry in entries {
        match entry {
            TraversalEntry::Sitemap(result) => sitemaps.push(result),
            TraversalEntry::Page(page) => pages.push(page),
        }
    }
    (sitemaps, pages)
}
