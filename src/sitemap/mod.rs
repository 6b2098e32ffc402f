//! Sitemap data model and document handling
//!
//! This module defines the values exchanged between the locator, the
//! traversal engine and the reporting sink, plus fetching and parsing of a
//! single sitemap document.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument, MAX_URLS_PER_SITEMAP};

use crate::crawler::{Fetch, FetchError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// How a sitemap URL was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provenance {
    /// `Sitemap:` directive in robots.txt
    #[serde(rename = "robots.txt")]
    RobotsTxt,

    /// Well-known location such as `/sitemap.xml`
    #[serde(rename = "default-path")]
    DefaultPath,

    /// `<sitemap><loc>` entry of a sitemap index
    #[serde(rename = "sitemap-index")]
    SitemapIndex,

    /// Explicit override from the caller
    #[serde(rename = "user-provided")]
    UserProvided,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RobotsTxt => "robots.txt",
            Self::DefaultPath => "default-path",
            Self::SitemapIndex => "sitemap-index",
            Self::UserProvided => "user-provided",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sitemap URL and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SitemapSource {
    pub url: String,
    pub provenance: Provenance,
    /// Index that referenced this sitemap, for `SitemapIndex` provenance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl SitemapSource {
    pub fn new(url: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            url: url.into(),
            provenance,
            parent: None,
        }
    }

    /// A child sitemap referenced by the index at `parent`
    pub fn from_index(url: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            provenance: Provenance::SitemapIndex,
            parent: Some(parent.into()),
        }
    }
}

/// Outcome of fetching and parsing one sitemap
///
/// Exactly one of `locs` or `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapResult {
    pub url: String,
    pub source: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Direct entries: page URLs for a urlset, child sitemaps for an index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SitemapResult {
    pub fn parsed(source: &SitemapSource, locs: usize, warning: Option<String>) -> Self {
        Self {
            url: source.url.clone(),
            source: source.provenance,
            parent: source.parent.clone(),
            locs: Some(locs),
            error: None,
            warning,
        }
    }

    pub fn failed(source: &SitemapSource, error: &SitemapError) -> Self {
        Self {
            url: source.url.clone(),
            source: source.provenance,
            parent: source.parent.clone(),
            locs: None,
            error: Some(error.to_string()),
            warning: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A content page discovered in a sitemap
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PageEntry {
    pub page: String,
    /// URL of the sitemap the page was listed in
    pub source: String,
}

impl PageEntry {
    pub fn new(page: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            source: source.into(),
        }
    }
}

/// One item of traversal output
///
/// Serialized untagged: a `url` field marks a sitemap result, a `page` field
/// marks a page entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TraversalEntry {
    Sitemap(SitemapResult),
    Page(PageEntry),
}

impl TraversalEntry {
    pub fn as_sitemap(&self) -> Option<&SitemapResult> {
        match self {
            Self::Sitemap(result) => Some(result),
            Self::Page(_) => None,
        }
    }

    pub fn as_page(&self) -> Option<&PageEntry> {
        match self {
            Self::Page(entry) => Some(entry),
            Self::Sitemap(_) => None,
        }
    }
}

impl From<SitemapResult> for TraversalEntry {
    fn from(result: SitemapResult) -> Self {
        Self::Sitemap(result)
    }
}

impl From<PageEntry> for TraversalEntry {
    fn from(entry: PageEntry) -> Self {
        Self::Page(entry)
    }
}

/// Per-sitemap failure, recorded as `SitemapResult::error`
#[derive(Debug, Clone, Error)]
pub enum SitemapError {
    #[error("sitemap not found (HTTP {status})")]
    NotFound { status: u16 },

    #[error("expected XML but received '{content_type}'")]
    HtmlContent { content_type: String },

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("unrecognized sitemap root element <{0}>")]
    UnknownRoot(String),
}

impl SitemapError {
    /// Returns true when the URL simply does not host a sitemap
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::HtmlContent { .. })
    }
}

/// Fetches a sitemap document and returns its (decompressed) text
///
/// Non-2xx statuses and HTML responses mean "no sitemap at this URL" and are
/// reported without retrying.
pub async fn fetch_sitemap_document(
    fetch: &dyn Fetch,
    url: &str,
) -> Result<String, SitemapError> {
    let response = fetch.get(url).await?;

    if !response.is_success() {
        return Err(SitemapError::NotFound {
            status: response.status,
        });
    }

    if response.is_html() {
        return Err(SitemapError::HtmlContent {
            content_type: response.content_type,
        });
    }

    if response.is_gzip_content_type() {
        tracing::debug!("{} is gzipped", url);
    }

    Ok(response.text()?)
}
