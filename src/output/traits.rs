//! Reporting sink traits and types
//!
//! This module defines the interface the audit pipeline reports through and
//! the summary it produces for a run.

use crate::crawler::PageCheck;
use crate::sitemap::SitemapResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize report row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary statistics for one audited site
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Site root URL
    pub site: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Sitemap nodes visited (indexes and leaves)
    pub sitemaps_total: usize,
    /// Sitemap nodes that ended with an error
    pub sitemaps_failed: usize,

    /// Page entries across all sitemaps, duplicates included
    pub pages_total: usize,
    /// Distinct page URLs
    pub pages_unique: usize,
    /// Pages fetched by the page checker (0 when checks are disabled)
    pub pages_checked: usize,
    /// Checked pages with at least one error or warning
    pub pages_flagged: usize,
}

impl RunSummary {
    /// Creates an empty summary stamped with the current time
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            started_at: Utc::now(),
            finished_at: None,
            sitemaps_total: 0,
            sitemaps_failed: 0,
            pages_total: 0,
            pages_unique: 0,
            pages_checked: 0,
            pages_flagged: 0,
        }
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Pages listed in more than one place
    pub fn duplicate_pages(&self) -> usize {
        self.pages_total.saturating_sub(self.pages_unique)
    }

    /// Returns the sitemap failure rate as a percentage
    pub fn sitemap_failure_rate(&self) -> f64 {
        if self.sitemaps_total == 0 {
            return 0.0;
        }
        (self.sitemaps_failed as f64 / self.sitemaps_total as f64) * 100.0
    }
}

/// Trait for reporting sinks
///
/// A sink receives one call per visited sitemap, one per flagged page, and a
/// final call with the run summary.
pub trait ReportSink {
    /// Records the outcome of one sitemap node
    fn sitemap(&mut self, result: &SitemapResult) -> OutputResult<()>;

    /// Records a page that failed a check or raised a warning
    fn page(&mut self, check: &PageCheck) -> OutputResult<()>;

    /// Finalizes the output, performing any final writes
    fn finish(&mut self, summary: &RunSummary) -> OutputResult<()>;
}

/// Sink that keeps every row in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub sitemaps: Vec<SitemapResult>,
    pub pages: Vec<PageCheck>,
    pub summary: Option<RunSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemorySink {
    fn sitemap(&mut self, result: &SitemapResult) -> OutputResult<()> {
        self.sitemaps.push(result.clone());
        Ok(())
    }

    fn page(&mut self, check: &PageCheck) -> OutputResult<()> {
        self.pages.push(check.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> OutputResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}
