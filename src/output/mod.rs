//! Output module for reporting audit results
//!
//! This module handles:
//! - The `ReportSink` interface the audit pipeline writes through
//! - In-memory and JSON-lines sinks
//! - Run summaries and their log output

mod jsonl;
mod traits;

pub use jsonl::JsonLinesSink;
pub use traits::{MemorySink, OutputError, OutputResult, ReportSink, RunSummary};

/// Logs a run summary at info level
pub fn log_summary(summary: &RunSummary) {
    tracing::info!(
        "{}: {} sitemap(s), {} failed ({:.1}%)",
        summary.site,
        summary.sitemaps_total,
        summary.sitemaps_failed,
        summary.sitemap_failure_rate()
    );
    tracing::info!(
        "{}: {} page entries, {} unique, {} duplicate",
        summary.site,
        summary.pages_total,
        summary.pages_unique,
        summary.duplicate_pages()
    );
    if summary.pages_checked > 0 {
        tracing::info!(
            "{}: {} page(s) checked, {} flagged",
            summary.site,
            summary.pages_checked,
            summary.pages_flagged
        );
    }
    if let Some(seconds) = summary.duration_seconds() {
        tracing::info!("{}: finished in {:.2}s", summary.site, seconds);
    }
}
