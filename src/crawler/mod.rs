//! Crawler module for sitemap fetching and traversal
//!
//! This module contains the core audit logic, including:
//! - HTTP fetching with retry logic and gzip transparency
//! - Concurrent traversal of sitemap indexes
//! - Page deduplication
//! - Optional per-page checks

mod checker;
mod dedupe;
mod fetcher;
mod traversal;

pub use checker::{check_page, check_pages, PageCheck};
pub use dedupe::{dedupe_pages, split_entries, IntoPageEntry};
pub use fetcher::{
    build_http_client, gunzip, retry_with_backoff, Fetch, FetchError, FetchResponse, HttpFetcher,
    RetryPolicy,
};
pub use traversal::{traverse, Traversal};

use crate::config::Config;
use crate::output::{ReportSink, RunSummary};
use crate::robots::locate_sitemaps;
use crate::Result;

/// Runs a complete audit of one site
///
/// This is the main entry point for library callers. It will:
/// 1. Locate the site's sitemaps
/// 2. Traverse every sitemap reachable from them
/// 3. Report each sitemap outcome to the sink
/// 4. Deduplicate the listed pages
/// 5. Check each unique page, when `[traversal] check-pages` is set
/// 6. Hand the run summary to the sink
///
/// # Arguments
///
/// * `fetch` - The fetch capability
/// * `config` - The audit configuration
/// * `root_url` - Absolute site root
/// * `override_path` - Optional caller-supplied sitemap path or URL
/// * `sink` - Where rows are reported
///
/// # Returns
///
/// * `Ok(RunSummary)` - Audit completed (individual sitemaps may have failed)
/// * `Err(ScoutError)` - The root URL is malformed or the sink failed
pub async fn audit_site(
    fetch: &dyn Fetch,
    config: &Config,
    root_url: &str,
    override_path: Option<&str>,
    sink: &mut dyn ReportSink,
) -> Result<RunSummary> {
    let mut summary = RunSummary::new(root_url.trim());
    let limit = config.traversal.max_concurrent_fetches;

    let located = locate_sitemaps(fetch, root_url, override_path).await?;
    let entries = traverse(fetch, located.sources, limit).await;
    let (sitemaps, pages) = split_entries(entries);

    summary.sitemaps_total = sitemaps.len();
    summary.sitemaps_failed = sitemaps.iter().filter(|s| s.is_error()).count();
    summary.pages_total = pages.len();

    for result in &sitemaps {
        sink.sitemap(result)?;
    }

    let unique = dedupe_pages(pages);
    summary.pages_unique = unique.len();

    if config.traversal.check_pages {
        let checks = check_pages(
            fetch,
            &unique,
            located.robots.as_ref(),
            &config.user_agent.crawler_name,
            limit,
        )
        .await;
        summary.pages_checked = checks.len();

        for check in checks.iter().filter(|c| c.is_flagged()) {
            summary.pages_flagged += 1;
            sink.page(check)?;
        }
    }

    summary.finish();
    sink.finish(&summary)?;

    Ok(summary)
}
