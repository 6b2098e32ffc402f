//! Robots.txt handling and sitemap location
//!
//! This module decides where a site's sitemaps live. Candidates come from, in
//! order of precedence:
//!
//! 1. An explicit override supplied by the caller (`user-provided`)
//! 2. `Sitemap:` directives in the origin's `/robots.txt` (`robots.txt`)
//! 3. `{root}/sitemap.xml`, then `{root}/sitemap_index.xml` (`default-path`)
//!
//! The first non-empty candidate set wins; sets are never merged.

mod parser;

pub use parser::{extract_sitemap_directives, ParsedRobots};

use crate::crawler::Fetch;
use crate::sitemap::{fetch_sitemap_document, Provenance, SitemapSource};
use crate::url::{join_root, parse_root_url, robots_url};
use crate::Result;
use url::Url;

/// Well-known sitemap locations, probed in this order
pub const DEFAULT_SITEMAP_PATHS: [&str; 2] = ["sitemap.xml", "sitemap_index.xml"];

/// Outcome of sitemap location for one site
#[derive(Debug, Clone)]
pub struct Located {
    /// Candidate sitemaps, in discovery order
    pub sources: Vec<SitemapSource>,
    /// robots.txt, when it was fetched successfully
    pub robots: Option<ParsedRobots>,
}

/// Fetches robots.txt for a site root
///
/// Any failure (network error, non-2xx status) means "no robots.txt" and is
/// logged at debug level only.
///
/// # Returns
///
/// * `Some(ParsedRobots)` - robots.txt was retrieved
/// * `None` - robots.txt does not exist or could not be fetched
pub async fn fetch_robots(fetch: &dyn Fetch, root: &Url) -> Option<ParsedRobots> {
    let url = robots_url(root).ok()?;

    match fetch.get(url.as_str()).await {
        Ok(response) if response.is_success() => match response.text() {
            Ok(text) => Some(ParsedRobots::from_content(&text)),
            Err(e) => {
                tracing::debug!("Unreadable robots.txt at {}: {}", url, e);
                None
            }
        },
        Ok(response) => {
            tracing::debug!("No robots.txt at {} (HTTP {})", url, response.status);
            None
        }
        Err(e) => {
            tracing::debug!("Failed to fetch {}: {}", url, e);
            None
        }
    }
}

/// Determines the sitemap entry points for a site
///
/// # Arguments
///
/// * `fetch` - The fetch capability used for robots.txt and default-path probes
/// * `root_url` - Absolute site root, e.g. `https://example.com`
/// * `override_path` - Sitemap path or URL supplied by the caller; resolved
///   against the root and used verbatim as the only source
///
/// # Returns
///
/// * `Ok(Located)` - Candidate sources (possibly empty) and robots.txt
/// * `Err(ScoutError::InvalidRootUrl)` - The root URL is malformed
pub async fn locate_sitemaps(
    fetch: &dyn Fetch,
    root_url: &str,
    override_path: Option<&str>,
) -> Result<Located> {
    let root = parse_root_url(root_url)?;

    // robots.txt is still read with an override, for the page checker
    let robots = fetch_robots(fetch, &root).await;

    if let Some(path) = override_path {
        let url = join_root(&root, path)?;
        tracing::info!("Using caller-supplied sitemap {}", url);
        return Ok(Located {
            sources: vec![SitemapSource::new(url.as_str(), Provenance::UserProvided)],
            robots,
        });
    }

    if let Some(parsed) = &robots {
        if !parsed.sitemaps().is_empty() {
            tracing::info!(
                "Found {} sitemap(s) in robots.txt for {}",
                parsed.sitemaps().len(),
                root
            );
            let sources = parsed
                .sitemaps()
                .iter()
                .map(|url| SitemapSource::new(url.as_str(), Provenance::RobotsTxt))
                .collect();
            return Ok(Located { sources, robots });
        }
    }

    let sources = probe_default_paths(fetch, &root).await?;
    if sources.is_empty() {
        tracing::warn!("No sitemap found for {}", root);
    }

    Ok(Located { sources, robots })
}

/// Probes the default sitemap paths, stopping at the first one that exists
///
/// A probe that fails for any reason other than "not found" (timeout,
/// network error, bad gzip payload) also stops the search: the path is
/// returned as a source so the traversal records the failure on it.
async fn probe_default_paths(fetch: &dyn Fetch, root: &Url) -> Result<Vec<SitemapSource>> {
    for path in DEFAULT_SITEMAP_PATHS {
        let url = join_root(root, path)?;

        match fetch_sitemap_document(fetch, url.as_str()).await {
            Ok(_) => {
                tracing::info!("Found sitemap in default location: {}", url);
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("No sitemap at {}: {}", url, e);
                continue;
            }
            Err(e) => {
                tracing::warn!("Probe of {} failed: {}", url, e);
            }
        }

        return Ok(vec![SitemapSource::new(url.as_str(), Provenance::DefaultPath)]);
    }

    Ok(Vec::new())
}
