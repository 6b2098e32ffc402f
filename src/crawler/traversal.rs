//! Sitemap traversal engine
//!
//! This module expands a set of sitemap sources into a flat list of
//! per-sitemap results and discovered pages:
//! - Sitemap indexes fan out into their child sitemaps
//! - Every node is fetched at most once per traversal (visited set)
//! - Sibling fetches run concurrently, bounded by a semaphore
//! - A failing node is recorded and never aborts the rest of the run
//!
//! Expansion uses an explicit work queue driven by one loop instead of
//! recursion, so nesting depth costs neither stack nor extra tasks.

use crate::crawler::Fetch;
use crate::sitemap::{
    fetch_sitemap_document, parse_sitemap, PageEntry, SitemapDocument, SitemapError,
    SitemapResult, SitemapSource, TraversalEntry,
};
use crate::state::{NodeState, VisitedSet};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::VecDeque;
use tokio::sync::Semaphore;

/// Expands `sources` into sitemap results and page entries
///
/// Never fails: every per-node problem ends up in the `error` field of that
/// node's [`SitemapResult`].
///
/// # Arguments
///
/// * `fetch` - The fetch capability
/// * `sources` - Entry-point sitemaps, usually from [`crate::robots::locate_sitemaps`]
/// * `max_concurrent` - Maximum sitemap fetches in flight
pub async fn traverse(
    fetch: &dyn Fetch,
    sources: Vec<SitemapSource>,
    max_concurrent: usize,
) -> Vec<TraversalEntry> {
    Traversal::new(fetch, max_concurrent).run(sources).await
}

/// State of one traversal run
///
/// Owns the visited set, so concurrent traversals (of different sites, say)
/// never share cycle-guard state.
pub struct Traversal<'a> {
    fetch: &'a dyn Fetch,
    permits: Semaphore,
    visited: VisitedSet,
    entries: Vec<TraversalEntry>,
}

/// A sitemap node moving through its lifecycle
struct Node {
    source: SitemapSource,
    state: NodeState,
}

impl Node {
    fn new(source: SitemapSource) -> Self {
        Self {
            source,
            state: NodeState::Pending,
        }
    }

    fn advance(&mut self, next: NodeState) {
        match self.state.transition(next) {
            Ok(state) => self.state = state,
            Err(e) => {
                tracing::error!("{}: {}", self.source.url, e);
                self.state = NodeState::Failed;
            }
        }
    }
}

/// A node that reached a terminal state
struct Settled {
    node: Node,
    document: Result<SitemapDocument, SitemapError>,
}

impl<'a> Traversal<'a> {
    pub fn new(fetch: &'a dyn Fetch, max_concurrent: usize) -> Self {
        Self {
            fetch,
            permits: Semaphore::new(max_concurrent.clamp(1, Semaphore::MAX_PERMITS)),
            visited: VisitedSet::new(),
            entries: Vec::new(),
        }
    }

    /// Runs the traversal to completion
    pub async fn run(self, sources: Vec<SitemapSource>) -> Vec<TraversalEntry> {
        let Traversal {
            fetch,
            permits,
            mut visited,
            mut entries,
        } = self;
        let permits = &permits;
        let mut queue: VecDeque<SitemapSource> = sources.into();
        let mut in_flight = FuturesUnordered::new();
        let mut failed = 0usize;

        loop {
            // Claim-before-fetch: registration happens here, between polls,
            // so no two in-flight nodes can ever share a URL.
            while let Some(source) = queue.pop_front() {
                if !visited.register(&source.url) {
                    tracing::debug!("Already visited {}, skipping", source.url);
                    continue;
                }
                in_flight.push(settle(fetch, permits, Node::new(source)));
            }

            match in_flight.next().await {
                Some(settled) => {
                    if !record(settled, &mut entries, &mut queue).is_success() {
                        failed += 1;
                    }
                }
                None => break,
            }
        }

        tracing::info!(
            "Traversal finished: {} sitemap(s) visited, {} failed, {} entries",
            visited.len(),
            failed,
            entries.len()
        );
        entries
    }
}

/// Fetches and parses one node, waiting for a concurrency slot first
async fn settle(fetch: &dyn Fetch, permits: &Semaphore, mut node: Node) -> Settled {
    let _permit = permits.acquire().await.ok();

    node.advance(NodeState::Fetching);
    tracing::debug!("Fetching sitemap {} ({})", node.source.url, node.source.provenance);

    let document = match fetch_sitemap_document(fetch, &node.source.url).await {
        Ok(xml) => parse_sitemap(&xml),
        Err(e) => Err(e),
    };

    node.advance(match &document {
        Ok(SitemapDocument::UrlSet { .. }) => NodeState::ParsedLeaf,
        Ok(SitemapDocument::Index { .. }) => NodeState::ParsedIndex,
        Err(_) => NodeState::Failed,
    });

    Settled { node, document }
}

/// Turns a settled node into output entries and queues its children
///
/// Returns the node's final state.
fn record(
    settled: Settled,
    entries: &mut Vec<TraversalEntry>,
    queue: &mut VecDeque<SitemapSource>,
) -> NodeState {
    let Settled { node, document } = settled;
    let state = node.state;
    let source = node.source;

    let document = match document {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Error in {}: {} (source: {})", source.url, e, source.provenance);
            entries.push(SitemapResult::failed(&source, &e).into());
            return state;
        }
    };

    let warning = document.warning();
    if let Some(warning) = &warning {
        tracing::warn!("{}: {}", source.url, warning);
    }

    let count = document.locs().len();
    entries.push(SitemapResult::parsed(&source, count, warning).into());

    match state {
        NodeState::ParsedIndex => {
            tracing::info!("Sitemap index {} lists {} sitemap(s)", source.url, count);
            queue.extend(
                document
                    .into_locs()
                    .into_iter()
                    .map(|child| SitemapSource::from_index(child, source.url.as_str())),
            );
        }
        _ => {
            tracing::debug!("Sitemap {} lists {} page(s)", source.url, count);
            entries.extend(
                document
                    .into_locs()
                    .into_iter()
                    .map(|page| PageEntry::new(page, source.url.as_str()).into()),
            );
        }
    }

    state
}
