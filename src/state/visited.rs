use std::collections::HashSet;

/// Registry of sitemap URLs already claimed in one traversal run
///
/// URLs are compared exactly as given. A URL is registered *before* it is
/// fetched, so two parents referencing the same child never fetch it twice.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url`, returning true if it had not been seen before
    pub fn register(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
