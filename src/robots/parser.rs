//! Robots.txt parser implementation
//!
//! Sitemap directives are extracted with a regex scan over the whole file;
//! allow/disallow matching is delegated to the robotstxt crate.

use regex::Regex;
use robotstxt::DefaultMatcher;
use std::sync::LazyLock;

/// `Sitemap:` directive; the keyword is case-sensitive, whitespace tolerant
static SITEMAP_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Sitemap:\s*(https?://[^\s]+)").expect("sitemap directive pattern is valid")
});

/// Extracts every `Sitemap:` URL from robots.txt content, in file order
///
/// The scan runs over the full text rather than line by line, so directives
/// are found wherever they appear.
///
/// # Examples
///
/// ```
/// use sitemap_scout::robots::extract_sitemap_directives;
///
/// let robots = "User-agent: *\nDisallow: /admin\nSitemap: https://example.com/sitemap.xml\n";
/// assert_eq!(
///     extract_sitemap_directives(robots),
///     vec!["https://example.com/sitemap.xml".to_string()]
/// );
/// ```
pub fn extract_sitemap_directives(content: &str) -> Vec<String> {
    SITEMAP_DIRECTIVE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher plus the sitemap
/// directives found in the file.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Sitemap URLs declared in the file
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            sitemaps: extract_sitemap_directives(content),
        }
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Sitemap URLs declared in the file, in order
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute page URL to check
    /// * `user_agent` - The user agent product token (e.g. "SitemapScout")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
