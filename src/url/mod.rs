//! URL handling module for Sitemap-Scout
//!
//! Root URL validation and resolution of well-known paths against it. Sitemap
//! and page URLs are otherwise kept exactly as given: no normalization is
//! applied, so case and trailing-slash differences stay distinct.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and validates a site root URL
///
/// The root must be absolute, use `http` or `https`, and carry a host.
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::parse_root_url;
///
/// assert!(parse_root_url("https://example.com").is_ok());
/// assert!(parse_root_url("example.com").is_err());
/// assert!(parse_root_url("ftp://example.com").is_err());
/// ```
pub fn parse_root_url(root: &str) -> UrlResult<Url> {
    let url = Url::parse(root.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", root, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves `path` beneath the root, i.e. `{root}/{path}`
///
/// The root's path is treated as a directory even without a trailing slash,
/// and its query and fragment are dropped. Absolute `path` values (full URLs)
/// are returned as-is, which is how caller-supplied sitemap overrides resolve.
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::{join_root, parse_root_url};
///
/// let root = parse_root_url("https://example.com/blog").unwrap();
/// assert_eq!(
///     join_root(&root, "sitemap.xml").unwrap().as_str(),
///     "https://example.com/blog/sitemap.xml"
/// );
/// ```
pub fn join_root(root: &Url, path: &str) -> UrlResult<Url> {
    let mut base = root.clone();
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    base.join(path)
        .map_err(|e| UrlError::Parse(format!("{} joined with {}: {}", root, path, e)))
}

/// Returns the robots.txt URL for a site root
///
/// robots.txt only ever lives at the origin, so any path on the root is
/// ignored: `https://example.com/blog` maps to `https://example.com/robots.txt`.
pub fn robots_url(root: &Url) -> UrlResult<Url> {
    root.join("/robots.txt")
        .map_err(|e| UrlError::Parse(format!("robots.txt for {}: {}", root, e)))
}

/// Returns true when `candidate` is a non-empty absolute http(s) URL
pub fn is_absolute_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
