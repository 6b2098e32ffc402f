//! Sitemap XML parser
//!
//! Streams a sitemaps.org document with quick-xml and classifies it by its
//! root element. Namespace prefixes are ignored; only local names matter.

use crate::sitemap::SitemapError;
use crate::url::is_absolute_http_url;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Protocol limit on entries per sitemap file
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: `locs` are content page URLs
    UrlSet { locs: Vec<String>, skipped: usize },

    /// `<sitemapindex>`: `locs` are child sitemap URLs
    Index { locs: Vec<String>, skipped: usize },
}

impl SitemapDocument {
    pub fn locs(&self) -> &[String] {
        match self {
            Self::UrlSet { locs, .. } | Self::Index { locs, .. } => locs,
        }
    }

    pub fn into_locs(self) -> Vec<String> {
        match self {
            Self::UrlSet { locs, .. } | Self::Index { locs, .. } => locs,
        }
    }

    /// Entries dropped because their `<loc>` was missing, empty or not absolute
    pub fn skipped(&self) -> usize {
        match self {
            Self::UrlSet { skipped, .. } | Self::Index { skipped, .. } => *skipped,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }

    /// Non-fatal findings about the document, joined into one message
    pub fn warning(&self) -> Option<String> {
        let mut warnings = Vec::new();

        if self.locs().is_empty() && self.skipped() == 0 {
            warnings.push("sitemap contains no entries".to_string());
        }
        if self.skipped() > 0 {
            warnings.push(format!(
                "skipped {} entries without an absolute <loc>",
                self.skipped()
            ));
        }
        if !self.is_index() && self.locs().len() > MAX_URLS_PER_SITEMAP {
            warnings.push(format!(
                "sitemap lists {} URLs, above the {} allowed per file",
                self.locs().len(),
                MAX_URLS_PER_SITEMAP
            ));
        }

        if warnings.is_empty() {
            None
        } else {
            Some(warnings.join("; "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    UrlSet,
    Index,
}

impl Root {
    /// Element wrapping each entry under this root
    fn entry_name(&self) -> &'static [u8] {
        match self {
            Self::UrlSet => b"url",
            Self::Index => b"sitemap",
        }
    }
}

/// Parses sitemap XML into a [`SitemapDocument`]
///
/// # Errors
///
/// * `SitemapError::Malformed` - the text is not well-formed XML
/// * `SitemapError::UnknownRoot` - the root is neither `urlset` nor `sitemapindex`
///
/// # Examples
///
/// ```
/// use sitemap_scout::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
/// </urlset>"#;
///
/// let doc = parse_sitemap(xml).unwrap();
/// assert!(matches!(doc, SitemapDocument::UrlSet { .. }));
/// assert_eq!(doc.locs(), ["https://example.com/"]);
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<Root> = None;
    let mut depth = 0usize;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut loc = String::new();
    let mut entry_loc: Option<String> = None;
    let mut locs = Vec::new();
    let mut skipped = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            SitemapError::Malformed(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                depth += 1;

                match (depth, root) {
                    (1, None) => root = Some(classify_root(name)?),
                    (1, Some(_)) => {
                        return Err(SitemapError::Malformed(
                            "multiple root elements".to_string(),
                        ))
                    }
                    (2, Some(r)) if name == r.entry_name() => {
                        in_entry = true;
                        entry_loc = None;
                    }
                    (3, Some(_)) if in_entry && name == b"loc" => {
                        in_loc = true;
                        loc.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                let name = name.as_ref();

                match (depth, root) {
                    // `<urlset/>`: a valid but empty document
                    (0, None) => root = Some(classify_root(name)?),
                    (0, Some(_)) => {
                        return Err(SitemapError::Malformed(
                            "multiple root elements".to_string(),
                        ))
                    }
                    // `<url/>`: an entry with no loc at all
                    (1, Some(r)) if name == r.entry_name() => skipped += 1,
                    _ => {}
                }
            }
            Event::Text(e) => {
                if in_loc {
                    let text = e
                        .unescape()
                        .map_err(|err| SitemapError::Malformed(err.to_string()))?;
                    loc.push_str(&text);
                } else if depth == 0 {
                    return Err(SitemapError::Malformed(
                        "text outside the root element".to_string(),
                    ));
                }
            }
            Event::CData(e) => {
                if in_loc {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                let name = name.as_ref();

                if in_loc && depth == 3 && name == b"loc" {
                    in_loc = false;
                    if entry_loc.is_none() {
                        entry_loc = Some(loc.trim().to_string());
                    }
                } else if in_entry && depth == 2 {
                    in_entry = false;
                    match entry_loc.take() {
                        Some(candidate) if is_absolute_http_url(&candidate) => locs.push(candidate),
                        Some(candidate) => {
                            tracing::debug!("Skipping non-absolute <loc> '{}'", candidate);
                            skipped += 1;
                        }
                        None => skipped += 1,
                    }
                }

                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SitemapError::Malformed(
            "unexpected end of document".to_string(),
        ));
    }

    match root {
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet { locs, skipped }),
        Some(Root::Index) => Ok(SitemapDocument::Index { locs, skipped }),
        None => Err(SitemapError::Malformed(
            "document has no root element".to_string(),
        )),
    }
}

fn classify_root(name: &[u8]) -> Result<Root, SitemapError> {
    match name {
        b"urlset" => Ok(Root::UrlSet),
        b"sitemapindex" => Ok(Root::Index),
        other => Err(SitemapError::UnknownRoot(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}
