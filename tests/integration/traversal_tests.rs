//! Sitemap traversal against a mock site

use crate::{create_test_fetcher, mount_xml, sitemap_index, urlset};
use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_scout::crawler::split_entries;
use sitemap_scout::{dedupe_pages, traverse, Provenance, SitemapSource};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(url: String) -> SitemapSource {
    SitemapSource::new(url, Provenance::UserProvided)
}

#[tokio::test]
async fn test_index_with_two_leaves() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[
            format!("{}/posts.xml", base_url),
            format!("{}/pages.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/posts.xml",
        urlset(&[
            format!("{}/post-1", base_url),
            format!("{}/post-2", base_url),
            format!("{}/post-3", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/pages.xml",
        urlset(&[
            format!("{}/", base_url),
            format!("{}/about", base_url),
            format!("{}/contact", base_url),
        ]),
    )
    .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let entries = traverse(
        &fetcher,
        vec![source(format!("{}/sitemap_index.xml", base_url))],
        4,
    )
    .await;
    let (sitemaps, pages) = split_entries(entries);

    assert_eq!(sitemaps.len(), 3);
    assert!(sitemaps.iter().all(|s| !s.is_error()));

    let index = sitemaps
        .iter()
        .find(|s| s.url.ends_with("/sitemap_index.xml"))
        .expect("Index result missing");
    assert_eq!(index.locs, Some(2));

    let posts = sitemaps
        .iter()
        .find(|s| s.url.ends_with("/posts.xml"))
        .expect("Posts result missing");
    assert_eq!(posts.locs, Some(3));
    assert_eq!(posts.source, Provenance::SitemapIndex);
    assert_eq!(
        posts.parent.as_deref(),
        Some(format!("{}/sitemap_index.xml", base_url).as_str())
    );

    assert_eq!(pages.len(), 6);
    assert_eq!(dedupe_pages(pages).len(), 6);
}

#[tokio::test]
async fn test_partial_failure_keeps_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[
            format!("{}/good.xml", base_url),
            format!("{}/broken.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/good.xml",
        urlset(&[format!("{}/a", base_url), format!("{}/b", base_url)]),
    )
    .await;

    // Server errors are deterministic failures and are not retried
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 3);
    let entries = traverse(
        &fetcher,
        vec![source(format!("{}/sitemap_index.xml", base_url))],
        4,
    )
    .await;
    let (sitemaps, pages) = split_entries(entries);

    assert_eq!(sitemaps.len(), 3);

    let broken = sitemaps
        .iter()
        .find(|s| s.url.ends_with("/broken.xml"))
        .expect("Broken result missing");
    assert_eq!(
        broken.error.as_deref(),
        Some("sitemap not found (HTTP 500)")
    );
    assert!(broken.locs.is_none());

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_gzipped_sitemap_is_transparent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let xml = urlset(&[format!("{}/a", base_url), format!("{}/b", base_url)]);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(xml.as_bytes())
        .expect("Failed to compress");
    let compressed = encoder.finish().expect("Failed to finish gzip stream");

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(compressed, "application/x-gzip"))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let entries = traverse(
        &fetcher,
        vec![source(format!("{}/sitemap.xml.gz", base_url))],
        4,
    )
    .await;
    let (sitemaps, pages) = split_entries(entries);

    assert_eq!(sitemaps.len(), 1);
    assert_eq!(sitemaps[0].locs, Some(2));
    assert!(sitemaps[0].error.is_none());
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_cycle_fetches_each_sitemap_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_index(&[format!("{}/b.xml", base_url)]),
            "application/xml",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_index(&[format!("{}/a.xml", base_url)]),
            "application/xml",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let entries = traverse(&fetcher, vec![source(format!("{}/a.xml", base_url))], 4).await;
    let (sitemaps, pages) = split_entries(entries);

    assert_eq!(sitemaps.len(), 2);
    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_malformed_xml_is_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        "<urlset><url><loc>https://example.com/a</loc></url>".to_string(),
    )
    .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let entries = traverse(
        &fetcher,
        vec![source(format!("{}/sitemap.xml", base_url))],
        4,
    )
    .await;
    let (sitemaps, pages) = split_entries(entries);

    assert_eq!(sitemaps.len(), 1);
    let error = sitemaps[0].error.as_deref().expect("Expected an error");
    assert!(error.starts_with("malformed XML"), "got: {}", error);
    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_timeout_is_retried_then_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // One initial attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(urlset(&[]), "application/xml")
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_millis(200), 1);
    let entries = traverse(&fetcher, vec![source(format!("{}/slow.xml", base_url))], 4).await;
    let (sitemaps, _) = split_entries(entries);

    assert_eq!(sitemaps.len(), 1);
    assert_eq!(
        sitemaps[0].error.as_deref(),
        Some("fetch failed: request timed out")
    );
}
