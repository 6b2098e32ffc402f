//! Sitemap location against a mock site

use crate::{create_test_fetcher, mount_robots, mount_xml, urlset};
use sitemap_scout::{locate_sitemaps, Provenance, ScoutError};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_robots_directives_take_precedence() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        format!(
            "User-agent: *\nDisallow: /admin\nSitemap: {0}/posts.xml\nSitemap: {0}/pages.xml\n",
            base_url
        ),
    )
    .await;

    // Default paths must not be probed once robots.txt names sitemaps
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &base_url, None)
        .await
        .expect("Location failed");

    let urls: Vec<&str> = located.sources.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/posts.xml", base_url),
            format!("{}/pages.xml", base_url)
        ]
    );
    assert!(located
        .sources
        .iter()
        .all(|s| s.provenance == Provenance::RobotsTxt));
    assert!(located.robots.is_some());
}

#[tokio::test]
async fn test_default_path_probed_without_robots() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/a", base_url)]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &base_url, None)
        .await
        .expect("Location failed");

    assert_eq!(located.sources.len(), 1);
    assert_eq!(located.sources[0].url, format!("{}/sitemap.xml", base_url));
    assert_eq!(located.sources[0].provenance, Provenance::DefaultPath);
    assert!(located.robots.is_none());
}

#[tokio::test]
async fn test_second_default_path_used_when_first_missing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // robots.txt exists but names no sitemap
    mount_robots(&mock_server, "User-agent: *\nAllow: /\n".to_string()).await;
    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        urlset(&[format!("{}/a", base_url)]),
    )
    .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &base_url, None)
        .await
        .expect("Location failed");

    assert_eq!(located.sources.len(), 1);
    assert_eq!(
        located.sources[0].url,
        format!("{}/sitemap_index.xml", base_url)
    );
}

#[tokio::test]
async fn test_html_default_path_is_not_a_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Soft 404: a 200 HTML page in place of the sitemap
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Not here</body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &base_url, None)
        .await
        .expect("Location failed");

    assert!(located.sources.is_empty());
}

#[tokio::test]
async fn test_override_skips_discovery() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        format!("Sitemap: {}/from-robots.xml\n", base_url),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &base_url, Some("custom/map.xml"))
        .await
        .expect("Location failed");

    assert_eq!(located.sources.len(), 1);
    assert_eq!(
        located.sources[0].url,
        format!("{}/custom/map.xml", base_url)
    );
    assert_eq!(located.sources[0].provenance, Provenance::UserProvided);
    // robots.txt is still available to the page checker
    assert!(located.robots.is_some());
}

#[tokio::test]
async fn test_robots_read_from_origin_for_path_root() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        format!("User-agent: *\nSitemap: {}/from-robots.xml\n", base_url),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/blog/robots.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &format!("{}/blog", base_url), None)
        .await
        .expect("Location failed");

    assert_eq!(located.sources.len(), 1);
    assert_eq!(
        located.sources[0].url,
        format!("{}/from-robots.xml", base_url)
    );
    assert_eq!(located.sources[0].provenance, Provenance::RobotsTxt);
    assert!(located.robots.is_some());
}

#[tokio::test]
async fn test_default_paths_resolve_under_path_root() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/blog/sitemap.xml",
        urlset(&[format!("{}/blog/first-post", base_url)]),
    )
    .await;

    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);
    let located = locate_sitemaps(&fetcher, &format!("{}/blog", base_url), None)
        .await
        .expect("Location failed");

    assert_eq!(located.sources.len(), 1);
    assert_eq!(
        located.sources[0].url,
        format!("{}/blog/sitemap.xml", base_url)
    );
}

#[tokio::test]
async fn test_failed_default_probe_is_kept_as_source() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(urlset(&[]), "application/xml")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    // The search stops at the first path that did not answer "not found"
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_millis(200), 0);
    let located = locate_sitemaps(&fetcher, &base_url, None)
        .await
        .expect("Location failed");

    assert_eq!(located.sources.len(), 1);
    assert_eq!(located.sources[0].url, format!("{}/sitemap.xml", base_url));
    assert_eq!(located.sources[0].provenance, Provenance::DefaultPath);
}

#[tokio::test]
async fn test_malformed_root_fails_fast() {
    let fetcher = create_test_fetcher(Duration::from_secs(2), 0);

    let result = locate_sitemaps(&fetcher, "not a url", None).await;
    assert!(matches!(result, Err(ScoutError::InvalidRootUrl(_))));

    let result = locate_sitemaps(&fetcher, "ftp://example.com", None).await;
    assert!(matches!(result, Err(ScoutError::InvalidRootUrl(_))));
}
