//! Link collection against a mock archive

use crate::common::{alpha, html, listing_page, mount_listing, site_config, stored_url};
use speech_harvest::crawler::{collect_links, StopReason};
use speech_harvest::HarvestError;
use speech_harvest::config::Target;
use speech_harvest::storage::{read_json, LinkRecord};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn two_pages_then_empty(server: &MockServer) {
    mount_listing(
        server,
        1,
        html(listing_page(&[("Speech 1", "?seq=1"), ("Speech 2", "?seq=2")])),
    )
    .await;
    mount_listing(
        server,
        2,
        html(listing_page(&[("Speech 3", "?seq=3"), ("Speech 4", "?seq=4")])),
    )
    .await;
    mount_listing(server, 3, html(listing_page(&[]))).await;
}

fn saved_links(config: &speech_harvest::Config) -> Vec<LinkRecord> {
    read_json(&config.site.links_path(&alpha()))
        .unwrap()
        .expect("links file should exist")
}

#[tokio::test]
async fn test_stops_on_first_empty_page() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    two_pages_then_empty(&server).await;
    Mock::given(method("POST"))
        .and(body_string_contains("pageIndex=4&"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = site_config(&server, dir.path());
    let outcome = collect_links(&config, &alpha()).await.unwrap();

    assert_eq!(outcome.pages_visited, 3);
    assert_eq!(outcome.stop_reason, StopReason::EmptyPage(3));
    assert_eq!(outcome.new_records, 4);
    assert!(outcome.failed_pages.is_empty());

    let links = saved_links(&config);
    assert_eq!(links.len(), 4);
    assert_eq!(links[0].title, "Speech 1");
    assert_eq!(links[0].url, stored_url(&server, 1));
    assert_eq!(links[3].url, stored_url(&server, 4));
}

#[tokio::test]
async fn test_rerun_adds_nothing_and_stops_early() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    two_pages_then_empty(&server).await;
    let config = site_config(&server, dir.path());

    collect_links(&config, &alpha()).await.unwrap();
    let first = saved_links(&config);

    let outcome = collect_links(&config, &alpha()).await.unwrap();
    assert_eq!(outcome.new_records, 0);
    assert_eq!(outcome.total_records, 4);
    assert_eq!(outcome.stop_reason, StopReason::NoNewRecords(1));
    assert_eq!(saved_links(&config), first);
}

#[tokio::test]
async fn test_existing_links_are_kept_and_never_duplicated() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(&server, dir.path());

    let existing = vec![
        LinkRecord {
            title: "Older speech".to_string(),
            url: "http://archive.invalid/older".to_string(),
        },
        LinkRecord {
            title: "Speech 2".to_string(),
            url: stored_url(&server, 2),
        },
    ];
    speech_harvest::storage::write_json_atomic(&config.site.links_path(&alpha()), &existing)
        .unwrap();

    // Page 2 repeats a link from page 1; page 3 is empty
    mount_listing(
        &server,
        1,
        html(listing_page(&[("Speech 1", "?seq=1"), ("Speech 2", "?seq=2")])),
    )
    .await;
    mount_listing(
        &server,
        2,
        html(listing_page(&[("Speech 1 again", "?seq=1"), ("Speech 3", "?seq=3")])),
    )
    .await;
    mount_listing(&server, 3, html(listing_page(&[]))).await;

    let outcome = collect_links(&config, &alpha()).await.unwrap();
    assert_eq!(outcome.new_records, 2);

    let links = saved_links(&config);
    assert_eq!(links.len(), 4);
    assert_eq!(&links[..2], &existing[..]);

    let unique: HashSet<&str> = links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(unique.len(), links.len());
    assert_eq!(links[2].title, "Speech 1");
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_listing(&server, 1, ResponseTemplate::new(500)).await;
    mount_listing(
        &server,
        2,
        html(listing_page(&[("Speech 3", "?seq=3"), ("Speech 4", "?seq=4")])),
    )
    .await;
    mount_listing(&server, 3, html(listing_page(&[]))).await;

    let config = site_config(&server, dir.path());
    let outcome = collect_links(&config, &alpha()).await.unwrap();

    assert_eq!(outcome.failed_pages, vec![1]);
    assert_eq!(outcome.pages_visited, 3);
    assert_eq!(saved_links(&config).len(), 2);
}

#[tokio::test]
async fn test_page_limit_bounds_pagination() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    two_pages_then_empty(&server).await;

    let mut config = site_config(&server, dir.path());
    config.site.max_pages = 2;
    let outcome = collect_links(&config, &alpha()).await.unwrap();

    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.stop_reason, StopReason::PageLimit);
    assert_eq!(outcome.total_records, 4);
}

#[tokio::test]
async fn test_checkpoint_survives_interrupted_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_listing(
        &server,
        1,
        html(listing_page(&[("Speech 1", "?seq=1"), ("Speech 2", "?seq=2")])),
    )
    .await;
    // Page 2 hangs until the run is abandoned
    mount_listing(
        &server,
        2,
        html(listing_page(&[("Speech 3", "?seq=3")])).set_delay(Duration::from_secs(10)),
    )
    .await;

    let mut config = site_config(&server, dir.path());
    config.site.checkpoint_interval = 2;
    config.site.request_timeout_secs = 30;

    let run = tokio::time::timeout(Duration::from_secs(1), collect_links(&config, &alpha())).await;
    assert!(run.is_err(), "collection should still be waiting on page 2");

    let links = saved_links(&config);
    assert_eq!(links.len(), 2);
    assert_eq!(links[1].url, stored_url(&server, 2));
}

#[tokio::test]
async fn test_corrupt_links_file_starts_over() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    two_pages_then_empty(&server).await;
    let config = site_config(&server, dir.path());
    std::fs::write(config.site.links_path(&alpha()), "[{not json").unwrap();

    let outcome = collect_links(&config, &alpha()).await.unwrap();
    assert_eq!(outcome.total_records, 4);
    assert_eq!(saved_links(&config).len(), 4);
}

#[tokio::test]
async fn test_unreachable_archive_is_an_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let mut config = site_config(&server, dir.path());
    config.site.max_pages = 3;
    let existing = vec![LinkRecord {
        title: "Kept".to_string(),
        url: stored_url(&server, 9),
    }];
    speech_harvest::storage::write_json_atomic(&config.site.links_path(&alpha()), &existing)
        .unwrap();

    let result = collect_links(&config, &alpha()).await;
    assert!(matches!(
        result,
        Err(HarvestError::ArchiveUnreachable { pages: 3, .. })
    ));
    assert_eq!(saved_links(&config), existing);
}

#[tokio::test]
async fn test_korean_query_is_stored_verbatim() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let target = Target::new("Lee_Seung_Man").with_query("이승만");
    let mut config = site_config(&server, dir.path());
    config.roster = vec![target.clone()];

    mount_listing(
        &server,
        1,
        html(listing_page(&[("정부 수립 기념사", "?mode=view&seq=1")])),
    )
    .await;
    mount_listing(&server, 2, html(listing_page(&[]))).await;

    collect_links(&config, &target).await.unwrap();
    let links: Vec<LinkRecord> = read_json(&config.site.links_path(&target)).unwrap().unwrap();
    assert_eq!(
        links[0].url,
        format!("{}/speech?mode=view&seq=1&activePresident=이승만", server.uri())
    );

    // A collection written with the raw query resumes without duplicates
    let outcome = collect_links(&config, &target).await.unwrap();
    assert_eq!(outcome.new_records, 0);
    assert_eq!(outcome.stop_reason, StopReason::NoNewRecords(1));
}
