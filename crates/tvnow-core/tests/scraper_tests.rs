//! End-to-end tests against a mocked TV NOW API

use serde_json::{Value, json};
use tvnow_core::{ClientConfig, PageId, PageKind, TvnowError, TvnowScraper};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scraper_for(server: &MockServer) -> TvnowScraper {
    let config = ClientConfig {
        requests_per_second: 1000.0,
        timeout_secs: 5,
        max_retries: 0,
        api_url: server.uri(),
        base_url: server.uri(),
        page_size: 2,
    };
    TvnowScraper::with_config(config).expect("scraper should build")
}

fn catalog_item(id: i64, letter: &str, title: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "station": "rtl",
        "titleGroup": letter,
        "seoUrl": slug,
        "icon": null,
        "hasFreeEpisodes": true,
        "hasPayEpisodes": true,
        "categoryId": "serie",
        "searchAliasName": slug,
        "genres": []
    })
}

async fn mount_catalog_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/formats"))
        .and(query_param("page", page.to_string()))
        .and(query_param("maxPerPage", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn movie(title: &str, free: bool) -> Value {
    json!({
        "title": title,
        "free": free,
        "deeplinkUrl": "https://www.tvnow.de/serien/alles-was-zaehlt/folge-1",
        "articleShort": "Kurzbeschreibung",
        "replaceMovieInformation": 4711,
        "manifest": {"hlsfairplay": "https://vodfp.tvnow.de/4711.m3u8"},
        "duration": "00:45:00",
        "broadcastStartDate": "2022-01-10 21:00:00"
    })
}

async fn mount_program(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/formats/seo"))
        .and(query_param("name", "alles-was-zaehlt.php"))
        .and(query_param("station", "rtl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn staffel_1_document() -> Value {
    let mut broken = movie("Folge 2", true);
    broken.as_object_mut().unwrap().remove("manifest");

    json!({
        "id": 99,
        "title": "Alles was zählt",
        "formatTabs": {"items": [{
            "headline": "Staffel 1",
            "formatTabPages": {"items": [
                {"container": {"movies": {"items": [movie("Folge 1", true), broken]}}}
            ]}
        }]}
    })
}

#[tokio::test]
async fn test_load_catalog_two_pages() {
    let server = MockServer::start().await;
    mount_catalog_page(
        &server,
        1,
        json!({"items": [
            catalog_item(1, "A", "Alles was zählt", "alles-was-zaehlt"),
            catalog_item(2, "B", "Bauer sucht Frau", "bauer-sucht-frau")
        ], "total": 3}),
    )
    .await;
    mount_catalog_page(
        &server,
        2,
        json!({"items": [catalog_item(3, "A", "Alarm für Cobra 11", "alarm-fuer-cobra-11")], "total": 3}),
    )
    .await;

    let catalog = scraper_for(&server).load_catalog().await.unwrap();

    assert_eq!(catalog.stations().collect::<Vec<_>>(), vec!["rtl"]);
    let letters: Vec<_> = catalog
        .letters("rtl")
        .map(|(letter, entries)| (letter, entries.len()))
        .collect();
    assert_eq!(letters, vec![("A", 2), ("B", 1)]);
    assert_eq!(catalog.len(), 3);
}

#[tokio::test]
async fn test_catalog_request_sends_referer() {
    let server = MockServer::start().await;
    let referer = format!("{}/az", server.uri());

    Mock::given(method("GET"))
        .and(path("/formats"))
        .and(header("Referer", referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = scraper_for(&server).load_catalog().await.unwrap();
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn test_load_catalog_stalled_pagination() {
    let server = MockServer::start().await;
    mount_catalog_page(
        &server,
        1,
        json!({"items": [
            catalog_item(1, "A", "Alles was zählt", "alles-was-zaehlt"),
            catalog_item(2, "B", "Bauer sucht Frau", "bauer-sucht-frau")
        ], "total": 5}),
    )
    .await;
    mount_catalog_page(&server, 2, json!({"items": [], "total": 5})).await;

    let result = scraper_for(&server).load_catalog().await;
    match result {
        Err(e) => assert!(e.is_malformed(), "unexpected error: {}", e),
        Ok(tree) => panic!("Expected MalformedResponse, got {} entries", tree.len()),
    }
}

#[tokio::test]
async fn test_load_catalog_shrinking_total() {
    let server = MockServer::start().await;
    mount_catalog_page(
        &server,
        1,
        json!({"items": [
            catalog_item(1, "A", "Alles was zählt", "alles-was-zaehlt"),
            catalog_item(2, "B", "Bauer sucht Frau", "bauer-sucht-frau")
        ], "total": 3}),
    )
    .await;
    mount_catalog_page(&server, 2, json!({"items": [], "total": 2})).await;

    let result = scraper_for(&server).load_catalog().await;
    match result {
        Err(e) => assert!(e.is_malformed(), "unexpected error: {}", e),
        Ok(tree) => panic!("Expected MalformedResponse, got {} entries", tree.len()),
    }
}

#[tokio::test]
async fn test_load_catalog_failing_page_aborts() {
    let server = MockServer::start().await;
    mount_catalog_page(
        &server,
        1,
        json!({"items": [
            catalog_item(1, "A", "Alles was zählt", "alles-was-zaehlt"),
            catalog_item(2, "B", "Bauer sucht Frau", "bauer-sucht-frau")
        ], "total": 3}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/formats"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = scraper_for(&server).load_catalog().await;
    match result {
        Err(e) => assert!(e.is_transport(), "unexpected error: {}", e),
        Ok(_) => panic!("Expected transport error"),
    }
}

#[tokio::test]
async fn test_load_catalog_missing_items() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, json!({"total": 3})).await;

    let result = scraper_for(&server).load_catalog().await;
    assert!(matches!(result, Err(TvnowError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_expand_program_skips_broken_movie() {
    let server = MockServer::start().await;
    mount_program(&server, staffel_1_document()).await;

    let seasons = scraper_for(&server)
        .expand_program("rtl", "alles-was-zaehlt")
        .await
        .unwrap();

    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].label, "Staffel 1");
    assert_eq!(seasons[0].videos.len(), 1);
    assert_eq!(seasons[0].videos[0].title, "Folge 1 (frei)");
    assert_eq!(seasons[0].videos[0].duration_secs, 2700);
}

#[tokio::test]
async fn test_expand_program_keeps_seasons_next_to_malformed_one() {
    let server = MockServer::start().await;
    mount_program(
        &server,
        json!({"formatTabs": {"items": [
            {"headline": "Staffel 1", "formatTabPages": {"items": [
                {"container": {"movies": {"items": [movie("Folge 1", true)]}}}
            ]}},
            {"headline": "Staffel 2", "formatTabPages": {"items": [
                {"container": {"movies": "kaputt"}}
            ]}}
        ]}}),
    )
    .await;

    let seasons = scraper_for(&server)
        .expand_program("rtl", "alles-was-zaehlt")
        .await
        .unwrap();

    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].label, "Staffel 1");
    assert_eq!(seasons[0].videos[0].title, "Folge 1 (frei)");
    assert!(seasons[1].videos.is_empty());
}

#[tokio::test]
async fn test_expand_program_missing_tabs() {
    let server = MockServer::start().await;
    mount_program(&server, json!({"id": 99, "title": "Alles was zählt"})).await;

    let result = scraper_for(&server)
        .expand_program("rtl", "alles-was-zaehlt")
        .await;
    assert!(matches!(result, Err(TvnowError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_expand_program_not_found() {
    let server = MockServer::start().await;

    let result = scraper_for(&server).expand_program("rtl", "gibt-es-nicht").await;
    match result {
        Err(TvnowError::NotFound(url)) => assert!(url.contains("gibt-es-nicht.php")),
        other => panic!("Expected NotFound, got {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test]
async fn test_page_tree_navigation() {
    let server = MockServer::start().await;
    mount_catalog_page(
        &server,
        1,
        json!({"items": [catalog_item(1, "A", "Alles was zählt", "alles-was-zaehlt")], "total": 1}),
    )
    .await;
    mount_program(&server, staffel_1_document()).await;

    let scraper = scraper_for(&server);
    let root = scraper.root_page().await.unwrap();
    assert_eq!(root.id, PageId::Root);

    let program = root.pages()[0].pages()[0].pages()[0].clone();
    assert_eq!(program.title, "Alles was zählt");
    assert_eq!(program.id.to_string(), "rtl://program/alles-was-zaehlt");

    // identifiers survive a trip through the host
    let reparsed: PageId = program.id.to_string().parse().unwrap();
    assert_eq!(reparsed, program.id);

    let expanded = scraper.parse_page(program).await.unwrap();
    let season = &expanded.pages()[0];
    assert_eq!(season.title, "Staffel 1");
    assert_eq!(season.id.to_string(), "rtl://season/Staffel%201");

    let leaf = &season.pages()[0];
    match &leaf.kind {
        PageKind::Video { video } => {
            assert_eq!(video.stream_url, "https://vodfp.tvnow.de/4711.m3u8");
            assert_eq!(
                video.thumbnail_url,
                "https://aistvnow-a.akamaihd.net/tvnow/movie/4711/"
            );
        }
        PageKind::Overview { .. } => panic!("Expected a video leaf"),
    }
}
