#![allow(clippy::unwrap_used)]
// Integration tests for `CountryClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flagdex_api::{CountryClient, Error, FetchFailureKind};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CountryClient) {
    let server = MockServer::start().await;
    let endpoint = Url::parse(&format!("{}/countries", server.uri())).unwrap();
    let client = CountryClient::with_client(reqwest::Client::new(), endpoint);
    (server, client)
}

// ── Directory fetch ─────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_all_returns_records_in_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "common": "France", "png": "https://flags.example/fr.png" },
            { "common": "Germany", "png": "https://flags.example/de.png" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client.fetch_all().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].str_at(&["common"]), Some("France"));
    assert_eq!(records[1].str_at(&["png"]), Some("https://flags.example/de.png"));
}

#[tokio::test]
async fn test_fetch_all_accepts_renamed_variant_and_odd_elements() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "France", "flag": "fr.png" },
            null,
            { "unrelated": true }
        ])))
        .mount(&server)
        .await;

    let records = client.fetch_all().await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].str_at(&["name"]), Some("France"));
    assert!(records[1].0.is_null());
    assert_eq!(records[2].str_at(&["name"]), None);
}

#[tokio::test]
async fn test_fetch_all_empty_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_all_http_500() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = client.fetch_all().await.unwrap_err();

    assert_eq!(err.kind(), FetchFailureKind::HttpStatus);
    assert_eq!(err.status(), Some(500));
    match err {
        Error::HttpStatus { body_preview, .. } => assert_eq!(body_preview, "internal error"),
        other => panic!("expected HttpStatus error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_all_object_body_is_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let result = client.fetch_all().await;

    assert!(
        matches!(result, Err(Error::Decode { .. })),
        "expected Decode error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_all_garbage_body_is_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.fetch_all().await.unwrap_err();

    assert_eq!(err.kind(), FetchFailureKind::Decode);
    if let Error::Decode { body, .. } = err {
        assert_eq!(body, "<html>not json</html>");
    }
}

#[tokio::test]
async fn test_fetch_all_unreachable_is_transport_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let endpoint = Url::parse(&format!("http://127.0.0.1:{port}/countries")).unwrap();

    let client = CountryClient::with_client(reqwest::Client::new(), endpoint);
    let err = client.fetch_all().await.unwrap_err();

    assert_eq!(err.kind(), FetchFailureKind::Transport);
    assert_eq!(err.status(), None);
}

// ── Flag probe ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_image_success_and_missing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/flags/fr.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flags/xx.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    client
        .probe_image(&format!("{}/flags/fr.png", server.uri()))
        .await
        .unwrap();

    let err = client
        .probe_image(&format!("{}/flags/xx.png", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_probe_image_rejects_relative_url() {
    let (_server, client) = setup().await;

    let err = client.probe_image("fr.png").await.unwrap_err();

    assert!(matches!(err, Error::InvalidUrl(_)));
}
