use serde_json::json;
use verselens::client::BibleApiClient;
use verselens::store::TranslationStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn esv_body() -> serde_json::Value {
    json!({
        "translation": "esv",
        "translation_name": "ESV",
        "books": ["Genesis", "Exodus"],
        "total_verses": 3,
        "data": {
            "Genesis": {
                "1": {
                    "1": "In the beginning God created the heavens and the earth",
                    "2": "And the earth was without form, and void"
                }
            },
            "Exodus": {
                "1": {"1": "Now these are the names"}
            }
        }
    })
}

#[tokio::test]
async fn test_fetch_translations_returns_available_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/translations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": ["ESV", "KJV", "WEB"],
            "cached": ["ESV"],
            "total": 3
        })))
        .mount(&server)
        .await;

    let client = BibleApiClient::new(&server.uri());
    let list = client.fetch_translations().await.unwrap();
    assert_eq!(list, ["ESV", "KJV", "WEB"]);
}

#[tokio::test]
async fn test_fetch_translation_builds_ordered_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/esv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esv_body()))
        .mount(&server)
        .await;

    let client = BibleApiClient::new(&server.uri());
    // Requested in display case; URL must be lowercased
    let translation = client.fetch_translation("ESV").await.unwrap();

    assert_eq!(translation.id, "esv");
    assert_eq!(translation.name, "ESV");
    assert_eq!(translation.data.books(), &["Genesis", "Exodus"]);
    assert_eq!(
        translation.data.verse_text("Exodus", 1, 1),
        Some("Now these are the names")
    );
}

#[tokio::test]
async fn test_fetch_translation_rejects_empty_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translation": "bad",
            "translation_name": "BAD",
            "books": [],
            "total_verses": 0,
            "data": {}
        })))
        .mount(&server)
        .await;

    let client = BibleApiClient::new(&server.uri());
    let err = client.fetch_translation("bad").await.unwrap_err();
    assert!(err.to_string().contains("Invalid Bible data"));
}

#[tokio::test]
async fn test_fetch_translation_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/niv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = BibleApiClient::new(&server.uri());
    let err = client.fetch_translation("niv").await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_store_fetches_each_translation_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/esv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esv_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = TranslationStore::new(BibleApiClient::new(&server.uri()));

    let first = store.get("ESV").await.unwrap();
    let second = store.get("esv").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.data.books(), &["Genesis", "Exodus"]);
    // The .expect(1) on the mock verifies the cache on drop
}

#[tokio::test]
async fn test_store_memoizes_available_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/translations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": ["ESV"],
            "cached": [],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = TranslationStore::new(BibleApiClient::new(&server.uri()));
    assert_eq!(store.available_translations().await.unwrap(), ["ESV"]);
    assert_eq!(store.available_translations().await.unwrap(), ["ESV"]);
}

#[tokio::test]
async fn test_default_translation_prefers_configured_then_esv() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/translations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": ["KJV", "ESV", "WEB"],
            "cached": [],
            "total": 3
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/esv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esv_body()))
        .mount(&server)
        .await;

    let mut store = TranslationStore::new(BibleApiClient::new(&server.uri()));

    // No preference: falls back to ESV even though KJV is listed first
    let translation = store.default_translation(None).await.unwrap();
    assert_eq!(translation.id, "esv");

    // A preference matching case-insensitively wins
    let mut store2 = TranslationStore::new(BibleApiClient::new(&server.uri()));
    Mock::given(method("GET"))
        .and(path("/api/web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esv_body()))
        .mount(&server)
        .await;
    let translation = store2.default_translation(Some("web")).await.unwrap();
    assert_eq!(translation.id, "web");
}
