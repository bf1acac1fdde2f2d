use std::sync::Once;
use std::time::Duration;

use livesearch_core::Subject;
use livesearch_engine::{FetchError, FetchKey, FetchSettings, ReqwestFetcher, StoryFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(search_logging::initialize_for_tests);
}

fn settings_for(server: &MockServer) -> FetchSettings {
    FetchSettings {
        endpoint_base: server.uri(),
        ..FetchSettings::default()
    }
}

const HITS_BODY: &str = r#"{
    "hits": [
        { "objectID": "1", "title": "Redux", "url": "http://x" },
        { "objectID": "9", "story_title": "Parent story", "story_url": "http://parent" }
    ]
}"#;

#[tokio::test]
async fn fetch_parses_hits_and_field_fallbacks() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "redux"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(HITS_BODY, "application/json"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(settings_for(&server));
    let key = FetchKey::new(Subject::Relevance, "redux");

    let stories = fetcher.fetch(&key).await.expect("fetch ok");
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].object_id, "1");
    assert_eq!(stories[0].display_title(), Some("Redux"));
    assert_eq!(stories[0].link(), Some("http://x"));
    // Comment hits only carry the parent story fields.
    assert_eq!(stories[1].display_title(), Some("Parent story"));
    assert_eq!(stories[1].link(), Some("http://parent"));
}

#[tokio::test]
async fn by_date_subject_routes_to_its_own_path() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search_by_date"))
        .and(query_param("query", "redux"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"hits":[]}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(settings_for(&server));
    let key = FetchKey::new(Subject::ByDate, "redux");

    let stories = fetcher.fetch(&key).await.expect("fetch ok");
    assert!(stories.is_empty());
}

#[tokio::test]
async fn query_text_is_url_encoded() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "rust async & await"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"hits":[]}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(settings_for(&server));
    let key = FetchKey::new(Subject::Relevance, "rust async & await");

    fetcher.fetch(&key).await.expect("fetch ok");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(settings_for(&server));
    let key = FetchKey::new(Subject::Relevance, "redux");

    let err = fetcher.fetch(&key).await.unwrap_err();
    assert_eq!(err, FetchError::HttpStatus(404));
}

#[tokio::test]
async fn body_without_hits_is_malformed() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"results":[]}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(settings_for(&server));
    let key = FetchKey::new(Subject::Relevance, "redux");

    let err = fetcher.fetch(&key).await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedBody(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(r#"{"hits":[]}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    };
    let fetcher = ReqwestFetcher::new(settings);
    let key = FetchKey::new(Subject::Relevance, "redux");

    let err = fetcher.fetch(&key).await.unwrap_err();
    assert_eq!(err, FetchError::Timeout);
}
