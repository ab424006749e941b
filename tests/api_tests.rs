//! HTTP endpoint tests against in-process fakes of the catalog, the lyrics
//! page fetcher and the language model.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use lyrics_insight::analysis::{Analyzer, LanguageModel};
use lyrics_insight::genius::CatalogClient;
use lyrics_insight::lyrics::PageFetcher;
use lyrics_insight::models::{SongMetadata, SongSummary};
use lyrics_insight::{AppState, Error, Result, build_router};

// --- Fakes ---

#[derive(Default)]
struct FakeCatalog {
    fail: bool,
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(&self, query: &str) -> Result<Vec<SongSummary>> {
        if self.fail {
            return Err(Error::Upstream("Genius search failed: 401 Unauthorized".into()));
        }
        Ok(vec![
            SongSummary {
                id: 1,
                title: format!("{} (original)", query),
                artist: "Band".into(),
                artwork_url: Some("https://images.genius.com/1.jpg".into()),
                page_url: "https://genius.com/band-song-lyrics".into(),
                lyrics_complete: true,
            },
            SongSummary {
                id: 2,
                title: format!("{} (live)", query),
                artist: "Band".into(),
                artwork_url: None,
                page_url: "https://genius.com/band-song-live-lyrics".into(),
                lyrics_complete: false,
            },
        ])
    }

    async fn song(&self, id: &str) -> Result<SongMetadata> {
        if self.fail {
            return Err(Error::Upstream("Failed to fetch song info: 500".into()));
        }
        if id == "404" {
            return Err(Error::NotFound("Song 404 not found".into()));
        }
        Ok(SongMetadata {
            id: id.parse().unwrap_or(0),
            title: "Song".into(),
            artist: "Band".into(),
            artwork_url: Some("https://images.genius.com/full.jpg".into()),
            page_url: "https://genius.com/band-song-lyrics".into(),
        })
    }
}

struct FakePages {
    html: &'static str,
}

#[async_trait]
impl PageFetcher for FakePages {
    async fn fetch(&self, _url: &str) -> Result<String> {
        Ok(self.html.to_string())
    }
}

struct FakeModel {
    reply: Result<String>,
}

#[async_trait]
impl LanguageModel for FakeModel {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(Error::Upstream(e.to_string())),
        }
    }
}

const LYRICS_PAGE: &str = r#"<html><body>
<div data-lyrics-container="true">5 Contributors<br>Song Lyrics<br>[Verse 1]<br>First <i>line</i><br>Second line</div>
<div data-lyrics-container="true">[Chorus: Band]<br>Sing it</div>
</body></html>"#;

const FENCED_REPLY: &str = "```json\n{\"sentiment\": \"Alegre\", \"temas\": [\"Fiesta\"], \"estilo\": \"Directo\", \"emotions\": {\"Alegría\": 90, \"Tristeza\": 5}}\n```";

fn state_with(catalog: FakeCatalog, html: &'static str, reply: Result<String>) -> AppState {
    AppState {
        catalog: Arc::new(catalog),
        pages: Arc::new(FakePages { html }),
        analyzer: Arc::new(Analyzer::new(Arc::new(FakeModel { reply }), 3000)),
    }
}

fn test_state() -> AppState {
    state_with(FakeCatalog::default(), LYRICS_PAGE, Ok(FENCED_REPLY.to_string()))
}

fn failing_state() -> AppState {
    state_with(
        FakeCatalog { fail: true },
        LYRICS_PAGE,
        Err(Error::Upstream("Gemini request failed (503)".into())),
    )
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_error_body(body: &Value) {
    let message = body["error"].as_str().expect("error field");
    assert!(!message.is_empty());
}

// --- UI / health ---

#[tokio::test]
async fn root_serves_html() {
    let response = build_router(test_state()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(test_state(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

// --- /search ---

#[tokio::test]
async fn search_returns_hits_in_order() {
    let (status, body) = send(test_state(), get("/search?title=Zapatillas")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "id": 1,
                "title": "Zapatillas (original)",
                "artist": "Band",
                "image": "https://images.genius.com/1.jpg",
                "url": "https://genius.com/band-song-lyrics",
                "snippet": "Lyrics available on Genius"
            },
            {
                "id": 2,
                "title": "Zapatillas (live)",
                "artist": "Band",
                "image": null,
                "url": "https://genius.com/band-song-live-lyrics",
                "snippet": "Lyrics may be incomplete"
            }
        ])
    );
}

#[tokio::test]
async fn search_without_title_is_bad_request() {
    for uri in ["/search", "/search?title=", "/search?q=other"] {
        let (status, body) = send(test_state(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "Missing title");
    }
}

#[tokio::test]
async fn search_upstream_failure_is_500() {
    let (status, body) = send(failing_state(), get("/search?title=x")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&body);
}

// --- /song/<id> ---

#[tokio::test]
async fn song_returns_cleaned_lyrics() {
    let (status, body) = send(test_state(), get("/song/378195")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 378195);
    assert_eq!(body["title"], "Song");
    assert_eq!(body["artist"], "Band");
    assert_eq!(body["albumArt"], "https://images.genius.com/full.jpg");
    assert_eq!(body["url"], "https://genius.com/band-song-lyrics");
    assert_eq!(body["lyrics"], "Song First line\nSecond line\nSing it");
}

#[tokio::test]
async fn song_page_without_container_has_empty_lyrics() {
    let state = state_with(
        FakeCatalog::default(),
        "<html><body><p>Moved</p></body></html>",
        Ok(FENCED_REPLY.to_string()),
    );
    let (status, body) = send(state, get("/song/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lyrics"], "");
}

#[tokio::test]
async fn song_without_id_is_bad_request() {
    for uri in ["/song", "/song/"] {
        let (status, body) = send(test_state(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "Missing song id");
    }
}

#[tokio::test]
async fn song_upstream_failure_is_500() {
    let (status, body) = send(failing_state(), get("/song/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&body);
}

#[tokio::test]
async fn unknown_song_is_500() {
    let (status, body) = send(test_state(), get("/song/404")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Song 404 not found");
}

// --- /analyze ---

#[tokio::test]
async fn analyze_parses_fenced_reply() {
    let (status, body) = send(test_state(), post_json("/analyze", json!({ "lyrics": "la la la" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "sentiment": "Alegre",
            "temas": ["Fiesta"],
            "estilo": "Directo",
            "emotions": { "Alegría": 90, "Tristeza": 5 }
        })
    );
    assert!(!body.to_string().contains("```"));
}

#[tokio::test]
async fn analyze_without_lyrics_is_bad_request() {
    for payload in [json!({ "lyrics": "" }), json!({}), json!({ "lyrics": null })] {
        let (status, body) = send(test_state(), post_json("/analyze", payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", payload);
        assert_eq!(body["error"], "Missing lyrics");
    }
}

#[tokio::test]
async fn analyze_with_unparseable_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(test_state(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body);
}

#[tokio::test]
async fn analyze_rejects_other_methods() {
    let (status, body) = send(test_state(), get("/analyze")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn analyze_upstream_failure_is_500() {
    let (status, body) = send(failing_state(), post_json("/analyze", json!({ "lyrics": "x" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_body(&body);
}

#[tokio::test]
async fn analyze_prose_reply_is_500() {
    let state = state_with(
        FakeCatalog::default(),
        LYRICS_PAGE,
        Ok("I cannot analyze this song.".to_string()),
    );
    let (status, body) = send(state, post_json("/analyze", json!({ "lyrics": "x" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid analysis response"));
}
