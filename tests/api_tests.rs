use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;

use cinemai_playback_api::api::{create_router, AppState};
use cinemai_playback_api::error::{AppError, AppResult};
use cinemai_playback_api::models::{CatalogEntry, Principal};
use cinemai_playback_api::services::providers::{CatalogProvider, IdentityProvider, UrlSigner};
use cinemai_playback_api::services::PlaybackService;

const BUCKET: &str = "cinemai-bucket";
const GOOD_TOKEN: &str = "good-token";

/// Call counters shared with the stub providers, so tests can assert which
/// upstreams were (not) touched.
#[derive(Clone, Default)]
struct Counters {
    identity: Arc<AtomicUsize>,
    catalog: Arc<AtomicUsize>,
    signer: Arc<AtomicUsize>,
}

struct StubIdentity {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl IdentityProvider for StubIdentity {
    async fn verify_token(&self, bearer_token: &str) -> AppResult<Option<Principal>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if bearer_token == GOOD_TOKEN {
            Ok(Some(Principal {
                id: "user-1".to_string(),
            }))
        } else {
            Ok(None)
        }
    }
}

struct StubCatalog {
    films: HashMap<String, Option<String>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl CatalogProvider for StubCatalog {
    async fn find_film(&self, content_id: &str) -> AppResult<Option<CatalogEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.films.get(content_id).map(|key| CatalogEntry {
            content_id: content_id.to_string(),
            storage_key: key.clone(),
        }))
    }
}

struct StubSigner {
    fail: bool,
    calls: Arc<AtomicUsize>,
    last_key: Arc<Mutex<Option<String>>>,
}

#[async_trait::async_trait]
impl UrlSigner for StubSigner {
    async fn signed_get_url(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_key.lock().unwrap() = Some(key.to_string());
        if self.fail {
            return Err(AppError::upstream(
                "Could not generate signed url",
                "connection timed out",
            ));
        }
        Ok(format!(
            "https://signed.example/{}?exp={}&sig={}",
            key,
            expires_in.as_secs(),
            call
        ))
    }
}

struct TestBackend {
    server: TestServer,
    counters: Counters,
    last_signed_key: Arc<Mutex<Option<String>>>,
}

fn create_test_backend(films: &[(&str, Option<&str>)], signer_fails: bool) -> TestBackend {
    let counters = Counters::default();
    let last_signed_key = Arc::new(Mutex::new(None));

    let films = films
        .iter()
        .map(|(id, key)| (id.to_string(), key.map(str::to_string)))
        .collect();

    let playback = PlaybackService::new(
        Arc::new(StubIdentity {
            calls: counters.identity.clone(),
        }),
        Arc::new(StubCatalog {
            films,
            calls: counters.catalog.clone(),
        }),
        Arc::new(StubSigner {
            fail: signer_fails,
            calls: counters.signer.clone(),
            last_key: last_signed_key.clone(),
        }),
        BUCKET.to_string(),
        Duration::from_secs(600),
    );

    let server = TestServer::new(create_router(AppState::new(playback))).unwrap();
    TestBackend {
        server,
        counters,
        last_signed_key,
    }
}

fn catalog_with_dreams() -> Vec<(&'static str, Option<&'static str>)> {
    vec![("dreams", Some("cinemai-bucket/films/dreams.mp4"))]
}

#[tokio::test]
async fn test_health_check() {
    let backend = create_test_backend(&[], false);
    let response = backend.server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_playback_url_issued_for_authenticated_user() {
    // Scenario A: bucket-qualified catalog key, authenticated caller.
    let backend = create_test_backend(&catalog_with_dreams(), false);

    let response = backend
        .server
        .get("/api/film/dreams")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("https://signed.example/films/dreams.mp4"));
    assert!(url.contains("exp=600"));

    // The signer saw the bucket-relative key, prefix stripped exactly once.
    assert_eq!(
        backend.last_signed_key.lock().unwrap().as_deref(),
        Some("films/dreams.mp4")
    );
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bucket_relative_key_is_signed_unchanged() {
    let backend = create_test_backend(&[("dreams", Some("films/dreams.mp4"))], false);

    let response = backend
        .server
        .get("/api/film/dreams")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        backend.last_signed_key.lock().unwrap().as_deref(),
        Some("films/dreams.mp4")
    );
}

#[tokio::test]
async fn test_missing_authorization_header() {
    // Scenario B: no header at all, zero downstream calls.
    let backend = create_test_backend(&catalog_with_dreams(), false);

    let response = backend.server.get("/api/film/dreams").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not authenticated");

    assert_eq!(backend.counters.identity.load(Ordering::SeqCst), 0);
    assert_eq!(backend.counters.catalog.load(Ordering::SeqCst), 0);
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_token() {
    let backend = create_test_backend(&catalog_with_dreams(), false);

    let response = backend
        .server
        .get("/api/film/dreams")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer expired-token"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "User not found or not authenticated");

    assert_eq!(backend.counters.catalog.load(Ordering::SeqCst), 0);
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_film_id() {
    let backend = create_test_backend(&catalog_with_dreams(), false);

    let response = backend
        .server
        .get("/api/film")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing film id");

    // Auth ran first, content resolution never did.
    assert_eq!(backend.counters.identity.load(Ordering::SeqCst), 1);
    assert_eq!(backend.counters.catalog.load(Ordering::SeqCst), 0);
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_film() {
    // Scenario C: no catalog row for the id.
    let backend = create_test_backend(&catalog_with_dreams(), false);

    let response = backend
        .server
        .get("/api/film/ghost-film")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Film not found or key missing");
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_film_with_no_storage_key() {
    let backend = create_test_backend(&[("dreams", None)], false);

    let response = backend
        .server
        .get("/api/film/dreams")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Film not found or key missing");
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_signer_failure() {
    // Scenario D: everything resolves but signing fails.
    let backend = create_test_backend(&catalog_with_dreams(), true);

    let response = backend
        .server
        .get("/api/film/dreams")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Could not generate signed url");
    assert_eq!(body["details"], "connection timed out");
}

#[tokio::test]
async fn test_successive_calls_mint_fresh_urls() {
    let backend = create_test_backend(&catalog_with_dreams(), false);

    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = backend
            .server
            .get("/api/film/dreams")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Bearer good-token"),
            )
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        urls.push(body["url"].as_str().unwrap().to_string());
    }

    assert_ne!(urls[0], urls[1]);
    assert_eq!(backend.counters.signer.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_api_responses_are_never_cacheable() {
    let backend = create_test_backend(&catalog_with_dreams(), false);

    // Success and failure responses alike carry the anti-caching headers.
    let authed = backend
        .server
        .get("/api/film/dreams")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer good-token"),
        )
        .await;
    let unauthed = backend.server.get("/api/film/dreams").await;

    for response in [&authed, &unauthed] {
        assert_eq!(
            response.header("cache-control"),
            "no-store, max-age=0, must-revalidate"
        );
        assert_eq!(response.header("pragma"), "no-cache");
        assert_eq!(response.header("expires"), "0");
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let backend = create_test_backend(&[], false);
    let response = backend.server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}
