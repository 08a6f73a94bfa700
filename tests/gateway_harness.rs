//! HTTP-level behavior of the gateway (spec §8 scenarios 1, 6, 7):
//! login round-trip, 401 on a garbage token, concurrency-gate rejection,
//! and the update singleton.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use corpus_core::error::CoreError;
use corpus_core::ports::{Detector, Normalizer, Searcher, Updater};
use corpus_core::types::{SearchResult, ServiceStats, ServiceStatus};
use corpus_gateway::middleware::{ConcurrencyGate, RateLimiter};
use corpus_gateway::{auth::AuthService, router, state::AppState};
use tokio::sync::Barrier;
use tower::ServiceExt;

struct StubUpdater {
    hold: Option<Arc<Barrier>>,
}

#[async_trait]
impl Updater for StubUpdater {
    async fn update(&self) -> Result<(), CoreError> {
        if let Some(barrier) = &self.hold {
            barrier.wait().await;
        }
        Ok(())
    }

    async fn stats(&self) -> Result<ServiceStats, CoreError> {
        Ok(ServiceStats::default())
    }

    async fn status(&self) -> ServiceStatus {
        ServiceStatus::Idle
    }

    async fn drop_all(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

struct StubSearcher {
    hold: Option<Arc<Barrier>>,
}

#[async_trait]
impl Searcher for StubSearcher {
    async fn search(&self, _phrase: &str, _limit: i64) -> Result<SearchResult, CoreError> {
        if let Some(barrier) = &self.hold {
            barrier.wait().await;
        }
        Ok(SearchResult { comics: Vec::new(), total: 0 })
    }

    async fn index_search(&self, _phrase: &str, _limit: i64) -> Result<SearchResult, CoreError> {
        Ok(SearchResult { comics: Vec::new(), total: 0 })
    }

    async fn build_index(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

struct PassthroughNormalizer;
impl Normalizer for PassthroughNormalizer {
    fn norm(&self, phrase: &str) -> Result<Vec<String>, CoreError> {
        Ok(phrase.split_whitespace().map(|w| w.to_lowercase()).collect())
    }
}

struct StubDetector;
#[async_trait]
impl Detector for StubDetector {
    async fn detect(&self, _image: &[u8]) -> Result<Vec<String>, CoreError> {
        Ok(vec!["cat".to_string()])
    }
}

fn test_state(search_concurrency: usize, search_rate: f64) -> AppState {
    AppState {
        updater: Arc::new(StubUpdater { hold: None }),
        searcher: Arc::new(StubSearcher { hold: None }),
        normalizer: Arc::new(PassthroughNormalizer),
        detector: Arc::new(StubDetector),
        auth: Arc::new(AuthService::with_credentials("admin", "pw", Duration::from_secs(120))),
        concurrency_gate: ConcurrencyGate::new(search_concurrency),
        rate_limiter: RateLimiter::new(search_rate),
        update_in_progress: Arc::new(AtomicBool::new(false)),
        pingables: Arc::new(HashMap::new()),
    }
}

#[tokio::test]
async fn login_round_trip_then_unauthenticated_update_is_rejected() {
    let app = router::build(test_state(4, 10.0));

    let login_req = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"admin","password":"pw"}"#))
        .unwrap();
    let login_resp = app.clone().oneshot(login_req).await.unwrap();
    assert_eq!(login_resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(login_resp.into_body(), usize::MAX).await.unwrap();
    let token = String::from_utf8(body.to_vec()).unwrap();
    assert!(!token.is_empty());

    let garbage_req = Request::builder()
        .method("POST")
        .uri("/api/db/update")
        .header(header::AUTHORIZATION, "Token not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let garbage_resp = app.oneshot(garbage_req).await.unwrap();
    assert_eq!(garbage_resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_login_credentials_are_rejected() {
    let app = router::build(test_state(4, 10.0));

    let req = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"admin","password":"wrong"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn concurrency_gate_rejects_the_second_in_flight_search() {
    let barrier = Arc::new(Barrier::new(2));
    let state = AppState {
        searcher: Arc::new(StubSearcher { hold: Some(barrier.clone()) }),
        ..test_state(1, 10.0)
    };
    let app = router::build(state);

    let first = {
        let app = app.clone();
        tokio::spawn(async move {
            let req = Request::builder().uri("/api/search?phrase=cat&limit=5").body(Body::empty()).unwrap();
            app.oneshot(req).await.unwrap()
        })
    };

    // Give the first request a moment to acquire its permit and block on the barrier.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let second_req = Request::builder().uri("/api/search?phrase=cat&limit=5").body(Body::empty()).unwrap();
    let second_resp = app.oneshot(second_req).await.unwrap();
    assert_eq!(second_resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    barrier.wait().await;
    let first_resp = first.await.unwrap();
    assert_eq!(first_resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_phrase_on_search_is_bad_arguments() {
    let app = router::build(test_state(4, 10.0));
    let req = Request::builder().uri("/api/search?limit=5").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn concurrent_updates_yield_one_200_and_one_202() {
    let barrier = Arc::new(Barrier::new(2));
    let state = AppState { updater: Arc::new(StubUpdater { hold: Some(barrier.clone()) }), ..test_state(4, 10.0) };
    let app = router::build(state);

    let token = {
        let login_req = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"admin","password":"pw"}"#))
            .unwrap();
        let resp = app.clone().oneshot(login_req).await.unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    };

    let first = {
        let app = app.clone();
        let token = token.clone();
        tokio::spawn(async move {
            let req = Request::builder()
                .method("POST")
                .uri("/api/db/update")
                .header(header::AUTHORIZATION, format!("Token {token}"))
                .body(Body::empty())
                .unwrap();
            app.oneshot(req).await.unwrap()
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;

    let second_req = Request::builder()
        .method("POST")
        .uri("/api/db/update")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .unwrap();
    let second_resp = app.oneshot(second_req).await.unwrap();
    assert_eq!(second_resp.status(), StatusCode::ACCEPTED);

    barrier.wait().await;
    let first_resp = first.await.unwrap();
    assert_eq!(first_resp.status(), StatusCode::OK);
}
