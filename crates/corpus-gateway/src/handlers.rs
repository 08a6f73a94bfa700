//! HTTP handlers for every route in the external interface (spec §6).

use std::collections::HashMap;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use corpus_core::error::CoreError;
use corpus_core::ports::{Detector, Normalizer, Searcher, Updater};
use corpus_core::types::{Comic, SearchResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;
const DETECT_LIMIT: i64 = 10;

fn parse_limit(raw: Option<String>) -> Result<i64, CoreError> {
    let Some(raw) = raw else { return Ok(DEFAULT_LIMIT) };
    if raw.is_empty() {
        return Ok(DEFAULT_LIMIT);
    }
    let limit: i64 = raw
        .parse()
        .map_err(|_| CoreError::bad_arguments(format!("invalid limit: {raw}")))?;
    if limit <= 0 {
        return Err(CoreError::bad_arguments(format!("limit must be positive: {limit}")));
    }
    Ok(limit)
}

fn require_phrase(raw: Option<String>) -> Result<String, CoreError> {
    match raw {
        Some(phrase) if !phrase.is_empty() => Ok(phrase),
        _ => Err(CoreError::bad_arguments("missing required field: phrase")),
    }
}

fn comic_dto(comics: Vec<Comic>) -> Vec<ComicDto> {
    comics.into_iter().map(|c| ComicDto { id: c.id, url: c.url }).collect()
}

#[derive(Serialize)]
struct ComicDto {
    id: i64,
    url: String,
}

#[derive(Serialize)]
struct SearchResponse {
    comics: Vec<ComicDto>,
    total: i64,
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        Self { comics: comic_dto(result.comics), total: result.total }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    name: String,
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .auth
        .login(&body.name, &body.password)
        .map_err(|msg| CoreError::Unauthorized(msg))?;

    Ok(([(axum::http::header::CONTENT_TYPE, "text/plain")], token))
}

#[derive(Serialize)]
struct PingResponse {
    replies: HashMap<String, &'static str>,
}

pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    // Fan out to every configured backend concurrently; order is irrelevant
    // (spec §4.4 "Ping fan-out") and a single unresponsive backend must
    // never hold up the others.
    let probes = state.pingables.iter().map(|(name, backend)| async move {
        let status = if backend.ping().await.is_ok() { "ok" } else { "unavailable" };
        (name.clone(), status)
    });
    let replies: HashMap<String, &'static str> = futures::future::join_all(probes).await.into_iter().collect();
    Json(PingResponse { replies })
}

#[derive(Deserialize)]
pub struct WordsQuery {
    phrase: Option<String>,
}

#[derive(Serialize)]
struct WordsResponse {
    words: Vec<String>,
    total: usize,
}

pub async fn words(
    State(state): State<AppState>,
    Query(query): Query<WordsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let phrase = require_phrase(query.phrase)?;
    let words = state.normalizer.norm(&phrase)?;
    let total = words.len();
    Ok(Json(WordsResponse { words, total }))
}

pub async fn db_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.updater.stats().await?;
    Ok(Json(stats))
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
}

pub async fn db_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.updater.status().await;
    Json(StatusResponse { status: status.to_string() })
}

/// `POST /api/db/update` — the singleton-update guard (spec §4.4, §9).
///
/// The in-progress flag is reset on success and on `AlreadyExists`, but
/// intentionally left set on any other backend error: a known source
/// behavior that can wedge this endpoint until process restart, preserved
/// as specified rather than fixed.
pub async fn db_update(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    if state
        .update_in_progress
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(StatusCode::ACCEPTED);
    }

    match state.updater.update().await {
        Ok(()) => {
            state.update_in_progress.store(false, Ordering::SeqCst);
            Ok(StatusCode::OK)
        }
        Err(CoreError::AlreadyExists) => {
            state.update_in_progress.store(false, Ordering::SeqCst);
            Ok(StatusCode::ACCEPTED)
        }
        Err(other) => Err(other.into()),
    }
}

pub async fn db_drop(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.updater.drop_all().await?;
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
pub struct SearchQuery {
    phrase: Option<String>,
    limit: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let phrase = require_phrase(query.phrase)?;
    let limit = parse_limit(query.limit)?;
    let result = state.searcher.search(&phrase, limit).await?;
    Ok(Json(SearchResponse::from(result)))
}

pub async fn isearch(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let phrase = require_phrase(query.phrase)?;
    let limit = parse_limit(query.limit)?;
    let result = state.searcher.index_search(&phrase, limit).await?;
    Ok(Json(SearchResponse::from(result)))
}

pub async fn detect(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| CoreError::bad_arguments(err.to_string()))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| CoreError::bad_arguments(err.to_string()))?;
            image = Some(bytes.to_vec());
        }
    }

    let image = image.ok_or_else(|| CoreError::bad_arguments("missing image field"))?;
    let labels = state.detector.detect(&image).await?;
    let phrase = labels.join(" ");

    let result = state.searcher.search(&phrase, DETECT_LIMIT).await?;
    Ok(Json(SearchResponse::from(result)))
}
