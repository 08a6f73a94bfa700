//! Shared application state, threaded through every handler and middleware
//! via axum's `FromRef` extraction.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::extract::FromRef;
use corpus_core::ports::{Detector, Normalizer, Pingable, Searcher, Updater};

use crate::auth::AuthService;
use crate::middleware::{ConcurrencyGate, RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub updater: Arc<dyn Updater>,
    pub searcher: Arc<dyn Searcher>,
    pub normalizer: Arc<dyn Normalizer>,
    pub detector: Arc<dyn Detector>,
    pub auth: Arc<AuthService>,
    pub concurrency_gate: ConcurrencyGate,
    pub rate_limiter: RateLimiter,
    /// The process-wide "update in progress" flag (spec §4.4 "Singleton
    /// update"), touched only through `compare_exchange`.
    pub update_in_progress: Arc<AtomicBool>,
    /// Name -> backend probed by `GET /api/ping` (spec §4.4 "Ping fan-out").
    pub pingables: Arc<HashMap<String, Arc<dyn Pingable>>>,
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for ConcurrencyGate {
    fn from_ref(state: &AppState) -> Self {
        state.concurrency_gate.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}
