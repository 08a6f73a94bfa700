//! The bounded-concurrency admission gate (spec §4.4 "Concurrency gate"),
//! guarding `/api/search` only. Non-blocking: an exhausted gate rejects
//! immediately rather than queueing.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Semaphore;

/// A fixed-capacity semaphore shared across requests to the guarded route.
#[derive(Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyGate {
    pub fn new(limit: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(limit)) }
    }
}

pub async fn enforce(State(gate): State<ConcurrencyGate>, request: Request, next: Next) -> Response {
    let _permit = match gate.semaphore.try_acquire() {
        Ok(permit) => permit,
        Err(_) => {
            return (StatusCode::SERVICE_UNAVAILABLE, "Too many concurrent requests").into_response()
        }
    };

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn permit_is_released_on_drop() {
        let gate = ConcurrencyGate::new(1);
        {
            let _first = gate.semaphore.try_acquire().unwrap();
            assert!(gate.semaphore.try_acquire().is_err());
        }
        assert!(gate.semaphore.try_acquire().is_ok());
    }
}
