//! The five-member error taxonomy shared by every layer.
//!
//! Adapters translate transport-specific failures into this taxonomy at the
//! boundary (upstream HTTP 404 → [`CoreError::NotFound`], RPC-style bad input
//! → [`CoreError::BadArguments`], …) so that the gateway's HTTP mapping stays
//! a single, total match with no leaked transport codes.

use thiserror::Error;

/// Language-neutral error taxonomy (spec §7).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input: oversized phrase, bad `limit`, missing required field.
    #[error("bad arguments: {0}")]
    BadArguments(String),

    /// Upstream item absent. Never propagated to HTTP clients directly;
    /// callers that can observe it (the ingestor) use it for missing-id
    /// bookkeeping and otherwise treat it as a normal per-item outcome.
    #[error("not found")]
    NotFound,

    /// An update is already in flight.
    #[error("already exists")]
    AlreadyExists,

    /// Missing, malformed, expired, or wrong-subject token. Surfaces with a
    /// single opaque message regardless of which check failed.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Transport, decode, or storage failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CoreError {
    pub fn bad_arguments(msg: impl Into<String>) -> Self {
        CoreError::BadArguments(msg.into())
    }
}
