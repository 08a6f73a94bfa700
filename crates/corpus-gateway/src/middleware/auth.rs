//! `Authorization: Token <jwt>` parsing and verification (spec §4.4 "Auth
//! header format"), guarding `POST /api/db/update` and `DELETE /api/db`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::AuthService;
use crate::error::ApiError;
use corpus_core::error::CoreError;

pub async fn enforce(
    State(auth): State<Arc<AuthService>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(CoreError::Unauthorized("missing authorization header"))?;

    let token = header
        .strip_prefix("Token ")
        .ok_or(CoreError::Unauthorized("wrong authorization scheme"))?;

    if token.is_empty() {
        return Err(CoreError::Unauthorized("empty token").into());
    }

    auth.verify(token).map_err(CoreError::Unauthorized)?;

    Ok(next.run(request).await)
}
