//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs sizes and outcomes, never prompt contents.

use std::sync::Arc;
use axum::{body::Bytes, extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::error::HintError;
use crate::logic::{parse_request, respond};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, provider: state.provider_kind() })
}

/// `POST /api/ai-hint`. The body is buffered and decoded here (not with the `Json`
/// extractor) so a bad body gets the same error envelope as every other failure.
#[instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4(), body_len = body.len()))]
pub async fn http_post_hint(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
  match handle_hint(&state, &body).await {
    Ok(out) => {
      info!(target: "ode_tutor", revealed = out.provider.is_none(), "Hint served");
      (StatusCode::OK, Json(out)).into_response()
    }
    Err(e) => {
      error!(target: "ode_tutor", error = %e, status = %e.status_code(), "AI hint request failed");
      e.into_envelope(state.provider_kind())
    }
  }
}

async fn handle_hint(state: &AppState, body: &[u8]) -> Result<HintResponse, HintError> {
  let req = parse_request(body)?;
  respond(state.provider.as_ref(), &req).await
}

pub async fn method_not_allowed() -> impl IntoResponse {
  (StatusCode::METHOD_NOT_ALLOWED, Json(MethodNotAllowed { error: "Method not allowed" }))
}
