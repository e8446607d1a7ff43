//! Error type for the hint pipeline and its mapping onto the HTTP error envelope.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

use crate::domain::ProviderKind;
use crate::protocol::ErrorEnvelope;

/// User-facing message shown by the widget whenever a hint could not be produced.
pub const USER_ERROR_MESSAGE: &str = "שגיאה בעיבוד הבקשה. נסו שוב.";

#[derive(Debug, Error)]
pub enum HintError {
  #[error("malformed request body: {0}")]
  MalformedBody(#[from] serde_json::Error),
  #[error("invalid request: {0}")]
  InvalidRequest(String),
  #[error("{0} API key is not configured")]
  MissingApiKey(ProviderKind),
  #[error("{provider} API error: {status} {body}")]
  UpstreamStatus {
    provider: ProviderKind,
    status: u16,
    body: String,
  },
  #[error("{provider} request failed: {source}")]
  Transport {
    provider: ProviderKind,
    #[source]
    source: reqwest::Error,
  },
  #[error("{provider} returned an unexpected payload: {message}")]
  Decode {
    provider: ProviderKind,
    message: String,
  },
  #[error("{0} returned no text")]
  EmptyResponse(ProviderKind),
}

impl HintError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      HintError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Render the error envelope, tagging it with the configured provider.
  pub fn into_envelope(self, provider: ProviderKind) -> Response {
    let status = self.status_code();
    let body = ErrorEnvelope {
      error: USER_ERROR_MESSAGE.to_string(),
      provider,
      details: self.to_string(),
    };
    (status, Json(body)).into_response()
  }
}
