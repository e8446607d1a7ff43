//! Remote text-generation backends behind one capability: turn a prompt into hint text.
//!
//! Adding a backend means adding a `ProviderKind` variant and a client here; callers
//! only ever see `HintProvider`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;
use crate::domain::ProviderKind;
use crate::error::HintError;

pub mod gemini;
pub mod openrouter;

pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;

const USER_AGENT_VALUE: &str = concat!("ode-tutor-backend/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait HintProvider: Send + Sync {
  fn kind(&self) -> ProviderKind;

  /// Send the assembled prompt and return the model's plain text answer.
  async fn generate_hint(&self, prompt: &str) -> Result<String, HintError>;
}

/// Shared HTTP client with the configured upstream timeout.
pub fn http_client(settings: &Settings) -> Result<reqwest::Client, reqwest::Error> {
  reqwest::Client::builder()
    .user_agent(USER_AGENT_VALUE)
    .timeout(settings.timeout)
    .build()
}

/// Build the one provider selected by configuration.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn HintProvider>, reqwest::Error> {
  let client = http_client(settings)?;
  let provider: Arc<dyn HintProvider> = match settings.provider {
    ProviderKind::Google => Arc::new(GeminiClient::new(client, &settings.google)),
    ProviderKind::OpenRouter => Arc::new(OpenRouterClient::new(client, &settings.openrouter)),
  };
  Ok(provider)
}

/// Read a non-success reply into an `UpstreamStatus` error.
async fn upstream_error(provider: ProviderKind, res: reqwest::Response) -> HintError {
  let status = res.status().as_u16();
  let body = res.text().await.unwrap_or_default();
  HintError::UpstreamStatus { provider, status, body }
}
