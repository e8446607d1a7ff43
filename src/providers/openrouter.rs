//! OpenRouter chat-completions client.
//!
//! One user-role message per call, plain text back. We never log the API key and
//! only log prompt/response sizes.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{upstream_error, HintProvider};
use crate::config::UpstreamSettings;
use crate::domain::ProviderKind;
use crate::error::HintError;

#[derive(Clone)]
pub struct OpenRouterClient {
  client: reqwest::Client,
  api_key: Option<String>,
  base_url: String,
  model: String,
}

impl OpenRouterClient {
  pub fn new(client: reqwest::Client, cfg: &UpstreamSettings) -> Self {
    Self {
      client,
      api_key: cfg.api_key.clone(),
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      model: cfg.model.clone(),
    }
  }
}

#[async_trait]
impl HintProvider for OpenRouterClient {
  fn kind(&self) -> ProviderKind { ProviderKind::OpenRouter }

  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate_hint(&self, prompt: &str) -> Result<String, HintError> {
    let provider = self.kind();
    let api_key = self.api_key.as_deref().ok_or(HintError::MissingApiKey(provider))?;

    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: &self.model,
      messages: vec![ChatMessageReq { role: "user", content: prompt }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", api_key))
      .json(&req).send().await
      .map_err(|source| HintError::Transport { provider, source })?;

    if !res.status().is_success() {
      return Err(upstream_error(provider, res).await);
    }

    let body: ChatCompletionResponse = res.json().await
      .map_err(|e| HintError::Decode { provider, message: e.to_string() })?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenRouter usage");
    }

    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .filter(|t| !t.trim().is_empty())
      .ok_or(HintError::EmptyResponse(provider))?;

    info!(elapsed = ?start.elapsed(), reply_len = text.len(), "OpenRouter reply received");
    Ok(text)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessageReq<'a>>,
}
#[derive(Serialize)]
struct ChatMessageReq<'a> { role: &'a str, content: &'a str }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  #[serde(default)] choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}
