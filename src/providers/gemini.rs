//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{upstream_error, HintProvider};
use crate::config::UpstreamSettings;
use crate::domain::ProviderKind;
use crate::error::HintError;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
  client: reqwest::Client,
  api_key: Option<String>,
  base_url: String,
  model: String,
}

impl GeminiClient {
  pub fn new(client: reqwest::Client, cfg: &UpstreamSettings) -> Self {
    Self {
      client,
      api_key: cfg.api_key.clone(),
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      model: cfg.model.clone(),
    }
  }

  fn endpoint(&self) -> String {
    format!("{}/models/{}:generateContent", self.base_url, self.model)
  }
}

#[async_trait]
impl HintProvider for GeminiClient {
  fn kind(&self) -> ProviderKind { ProviderKind::Google }

  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate_hint(&self, prompt: &str) -> Result<String, HintError> {
    let provider = self.kind();
    let api_key = self.api_key.as_deref().ok_or(HintError::MissingApiKey(provider))?;

    let req = GenerateContentRequest {
      contents: vec![Content { role: "user", parts: vec![PartReq { text: prompt }] }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(self.endpoint())
      .header(API_KEY_HEADER, api_key)
      .json(&req).send().await
      .map_err(|source| HintError::Transport { provider, source })?;

    if !res.status().is_success() {
      return Err(upstream_error(provider, res).await);
    }

    let body: GenerateContentResponse = res.json().await
      .map_err(|e| HintError::Decode { provider, message: e.to_string() })?;
    if let Some(feedback) = body.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
      warn!(block_reason = %feedback, "Gemini blocked the prompt");
    }

    // Same as the SDK's `text()`: join every text part of the first candidate.
    let text: String = body.candidates.into_iter().next()
      .and_then(|c| c.content)
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
      .unwrap_or_default();
    if text.trim().is_empty() {
      return Err(HintError::EmptyResponse(provider));
    }

    info!(elapsed = ?start.elapsed(), reply_len = text.len(), "Gemini reply received");
    Ok(text)
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
  contents: Vec<Content<'a>>,
}
#[derive(Serialize)]
struct Content<'a> { role: &'a str, parts: Vec<PartReq<'a>> }
#[derive(Serialize)]
struct PartReq<'a> { text: &'a str }

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] prompt_feedback: Option<PromptFeedback>,
}
#[derive(Deserialize)]
struct Candidate { #[serde(default)] content: Option<ContentResp> }
#[derive(Deserialize)]
struct ContentResp { #[serde(default)] parts: Vec<PartResp> }
#[derive(Deserialize)]
struct PartResp { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback { #[serde(default)] block_reason: Option<String> }
