//! Domain constants and the closed set of AI providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Student turns allowed before the full solution is revealed.
pub const MAX_ATTEMPTS: usize = 10;

/// Which remote text-generation backend produces the hints?
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
  /// Google Gemini via the generative-language API.
  #[default]
  Google,
  /// OpenRouter chat completions.
  OpenRouter,
}

impl ProviderKind {
  /// Tag used on the wire and in `AI_PROVIDER`.
  pub fn as_str(&self) -> &'static str {
    match self {
      ProviderKind::Google => "google",
      ProviderKind::OpenRouter => "openrouter",
    }
  }

  /// Human readable name for the startup banner.
  pub fn display_name(&self) -> &'static str {
    match self {
      ProviderKind::Google => "Google Gemini 2.5 Flash",
      ProviderKind::OpenRouter => "OpenRouter GPT-4o-mini",
    }
  }
}

impl fmt::Display for ProviderKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown AI provider '{}'", self.0)
  }
}

impl std::error::Error for UnknownProvider {}

impl FromStr for ProviderKind {
  type Err = UnknownProvider;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "google" | "gemini" => Ok(ProviderKind::Google),
      "openrouter" => Ok(ProviderKind::OpenRouter),
      other => Err(UnknownProvider(other.to_string())),
    }
  }
}
