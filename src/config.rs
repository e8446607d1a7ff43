//! Process configuration, resolved once at startup.
//!
//! Precedence (lowest to highest): built-in defaults, the optional TOML file
//! named by `TUTOR_CONFIG_PATH`, then environment variables. `.env` is loaded
//! by the binaries before resolution.
//!
//! Example TOML:
//! ```toml
//! provider = "openrouter"
//! port = 8080
//! static_root = "./public"
//!
//! [google]
//! model = "gemini-2.5-flash"
//!
//! [openrouter]
//! base_url = "https://openrouter.ai/api/v1"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ProviderKind;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://shir-openu.github.io";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
  #[error("Invalid number for {name}: {value}")]
  InvalidNumber { name: &'static str, value: String },
}

/// Connection details for one upstream provider.
#[derive(Clone, Debug)]
pub struct UpstreamSettings {
  pub base_url: String,
  pub model: String,
  pub api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Settings {
  pub provider: ProviderKind,
  pub google: UpstreamSettings,
  pub openrouter: UpstreamSettings,
  pub timeout: Duration,
  pub port: u16,
  pub static_root: PathBuf,
  /// Origin allowed by the hosted handler's CORS policy.
  pub allowed_origin: String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      provider: ProviderKind::Google,
      google: UpstreamSettings {
        base_url: DEFAULT_GOOGLE_BASE_URL.into(),
        model: DEFAULT_GOOGLE_MODEL.into(),
        api_key: None,
      },
      openrouter: UpstreamSettings {
        base_url: DEFAULT_OPENROUTER_BASE_URL.into(),
        model: DEFAULT_OPENROUTER_MODEL.into(),
        api_key: None,
      },
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      port: DEFAULT_PORT,
      static_root: PathBuf::from("."),
      allowed_origin: DEFAULT_ALLOWED_ORIGIN.into(),
    }
  }
}

/// Shape of the optional TOML file. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
  pub provider: Option<String>,
  pub port: Option<u16>,
  pub static_root: Option<PathBuf>,
  pub allowed_origin: Option<String>,
  pub timeout_secs: Option<u64>,
  pub google: FileUpstream,
  pub openrouter: FileUpstream,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileUpstream {
  pub base_url: Option<String>,
  pub model: Option<String>,
}

impl Settings {
  /// Resolve from the real process environment (and the TOML file it may name).
  pub fn from_env() -> Result<Self, ConfigError> {
    let file = match std::env::var("TUTOR_CONFIG_PATH") {
      Ok(path) => Some(load_file_config(&path)?),
      Err(_) => None,
    };
    Self::resolve(file, |key| std::env::var(key).ok())
  }

  /// Pure resolution over an optional file layer and a key lookup.
  pub fn resolve<F>(file: Option<FileConfig>, lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut s = Settings::default();
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut provider_tag = None;
    if let Some(f) = file {
      provider_tag = f.provider;
      if let Some(port) = f.port { s.port = port; }
      if let Some(root) = f.static_root { s.static_root = root; }
      if let Some(origin) = f.allowed_origin { s.allowed_origin = origin; }
      if let Some(secs) = f.timeout_secs { s.timeout = Duration::from_secs(secs); }
      if let Some(v) = f.google.base_url { s.google.base_url = v; }
      if let Some(v) = f.google.model { s.google.model = v; }
      if let Some(v) = f.openrouter.base_url { s.openrouter.base_url = v; }
      if let Some(v) = f.openrouter.model { s.openrouter.model = v; }
    }

    if let Some(tag) = var("AI_PROVIDER") { provider_tag = Some(tag); }
    if let Some(tag) = provider_tag {
      s.provider = match tag.parse::<ProviderKind>() {
        Ok(kind) => kind,
        Err(e) => {
          warn!(target: "ode_tutor", error = %e, "Falling back to the google provider");
          ProviderKind::Google
        }
      };
    }

    s.google.api_key = var("GOOGLE_API_KEY");
    s.openrouter.api_key = var("OPENROUTER_API_KEY");
    if let Some(v) = var("GOOGLE_BASE_URL") { s.google.base_url = v; }
    if let Some(v) = var("GOOGLE_MODEL") { s.google.model = v; }
    if let Some(v) = var("OPENROUTER_BASE_URL") { s.openrouter.base_url = v; }
    if let Some(v) = var("OPENROUTER_MODEL") { s.openrouter.model = v; }
    if let Some(v) = var("STATIC_ROOT") { s.static_root = PathBuf::from(v); }
    if let Some(v) = var("ALLOWED_ORIGIN") { s.allowed_origin = v; }
    if let Some(v) = var("PORT") { s.port = parse_number("PORT", &v)?; }
    if let Some(v) = var("UPSTREAM_TIMEOUT_SECS") {
      s.timeout = Duration::from_secs(parse_number("UPSTREAM_TIMEOUT_SECS", &v)?);
    }

    Ok(s)
  }

  /// Settings of the provider requests will be sent to.
  pub fn active_upstream(&self) -> &UpstreamSettings {
    match self.provider {
      ProviderKind::Google => &self.google,
      ProviderKind::OpenRouter => &self.openrouter,
    }
  }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
  value
    .trim()
    .parse::<T>()
    .map_err(|_| ConfigError::InvalidNumber { name, value: value.to_string() })
}

pub fn load_file_config(path: &str) -> Result<FileConfig, ConfigError> {
  let raw = std::fs::read_to_string(path)
    .map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
  let cfg = toml::from_str::<FileConfig>(&raw)
    .map_err(|source| ConfigError::Parse { path: path.to_string(), source })?;
  info!(target: "ode_tutor", %path, "Loaded tutor config (TOML)");
  Ok(cfg)
}
