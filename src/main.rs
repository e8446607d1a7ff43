//! ODE tutor · local development server
//!
//! - Axum HTTP API at `POST /api/ai-hint`
//! - Static front end served from STATIC_ROOT (default: working directory)
//! - Wildcard CORS
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   AI_PROVIDER         : "google" (default) or "openrouter"
//!   GOOGLE_API_KEY      : Gemini key
//!   OPENROUTER_API_KEY  : OpenRouter key
//!   STATIC_ROOT         : directory served for non-API paths
//!   TUTOR_CONFIG_PATH   : optional TOML file (see `config`)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use ode_tutor::routes::build_local_router;
use ode_tutor::{shutdown_signal, telemetry, AppState, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing();

  let settings = Settings::from_env()?;
  let state = Arc::new(AppState::from_settings(&settings)?);
  let app = build_local_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(
    target: "ode_tutor",
    url = %format!("http://localhost:{}", settings.port),
    provider = settings.provider.display_name(),
    static_root = %settings.static_root.display(),
    "Local server running; open the URL to try the exercise"
  );
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  Ok(())
}
