//! ODE tutor · hosted hint endpoint
//!
//! Serves only `POST /api/ai-hint` (and `/api/health`), with CORS pinned to
//! ALLOWED_ORIGIN. Same environment as the local server otherwise.

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use ode_tutor::routes::build_handler_router;
use ode_tutor::{shutdown_signal, telemetry, AppState, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing();

  let settings = Settings::from_env()?;
  let state = Arc::new(AppState::from_settings(&settings)?);
  let app = build_handler_router(state, &settings.allowed_origin)?;

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(
    target: "ode_tutor",
    %addr,
    provider = settings.provider.display_name(),
    allowed_origin = %settings.allowed_origin,
    "AI hint handler listening"
  );
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  Ok(())
}
