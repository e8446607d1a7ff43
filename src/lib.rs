//! ODE tutor · AI hint backend
//!
//! A student submits an answer for one of the five steps of a 3×3 linear ODE
//! exercise; we wrap it in a fixed tutoring prompt, ask the configured AI
//! provider for a hint, and return the hint as JSON. After ten attempts the full
//! solution is revealed without asking any provider.
//!
//! Two binaries share this library:
//!   - `ode-tutor-backend` : local development server (hint API + static files)
//!   - `ai-hint-handler`   : hosted hint endpoint with a pinned CORS origin

pub mod config;
pub mod domain;
pub mod error;
pub mod logic;
pub mod prompt;
pub mod protocol;
pub mod providers;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::Settings;
pub use domain::{ProviderKind, MAX_ATTEMPTS};
pub use error::HintError;
pub use providers::HintProvider;
pub use state::AppState;

/// Resolves when Ctrl-C is received; used for graceful shutdown by both binaries.
pub async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "ode_tutor", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  tracing::info!(target: "ode_tutor", "Shutdown signal received");
}
