//! Application state shared by every request: the selected provider and static root.
//!
//! Nothing here is mutated after startup.

use std::{path::PathBuf, sync::Arc};
use tracing::{info, instrument, warn};

use crate::config::Settings;
use crate::domain::ProviderKind;
use crate::providers::{self, HintProvider};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn HintProvider>,
    pub static_root: PathBuf,
}

impl AppState {
    /// Build state from resolved settings: construct the one configured provider.
    #[instrument(level = "info", skip_all, fields(provider = %settings.provider))]
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let provider = providers::from_settings(settings)?;
        let upstream = settings.active_upstream();
        if upstream.api_key.is_none() {
            warn!(target: "ode_tutor", provider = %settings.provider, "No API key configured; hint requests will fail until one is set.");
        }
        info!(target: "ode_tutor", provider = %settings.provider, model = %upstream.model, base_url = %upstream.base_url, "Hint provider ready.");
        Ok(Self::new(provider, settings.static_root.clone()))
    }

    pub fn new(provider: Arc<dyn HintProvider>, static_root: PathBuf) -> Self {
        Self { provider, static_root }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }
}
