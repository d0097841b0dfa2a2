use std::sync::Arc;

use crate::chat::session::SessionStore;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` while degraded: no credential was configured at startup.
    pub llm: Option<Arc<dyn CompletionClient>>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, llm: Option<Arc<dyn CompletionClient>>) -> Self {
        let sessions = SessionStore::new(config.chat_variant, config.session_idle_timeout);
        Self {
            config,
            llm,
            sessions,
        }
    }

    /// The completion client, or the configuration error every AI action
    /// reports while degraded.
    pub fn completion(&self) -> Result<&dyn CompletionClient, AppError> {
        self.llm.as_deref().ok_or(AppError::MissingCredential)
    }
}
