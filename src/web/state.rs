//! Application state shared across handlers

use crate::ai::AiAssistant;
use crate::config::Settings;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// The single user session; each handler holds the lock for one update
    pub session: Arc<Mutex<Session>>,
    /// Query generation assistant
    pub assistant: Arc<AiAssistant>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, session: Session, assistant: AiAssistant) -> Self {
        Self {
            settings: Arc::new(settings),
            session: Arc::new(Mutex::new(session)),
            assistant: Arc::new(assistant),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
