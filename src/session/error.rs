//! Session error types

use crate::presets::PresetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Nothing to search: the query is empty")]
    EmptyQuery,

    #[error("History entry not found: {0}")]
    HistoryNotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error(transparent)]
    Preset(#[from] PresetError),
}
