//! AI query assistant
//!
//! Translates a plain-language description into query text through a
//! third-party completion provider. The result is applied to the working
//! specification as free text only.

mod assistant;
mod client;
mod config;
mod prompt;
mod provider;

pub use assistant::AiAssistant;
pub use client::HttpCompletionProvider;
pub use config::{AiConfig, AiConfigView, STORAGE_DISCLAIMER};
pub use prompt::{clean_output, SYSTEM_PROMPT};
pub use provider::{AiError, Completion, CompletionProvider, CompletionRequest, ProviderKind};
