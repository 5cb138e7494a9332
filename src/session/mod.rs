//! Session state and persistence

mod context;
mod error;
mod preferences;

pub use context::{SearchLaunch, Session};
pub use error::SessionError;
pub use preferences::{Preferences, PreferencesUpdate};
