//! Presets and shortcuts
//!
//! Built-in presets and shortcuts are seeded from code and never persisted.
//! User presets are mutable and are the only presets written to the store.

mod builtin;
mod library;
mod models;

pub use builtin::{builtin_presets, builtin_shortcuts};
pub use library::{PresetError, PresetLibrary};
pub use models::{Preset, Shortcut};
