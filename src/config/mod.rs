//! Configuration module for Dorksmith
//!
//! Handles loading settings from YAML files and environment variables.
//! Settings are passed explicitly to the components that need them.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load settings from an explicit path, the environment, the default
/// locations, or fall back to defaults. Environment overrides always apply.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match find_settings_file(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("DORKSMITH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let paths = [
        Some(PathBuf::from("settings.yml")),
        Some(PathBuf::from("config/settings.yml")),
        dirs::config_dir().map(|p| p.join("dorksmith/settings.yml")),
    ];
    paths.into_iter().flatten().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        std::fs::write(&path, "general:\n  instance_name: Test\n").unwrap();

        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.general.instance_name, "Test");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        assert!(load(Some(Path::new("/definitely/not/here.yml"))).is_err());
    }
}
