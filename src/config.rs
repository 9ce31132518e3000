use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use lazy_static::lazy_static;

use crate::skills::model::SkillCategory;

/// User-tunable settings, read once from config.toml in the app data directory.
/// Missing or malformed files fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Overrides the platform data directory when set
    pub data_dir: Option<PathBuf>,
    /// Category preselected in the add-skill flow
    pub default_category: SkillCategory,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            default_category: SkillCategory::Dinking,
        }
    }
}

/// Platform-specific application data directory
pub fn app_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support/com.rallyup.app");
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push("com.rallyup.app");
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share/com.rallyup.app");
            return dir;
        }
    }

    // Fallback
    PathBuf::from("data")
}

fn config_path() -> PathBuf {
    let mut path = app_data_dir();
    path.push("config.toml");
    path
}

fn load_config_internal() -> AppConfig {
    let path = config_path();
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => return config,
            Err(e) => {
                tracing::warn!(
                    path = ?path,
                    error = %e,
                    "Failed to parse config.toml, using defaults"
                );
            }
        }
    }
    AppConfig::default()
}

lazy_static! {
    /// Global settings, loaded once on first access
    pub static ref SETTINGS: AppConfig = load_config_internal();
}

/// The resolved data directory: config override, or the platform default
pub fn data_dir() -> PathBuf {
    SETTINGS
        .data_dir
        .clone()
        .unwrap_or_else(app_data_dir)
}
