//! Persisted settings for the AI collaborators.
//!
//! Settings live as pretty JSON at `<config dir>/datalens/config.json`. A
//! missing or unreadable file is not an error: defaults are used instead.

use anyhow::{Context as _, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TIMEOUT_ENV: &str = "DATALENS_AI_TIMEOUT_SECS";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AIConfig {
    pub enabled: bool,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on a single language model round trip.
    pub timeout_secs: u64,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o".to_owned(),
            temperature: 0.4,
            max_tokens: 800,
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

impl AIConfig {
    /// Effective timeout: `DATALENS_AI_TIMEOUT_SECS` when set to a positive
    /// integer, otherwise `timeout_secs` (itself floored at one second).
    pub fn timeout(&self) -> Duration {
        let secs = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(self.timeout_secs.max(1));
        Duration::from_secs(secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// AI assistant configuration
    pub ai: AIConfig,
}

/// Reads the API key from the environment, if any.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(|key| SecretString::new(key.into()))
}

pub fn get_config_path() -> Result<PathBuf> {
    let base_dir = dirs::config_dir().context("Failed to determine config directory")?;
    Ok(base_dir.join("datalens").join("config.json"))
}

pub fn load_app_config() -> AppSettings {
    match get_config_path() {
        Ok(path) => load_app_config_from(&path),
        Err(_) => AppSettings::default(),
    }
}

pub fn load_app_config_from(path: &Path) -> AppSettings {
    if path.exists()
        && let Ok(content) = std::fs::read_to_string(path)
        && let Ok(settings) = serde_json::from_str::<AppSettings>(&content)
    {
        return settings;
    }
    AppSettings::default()
}

pub fn save_app_config(settings: &AppSettings) -> Result<()> {
    save_app_config_to(settings, &get_config_path()?)
}

pub fn save_app_config_to(settings: &AppSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("datalens-config-{}-{name}", std::process::id()))
            .join("config.json")
    }

    #[test]
    fn test_defaults_match_assistant_settings() {
        let config = AIConfig::default();
        assert!(config.enabled);
        assert_eq!(config.temperature, 0.4);
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_round_trip_through_disk() {
        let path = scratch_path("round-trip");
        let mut settings = AppSettings::default();
        settings.ai.model = "gpt-4o-mini".to_owned();
        settings.ai.timeout_secs = 5;

        save_app_config_to(&settings, &path).expect("save");
        assert_eq!(load_app_config_from(&path), settings);

        if let Some(dir) = path.parent() {
            let _removed = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_or_corrupt_file_falls_back_to_defaults() {
        let missing = scratch_path("missing");
        assert_eq!(load_app_config_from(&missing), AppSettings::default());

        let corrupt = scratch_path("corrupt");
        if let Some(dir) = corrupt.parent() {
            std::fs::create_dir_all(dir).expect("mkdir");
        }
        std::fs::write(&corrupt, "{ not json").expect("write");
        assert_eq!(load_app_config_from(&corrupt), AppSettings::default());
        if let Some(dir) = corrupt.parent() {
            let _removed = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"ai": {"model": "local"}}"#).expect("parse");
        assert_eq!(settings.ai.model, "local");
        assert_eq!(settings.ai.max_tokens, 800);
    }
}
