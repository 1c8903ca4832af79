use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{TaskyError, TaskyResult};

const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_REFETCH_THROTTLE_MS: u64 = 3000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_key: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub server_addr: Option<String>,
    #[serde(default)]
    pub refetch_throttle_ms: Option<u64>,
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/tasky/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("tasky/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("tasky\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Config file (if any) with environment overrides applied.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read a config file, falling back to defaults when missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring invalid config {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Write the config as TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> TaskyResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TaskyError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("TASKY_SUPABASE_URL") {
            self.supabase_url = Some(v);
        }
        if let Some(v) = non_empty("TASKY_SUPABASE_KEY") {
            self.supabase_key = Some(v);
        }
        if let Some(v) = non_empty("TASKY_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        if let Some(v) = non_empty("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = non_empty("TASKY_AI_MODEL") {
            self.ai_model = Some(v);
        }
        if let Some(v) = non_empty("TASKY_SERVER_ADDR") {
            self.server_addr = Some(v);
        }
        if let Some(v) = non_empty("TASKY_REFETCH_THROTTLE_MS") {
            match v.parse() {
                Ok(ms) => self.refetch_throttle_ms = Some(ms),
                Err(_) => tracing::warn!("Ignoring invalid TASKY_REFETCH_THROTTLE_MS: {}", v),
            }
        }
    }

    pub fn supabase(&self) -> TaskyResult<SupabaseSettings> {
        let url = self
            .supabase_url
            .clone()
            .ok_or_else(|| TaskyError::Config("no supabase url configured".into()))?;
        let anon_key = self
            .supabase_key
            .clone()
            .ok_or_else(|| TaskyError::Config("no supabase key configured".into()))?;
        Ok(SupabaseSettings {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            access_token: self.access_token.clone(),
        })
    }

    pub fn effective_ai_model(&self) -> &str {
        self.ai_model.as_deref().unwrap_or(DEFAULT_AI_MODEL)
    }

    pub fn effective_server_addr(&self) -> &str {
        self.server_addr.as_deref().unwrap_or(DEFAULT_SERVER_ADDR)
    }

    pub fn refetch_throttle(&self) -> Duration {
        Duration::from_millis(
            self.refetch_throttle_ms
                .unwrap_or(DEFAULT_REFETCH_THROTTLE_MS),
        )
    }
}
