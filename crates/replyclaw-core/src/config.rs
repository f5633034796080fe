//! ReplyClaw configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReplyClawError, Result};
use crate::pacing::Pacing;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyClawConfig {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub pacing: Pacing,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl ReplyClawConfig {
    /// Load config from the default path (~/.replyclaw/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplyClawError::Config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ReplyClawError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the ReplyClaw home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".replyclaw")
    }
}

/// Work-queue (store) access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// API token. Leave empty to take it from REPLYCLAW_AIRTABLE_TOKEN.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_table() -> String { "ReplyDrafts".into() }
fn default_api_base() -> String { "https://api.airtable.com/v0".into() }

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_id: String::new(),
            table: default_table(),
            api_base: default_api_base(),
        }
    }
}

impl QueueConfig {
    /// Token with the environment override applied.
    pub fn resolved_token(&self) -> String {
        std::env::var("REPLYCLAW_AIRTABLE_TOKEN").unwrap_or_else(|_| self.token.clone())
    }
}

/// Automation-surface (browser session) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// WebDriver endpoint (a local chromedriver).
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Auth snapshot path, produced by --setup-auth.
    #[serde(default = "default_auth_state")]
    pub auth_state: String,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_webdriver_url() -> String { "http://127.0.0.1:9515".into() }
fn default_auth_state() -> String { "~/.replyclaw/auth_state.json".into() }
fn default_viewport_width() -> u32 { 1280 }
fn default_viewport_height() -> u32 { 900 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/131.0.0.0 Safari/537.36"
        .into()
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            auth_state: default_auth_state(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_user_agent(),
        }
    }
}

impl SurfaceConfig {
    /// Auth snapshot path with ~ expanded.
    pub fn auth_state_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.auth_state).to_string())
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// First hour of the daily window (local time).
    #[serde(default = "default_window_start")]
    pub window_start: u32,
    /// First hour past the daily window.
    #[serde(default = "default_window_end")]
    pub window_end: u32,
    /// Minutes between dispatch runs.
    #[serde(default = "default_tick_minutes")]
    pub tick_minutes: u64,
    /// Seconds between due-time checks.
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
    /// Append-only run log path.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_window_start() -> u32 { 9 }
fn default_window_end() -> u32 { 22 }
fn default_tick_minutes() -> u64 { 30 }
fn default_poll_seconds() -> u64 { 30 }
fn default_log_file() -> String { "~/.replyclaw/task_log.txt".into() }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            window_start: default_window_start(),
            window_end: default_window_end(),
            tick_minutes: default_tick_minutes(),
            poll_seconds: default_poll_seconds(),
            log_file: default_log_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ReplyClawConfig = toml::from_str("").unwrap();
        assert_eq!(config.schedule.window_start, 9);
        assert_eq!(config.schedule.window_end, 22);
        assert_eq!(config.schedule.tick_minutes, 30);
        assert_eq!(config.surface.viewport_width, 1280);
        assert_eq!(config.queue.api_base, "https://api.airtable.com/v0");
    }

    #[test]
    fn test_partial_section_override() {
        let config: ReplyClawConfig = toml::from_str(
            "[schedule]\nwindow_start = 8\n\n[queue]\nbase_id = \"appXYZ\"\n",
        )
        .unwrap();
        assert_eq!(config.schedule.window_start, 8);
        assert_eq!(config.schedule.window_end, 22);
        assert_eq!(config.queue.base_id, "appXYZ");
        assert_eq!(config.queue.table, "ReplyDrafts");
    }

    #[test]
    fn test_auth_state_tilde_expansion() {
        let surface = SurfaceConfig::default();
        let path = surface.auth_state_path();
        assert!(path.ends_with(".replyclaw/auth_state.json"));
        assert!(!path.to_string_lossy().starts_with('~'));
    }
}
