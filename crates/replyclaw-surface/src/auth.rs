//! Authentication snapshot — the persisted session artifact.
//!
//! Produced once by the `--setup-auth` bootstrap and consumed at every run
//! start. Opaque to the dispatch loop; the only runtime invalidity signal
//! is an observed login redirect.

use serde::{Deserialize, Serialize};
use std::path::Path;

use replyclaw_core::{ReplyClawError, Result};

/// Cookies plus per-origin storage captured from a logged-in session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSnapshot {
    #[serde(default)]
    pub cookies: Vec<SessionCookie>,
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

/// One captured cookie, in the driver's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, rename = "httpOnly")]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

fn default_cookie_path() -> String {
    "/".into()
}

/// Local-storage entries for one origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginState {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

/// A single local-storage key/value pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

impl AuthSnapshot {
    /// Load the snapshot; a missing file carries the remediation hint.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReplyClawError::Config(format!(
                "auth snapshot not found at {} — run `replyclaw --setup-auth` and log in once",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ReplyClawError::Config(format!("unreadable auth snapshot: {e}")))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReplyClawError::Config(format!("serialize auth snapshot: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
