//! The automation-surface boundary trait.
//!
//! Everything the dispatcher knows about driving a page goes through here:
//! navigate, find-control, type, click. An implementation owns one live
//! session; the dispatch loop acquires it once per run and reuses it for
//! every item.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use replyclaw_core::Result;

use crate::lookup::{Control, Lookup};

#[async_trait]
pub trait Surface: Send + Sync {
    /// Load a target address.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Current page address (login-redirect detection).
    async fn address(&self) -> Result<String>;

    /// Whether the page currently shows the given text. Scan failures count
    /// as absent — an availability probe must not invent a skip.
    async fn has_text(&self, needle: &str) -> bool;

    /// Locate a control, waiting up to `timeout`.
    async fn find_control(&self, selector: &str, timeout: Duration) -> Lookup;

    /// Activate a control.
    async fn click(&self, control: &Control) -> Result<()>;

    /// Select-all + delete inside an input control.
    async fn clear_input(&self, control: &Control) -> Result<()>;

    /// Emit one character into an input control.
    async fn type_unit(&self, control: &Control, unit: char) -> Result<()>;

    /// Capture a full-page diagnostic image for later inspection.
    async fn capture_diagnostic(&self, path: &Path) -> Result<()>;
}
