//! Work-queue data model shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a queued reply task. Wire values are the store's
/// native strings — `Skip` is stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyStatus {
    Draft,
    Complete,
    #[serde(rename = "SKIP")]
    Skip,
}

impl ReplyStatus {
    /// The store's string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStatus::Draft => "Draft",
            ReplyStatus::Complete => "Complete",
            ReplyStatus::Skip => "SKIP",
        }
    }
}

impl std::fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One pending reply task fetched from the work queue.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Store-owned record id; referenced, never rewritten locally.
    pub id: String,
    /// Reply-composition target address; may carry a parent-post id.
    pub target_url: String,
    /// Text to submit.
    pub draft_text: String,
    /// Generation timestamp — used only for date filtering.
    pub generated_at: Option<DateTime<Utc>>,
    /// Current lifecycle status.
    pub status: ReplyStatus,
}

impl WorkItem {
    /// Dispatch eligibility: Draft status with both the target address and
    /// draft text non-empty after trimming. Ineligible items skip without
    /// any surface interaction.
    pub fn is_dispatchable(&self) -> bool {
        self.status == ReplyStatus::Draft
            && !self.target_url.trim().is_empty()
            && !self.draft_text.trim().is_empty()
    }

    /// Short draft preview for log lines.
    pub fn draft_preview(&self) -> String {
        let mut preview: String = self.draft_text.chars().take(30).collect();
        if self.draft_text.chars().count() > 30 {
            preview.push_str("...");
        }
        preview
    }
}

/// Aggregated outcome of one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Items processed (including precondition skips).
    pub attempted: usize,
    /// Items that reached Complete.
    pub succeeded: usize,
    /// Items that ended as Skip.
    pub skipped: usize,
}
