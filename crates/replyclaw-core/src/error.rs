//! ReplyClaw error taxonomy.
//!
//! Per-item dispatch failures are not errors — they resolve to a Skip
//! status inside the dispatch loop and never escape it. The variants here
//! are the conditions that abort or escape a run: bad configuration, store
//! failures, surface transport faults, scheduler plumbing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplyClawError>;

/// Workspace-wide error type.
#[derive(Debug, Error)]
pub enum ReplyClawError {
    /// Missing or unusable configuration (auth snapshot, credentials).
    /// Fatal: aborts a run before any item is touched.
    #[error("config error: {0}")]
    Config(String),

    /// Work-queue fetch or update failure. Never swallowed.
    #[error("store error: {0}")]
    Store(String),

    /// Automation-surface transport failure (session, command IO).
    #[error("surface error: {0}")]
    Surface(String),

    /// Scheduler plumbing failure (spawn, stream drain).
    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
