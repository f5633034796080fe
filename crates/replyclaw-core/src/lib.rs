//! # ReplyClaw Core
//!
//! Shared foundation for the ReplyClaw workspace: configuration, the error
//! taxonomy, work-queue types, and the pacing policy.

pub mod config;
pub mod error;
pub mod pacing;
pub mod types;

pub use config::ReplyClawConfig;
pub use error::{ReplyClawError, Result};
pub use pacing::{DelayRange, Pacing, PacingCategory};
pub use types::{DispatchReport, ReplyStatus, WorkItem};
