//! # ReplyClaw Scheduler
//!
//! Recurring, time-windowed launcher for dispatch runs: a daily hour gate,
//! a single-slot run guard, an isolated job runner, and an append-only
//! timestamped run log.

pub mod engine;
pub mod gate;
pub mod guard;
pub mod runlog;
pub mod runner;

pub use engine::Scheduler;
pub use gate::TimeWindow;
pub use guard::{RunGuard, RunPermit};
pub use runlog::RunLog;
pub use runner::{JobRunner, ProcessRunner};
