//! # ReplyClaw Dispatch
//!
//! The per-item reply state machine, the best-effort engagement action,
//! and the sequential dispatch loop that drives a fetched batch through a
//! single shared surface session.

pub mod engage;
pub mod markers;
pub mod parent;
pub mod reply;
pub mod run;

#[cfg(test)]
pub(crate) mod testing;

pub use engage::{EngageOutcome, engage};
pub use parent::parent_post_id;
pub use reply::{ReplyMachine, ReplyOutcome, SkipReason};
pub use run::{DispatchLoop, StatusSink};
