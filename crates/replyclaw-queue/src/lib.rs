//! # ReplyClaw Queue
//!
//! Client for the reply-draft work queue (an Airtable-style REST store).
//! Fetch and update only — no business logic and no retries.

pub mod client;
pub mod record;

pub use client::QueueClient;
pub use record::{Record, RecordFields, RecordPage};
