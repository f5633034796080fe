//! The dispatch loop — one fetched batch, processed strictly in order.
//!
//! One surface session is acquired by the caller before the loop and
//! released exactly once after it, on every exit path. Items never run
//! concurrently and a single item's skip never aborts the run; only a
//! store write failure does.

use async_trait::async_trait;

use replyclaw_core::pacing::{Pacing, PacingCategory};
use replyclaw_core::{DispatchReport, ReplyStatus, Result, WorkItem};
use replyclaw_surface::Surface;

use crate::reply::ReplyMachine;

/// Status write-back boundary — the one store operation the loop needs.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn update_status(&self, id: &str, status: ReplyStatus) -> Result<()>;
}

#[async_trait]
impl StatusSink for replyclaw_queue::QueueClient {
    async fn update_status(&self, id: &str, status: ReplyStatus) -> Result<()> {
        replyclaw_queue::QueueClient::update_status(self, id, status).await
    }
}

/// Sequential dispatcher over one shared surface session.
pub struct DispatchLoop<'a> {
    surface: &'a dyn Surface,
    sink: &'a dyn StatusSink,
    pacing: &'a Pacing,
}

impl<'a> DispatchLoop<'a> {
    pub fn new(surface: &'a dyn Surface, sink: &'a dyn StatusSink, pacing: &'a Pacing) -> Self {
        Self {
            surface,
            sink,
            pacing,
        }
    }

    /// Process a fetched batch. The batch is stable for the run's lifetime;
    /// there is no re-fetch mid-run.
    pub async fn run(&self, items: &[WorkItem]) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();
        let total = items.len();
        let machine = ReplyMachine::new(self.surface, self.pacing);

        for (idx, item) in items.iter().enumerate() {
            tracing::info!("─── [{}/{}] item {} ───", idx + 1, total, item.id);
            report.attempted += 1;

            let status = if !item.is_dispatchable() {
                // Precondition skip: the surface is never touched.
                tracing::warn!("✗ empty target or draft → SKIP");
                ReplyStatus::Skip
            } else {
                let outcome = machine.run(&item.target_url, &item.draft_text).await;
                if outcome.is_complete() {
                    ReplyStatus::Complete
                } else {
                    ReplyStatus::Skip
                }
            };

            self.sink.update_status(&item.id, status).await?;
            tracing::info!("→ store updated: {status} ({})", item.id);

            match status {
                ReplyStatus::Complete => report.succeeded += 1,
                _ => report.skipped += 1,
            }

            if idx + 1 < total {
                let pause = self.pacing.delay(PacingCategory::InterItem);
                tracing::info!("… next item in {:.0}s", pause.as_secs_f64());
                tokio::time::sleep(pause).await;
            }
        }

        Ok(report)
    }
}
