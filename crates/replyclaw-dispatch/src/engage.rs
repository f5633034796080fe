//! Best-effort engagement ("like") on the parent post.
//!
//! Runs before the reply is composed and never gates it: every outcome is
//! logged and ignored by the caller.

use std::time::Duration;

use replyclaw_core::pacing::{Pacing, PacingCategory};
use replyclaw_surface::{Lookup, Surface};

use crate::markers;

/// Terminal outcome of one engagement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngageOutcome {
    /// Engage control clicked.
    Engaged,
    /// Post was already engaged; nothing done.
    AlreadyEngaged,
    /// Post deleted, suspended, or missing.
    Unavailable,
    /// Transport fault, login redirect, or control never found.
    SurfaceError,
}

/// Bounded wait for the already-engaged probe.
const ALREADY_ENGAGED_TIMEOUT: Duration = Duration::from_secs(3);
/// Bounded wait for the engage control itself.
const ENGAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Navigate to the post and engage it unless it already is.
pub async fn engage(surface: &dyn Surface, pacing: &Pacing, post_id: u64) -> EngageOutcome {
    let url = markers::post_url(post_id);
    tracing::info!("→ [engage] opening post page: {url}");

    if let Err(e) = surface.navigate(&url).await {
        tracing::warn!("✗ [engage] navigation failed: {e}");
        return EngageOutcome::SurfaceError;
    }

    tokio::time::sleep(pacing.delay(PacingCategory::EngagementPageSettle)).await;

    match surface.address().await {
        Ok(address) if markers::is_login_address(&address) => {
            tracing::warn!("✗ [engage] redirected to login — the auth snapshot is no longer valid");
            return EngageOutcome::SurfaceError;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("✗ [engage] address check failed: {e}");
            return EngageOutcome::SurfaceError;
        }
    }

    for marker in markers::UNAVAILABLE_MARKERS {
        if surface.has_text(marker).await {
            tracing::info!("✗ [engage] post unavailable ({marker})");
            return EngageOutcome::Unavailable;
        }
    }

    tokio::time::sleep(pacing.delay(PacingCategory::PreEngagementClick)).await;

    // The opposite control is checked first so the action never double-fires.
    if surface
        .find_control(markers::ALREADY_ENGAGED, ALREADY_ENGAGED_TIMEOUT)
        .await
        .is_found()
    {
        tracing::info!("✓ [engage] already engaged, skipping");
        return EngageOutcome::AlreadyEngaged;
    }

    match surface.find_control(markers::ENGAGE, ENGAGE_TIMEOUT).await {
        Lookup::Found(control) => match surface.click(&control).await {
            Ok(()) => {
                tracing::info!("✓ [engage] done");
                EngageOutcome::Engaged
            }
            Err(e) => {
                tracing::warn!("✗ [engage] click failed: {e}");
                EngageOutcome::SurfaceError
            }
        },
        Lookup::NotFound => {
            tracing::warn!("✗ [engage] engage control not found");
            EngageOutcome::SurfaceError
        }
        Lookup::Error(e) => {
            tracing::warn!("✗ [engage] control lookup failed: {e}");
            EngageOutcome::SurfaceError
        }
    }
}
