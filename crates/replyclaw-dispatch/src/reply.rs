//! The per-item reply state machine.
//!
//! Drives one work item from draft to a terminal outcome:
//! navigate → session check → availability check → optional engagement →
//! compose → submit. Every guard failure resolves to a typed skip and one
//! diagnostic log line; nothing raises out of a pass.

use std::path::PathBuf;
use std::time::Duration;

use replyclaw_core::pacing::{Pacing, PacingCategory};
use replyclaw_surface::{Control, Lookup, Surface};

use crate::engage::engage;
use crate::markers;
use crate::parent::parent_post_id;

/// Why an item ended as Skip. Mirrors the per-item failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Navigation or surface transport failure.
    Transport,
    /// Login redirect observed — the auth snapshot is stale.
    SessionInvalid,
    /// Target deleted, suspended, or missing.
    TargetUnavailable,
    /// An expected control never appeared within its timeout.
    ControlNotFound,
}

/// Terminal outcome of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Complete,
    Skip(SkipReason),
}

impl ReplyOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReplyOutcome::Complete)
    }
}

/// Bounded wait for the composer.
const COMPOSER_TIMEOUT: Duration = Duration::from_secs(15);
/// Bounded wait per submit control variant.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// One state-machine instance; construct once per run, drive once per item.
pub struct ReplyMachine<'a> {
    surface: &'a dyn Surface,
    pacing: &'a Pacing,
    diagnostic_path: PathBuf,
}

impl<'a> ReplyMachine<'a> {
    pub fn new(surface: &'a dyn Surface, pacing: &'a Pacing) -> Self {
        Self {
            surface,
            pacing,
            diagnostic_path: PathBuf::from("debug_screenshot.png"),
        }
    }

    /// Where composer-not-found diagnostics land.
    pub fn with_diagnostic_path(mut self, path: PathBuf) -> Self {
        self.diagnostic_path = path;
        self
    }

    /// Drive one item to a terminal outcome.
    pub async fn run(&self, target_url: &str, draft_text: &str) -> ReplyOutcome {
        tracing::info!("→ opening target: {}", truncate(target_url, 80));
        if let Err(e) = self.surface.navigate(target_url).await {
            tracing::warn!("✗ navigation failed: {e}");
            return ReplyOutcome::Skip(SkipReason::Transport);
        }
        tokio::time::sleep(self.pacing.delay(PacingCategory::PageSettle)).await;

        if let Some(skip) = self.check_session().await {
            return ReplyOutcome::Skip(skip);
        }

        for marker in markers::UNAVAILABLE_MARKERS {
            if self.surface.has_text(marker).await {
                tracing::info!("✗ target unavailable ({marker})");
                return ReplyOutcome::Skip(SkipReason::TargetUnavailable);
            }
        }

        // Engagement detour: best-effort, never gates the reply. Parsing
        // failure means the step is simply absent.
        match parent_post_id(target_url) {
            Some(post_id) => {
                tokio::time::sleep(self.pacing.delay(PacingCategory::PreEngagement)).await;
                let outcome = engage(self.surface, self.pacing, post_id).await;
                tracing::info!("[engage] outcome: {outcome:?}");

                // The detour replaced the page; return to the composer.
                if let Err(e) = self.surface.navigate(target_url).await {
                    tracing::warn!("✗ return navigation failed: {e}");
                    return ReplyOutcome::Skip(SkipReason::Transport);
                }
                tokio::time::sleep(self.pacing.delay(PacingCategory::PageSettle)).await;
            }
            None => {
                tracing::info!("[engage] no parent post id in target, step skipped");
            }
        }

        let composer = match self
            .surface
            .find_control(markers::COMPOSER, COMPOSER_TIMEOUT)
            .await
        {
            Lookup::Found(control) => control,
            Lookup::NotFound => {
                tracing::warn!("✗ composer not found");
                self.capture_diagnostic().await;
                return ReplyOutcome::Skip(SkipReason::ControlNotFound);
            }
            Lookup::Error(e) => {
                tracing::warn!("✗ composer lookup failed: {e}");
                self.capture_diagnostic().await;
                return ReplyOutcome::Skip(SkipReason::ControlNotFound);
            }
        };

        if let Err(e) = self.compose(&composer, draft_text).await {
            tracing::warn!("✗ compose failed: {e}");
            return ReplyOutcome::Skip(SkipReason::Transport);
        }

        tokio::time::sleep(self.pacing.delay(PacingCategory::PreSubmit)).await;
        self.submit().await
    }

    /// Login-flow redirect means the session snapshot went stale.
    async fn check_session(&self) -> Option<SkipReason> {
        match self.surface.address().await {
            Ok(address) if markers::is_login_address(&address) => {
                tracing::warn!(
                    "✗ redirected to login — run `replyclaw --setup-auth` to refresh the session"
                );
                Some(SkipReason::SessionInvalid)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("✗ address check failed: {e}");
                Some(SkipReason::Transport)
            }
        }
    }

    /// Focus the composer, clear any URL-prefilled text, then emit the
    /// draft one character at a time. Bulk insertion is both more
    /// detectable and less reliable against the dynamic input control.
    async fn compose(&self, composer: &Control, draft_text: &str) -> replyclaw_core::Result<()> {
        self.surface.click(composer).await?;
        self.surface.clear_input(composer).await?;
        tracing::info!("… typing draft: 「{}」", truncate(draft_text, 50));
        for unit in draft_text.chars() {
            self.surface.type_unit(composer, unit).await?;
            tokio::time::sleep(self.pacing.delay(PacingCategory::Typing)).await;
        }
        Ok(())
    }

    /// Try each submit control variant in order; first found wins.
    async fn submit(&self) -> ReplyOutcome {
        for selector in markers::SUBMIT_CONTROLS {
            match self.surface.find_control(selector, SUBMIT_TIMEOUT).await {
                Lookup::Found(control) => match self.surface.click(&control).await {
                    Ok(()) => {
                        tracing::info!("✓ reply submitted");
                        return ReplyOutcome::Complete;
                    }
                    Err(e) => {
                        tracing::warn!("✗ submit click failed ({selector}): {e}");
                        continue;
                    }
                },
                Lookup::NotFound => continue,
                Lookup::Error(e) => {
                    tracing::warn!("✗ submit lookup failed ({selector}): {e}");
                    continue;
                }
            }
        }
        tracing::warn!("✗ no submit control found");
        ReplyOutcome::Skip(SkipReason::ControlNotFound)
    }

    async fn capture_diagnostic(&self) {
        match self.surface.capture_diagnostic(&self.diagnostic_path).await {
            Ok(()) => tracing::info!("📸 diagnostic saved: {}", self.diagnostic_path.display()),
            Err(e) => tracing::warn!("diagnostic capture failed: {e}"),
        }
    }
}

/// Char-safe prefix for log lines.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
