//! Pacing policy — bounded random delays shaping the dispatch cadence.
//!
//! Timing only, never correctness: each delay exists so the action rhythm
//! reads as human. All ranges are inclusive `[min, max]` seconds, collected
//! in one immutable `Pacing` value passed into the dispatch loop and reply
//! machine. `Pacing::zero()` is the deterministic test variant.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One inclusive delay range, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Draw a uniform delay from the range.
    pub fn sample(&self) -> Duration {
        if self.max_secs <= 0.0 {
            return Duration::ZERO;
        }
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

/// The timing categories a dispatch run draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingCategory {
    /// After navigating to the reply target.
    PageSettle,
    /// Between individual typed characters.
    Typing,
    /// Before activating the submit control.
    PreSubmit,
    /// Before starting the engagement detour.
    PreEngagement,
    /// After navigating to the engagement target.
    EngagementPageSettle,
    /// Before clicking the engage control.
    PreEngagementClick,
    /// Between work items.
    InterItem,
}

/// The full pacing table. Field defaults match the tuned production cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    #[serde(default = "d_page_settle")]
    pub page_settle: DelayRange,
    #[serde(default = "d_typing")]
    pub typing: DelayRange,
    #[serde(default = "d_pre_submit")]
    pub pre_submit: DelayRange,
    #[serde(default = "d_pre_engagement")]
    pub pre_engagement: DelayRange,
    #[serde(default = "d_engagement_page_settle")]
    pub engagement_page_settle: DelayRange,
    #[serde(default = "d_pre_engagement_click")]
    pub pre_engagement_click: DelayRange,
    #[serde(default = "d_inter_item")]
    pub inter_item: DelayRange,
}

fn d_page_settle() -> DelayRange { DelayRange::new(5.0, 10.0) }
fn d_typing() -> DelayRange { DelayRange::new(0.1, 0.3) }
fn d_pre_submit() -> DelayRange { DelayRange::new(2.0, 4.0) }
fn d_pre_engagement() -> DelayRange { DelayRange::new(3.0, 8.0) }
fn d_engagement_page_settle() -> DelayRange { DelayRange::new(3.0, 7.0) }
fn d_pre_engagement_click() -> DelayRange { DelayRange::new(1.0, 3.0) }
fn d_inter_item() -> DelayRange { DelayRange::new(60.0, 120.0) }

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_settle: d_page_settle(),
            typing: d_typing(),
            pre_submit: d_pre_submit(),
            pre_engagement: d_pre_engagement(),
            engagement_page_settle: d_engagement_page_settle(),
            pre_engagement_click: d_pre_engagement_click(),
            inter_item: d_inter_item(),
        }
    }
}

impl Pacing {
    /// All-zero variant — deterministic, for tests.
    pub const fn zero() -> Self {
        Self {
            page_settle: DelayRange::zero(),
            typing: DelayRange::zero(),
            pre_submit: DelayRange::zero(),
            pre_engagement: DelayRange::zero(),
            engagement_page_settle: DelayRange::zero(),
            pre_engagement_click: DelayRange::zero(),
            inter_item: DelayRange::zero(),
        }
    }

    /// The configured range for a category.
    pub fn range(&self, category: PacingCategory) -> DelayRange {
        match category {
            PacingCategory::PageSettle => self.page_settle,
            PacingCategory::Typing => self.typing,
            PacingCategory::PreSubmit => self.pre_submit,
            PacingCategory::PreEngagement => self.pre_engagement,
            PacingCategory::EngagementPageSettle => self.engagement_page_settle,
            PacingCategory::PreEngagementClick => self.pre_engagement_click,
            PacingCategory::InterItem => self.inter_item,
        }
    }

    /// Draw a delay for a category.
    pub fn delay(&self, category: PacingCategory) -> Duration {
        self.range(category).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_bounds() {
        let range = DelayRange::new(1.0, 3.0);
        for _ in 0..100 {
            let d = range.sample();
            assert!(d >= Duration::from_secs_f64(1.0));
            assert!(d <= Duration::from_secs_f64(3.0));
        }
    }

    #[test]
    fn test_zero_is_deterministic() {
        let pacing = Pacing::zero();
        assert_eq!(pacing.delay(PacingCategory::PageSettle), Duration::ZERO);
        assert_eq!(pacing.delay(PacingCategory::Typing), Duration::ZERO);
        assert_eq!(pacing.delay(PacingCategory::InterItem), Duration::ZERO);
    }

    #[test]
    fn test_defaults_cover_every_category() {
        let pacing = Pacing::default();
        for category in [
            PacingCategory::PageSettle,
            PacingCategory::Typing,
            PacingCategory::PreSubmit,
            PacingCategory::PreEngagement,
            PacingCategory::EngagementPageSettle,
            PacingCategory::PreEngagementClick,
            PacingCategory::InterItem,
        ] {
            let range = pacing.range(category);
            assert!(range.min_secs > 0.0);
            assert!(range.max_secs >= range.min_secs);
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let pacing: Pacing = toml::from_str(
            "typing = { min_secs = 0.0, max_secs = 0.0 }\n",
        )
        .unwrap();
        assert_eq!(pacing.typing, DelayRange::zero());
        assert_eq!(pacing.page_settle, DelayRange::new(5.0, 10.0));
    }
}
