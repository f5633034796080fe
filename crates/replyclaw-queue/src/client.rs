//! Work-queue client — fetch/update against the reply-draft store.
//!
//! Fetch failures and write failures both surface as store errors to the
//! caller; nothing here retries. Ordering is store-native and preserved.

use chrono::{DateTime, FixedOffset, Utc};

use replyclaw_core::config::QueueConfig;
use replyclaw_core::{ReplyClawError, ReplyStatus, Result, WorkItem};

use crate::record::RecordPage;

/// Filter formula: approved drafts only.
const PENDING_FORMULA: &str = "AND({ApproveCheck}=1, {ReplyStatus}='Draft')";

/// REST client for the reply work queue.
pub struct QueueClient {
    client: reqwest::Client,
    config: QueueConfig,
}

impl QueueClient {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_base, self.config.base_id, self.config.table
        )
    }

    /// Fetch approved Draft items in store order, drained across pages, then
    /// optionally restricted to items generated today (store zone) and
    /// truncated to `limit` (0 = unlimited).
    pub async fn fetch_pending(&self, limit: usize, today_only: bool) -> Result<Vec<WorkItem>> {
        let mut items = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.table_url())
                .bearer_auth(self.config.resolved_token())
                .query(&[("filterByFormula", PENDING_FORMULA)]);
            if let Some(cursor) = &offset {
                request = request.query(&[("offset", cursor.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ReplyClawError::Store(format!("queue fetch failed: {e}")))?;
            if !response.status().is_success() {
                return Err(ReplyClawError::Store(format!(
                    "queue fetch: HTTP {}",
                    response.status()
                )));
            }
            let page: RecordPage = response
                .json()
                .await
                .map_err(|e| ReplyClawError::Store(format!("invalid queue response: {e}")))?;

            items.extend(page.records.into_iter().map(|r| r.into_work_item()));
            offset = page.offset;
            if offset.is_none() {
                break;
            }
        }

        tracing::debug!("queue returned {} record(s)", items.len());
        Ok(apply_batch_filters(items, limit, today_only, Utc::now()))
    }

    /// Write a terminal status. Single idempotent PATCH; no retry.
    pub async fn update_status(&self, id: &str, status: ReplyStatus) -> Result<()> {
        let body = serde_json::json!({ "fields": { "ReplyStatus": status.as_str() } });
        let response = self
            .client
            .patch(format!("{}/{}", self.table_url(), id))
            .bearer_auth(self.config.resolved_token())
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyClawError::Store(format!("status update failed: {e}")))?;
        if !response.status().is_success() {
            return Err(ReplyClawError::Store(format!(
                "status update for {id}: HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Today filter first, then limit truncation. Items without a generation
/// timestamp never pass the today filter.
fn apply_batch_filters(
    mut items: Vec<WorkItem>,
    limit: usize,
    today_only: bool,
    now: DateTime<Utc>,
) -> Vec<WorkItem> {
    if today_only {
        let start = start_of_today_in_store_zone(now);
        items.retain(|item| item.generated_at.is_some_and(|t| t >= start));
    }
    if limit > 0 {
        items.truncate(limit);
    }
    items
}

/// Start of the current day in the store's fixed UTC+9 zone, expressed in
/// UTC for comparison against record timestamps.
fn start_of_today_in_store_zone(now: DateTime<Utc>) -> DateTime<Utc> {
    let zone = FixedOffset::east_opt(9 * 3600).expect("fixed +09:00 offset");
    let midnight = now
        .with_timezone(&zone)
        .date_naive()
        .and_time(chrono::NaiveTime::MIN);
    match midnight.and_local_timezone(zone) {
        chrono::LocalResult::Single(t) => t.with_timezone(&Utc),
        // A fixed offset has no gaps or folds.
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, generated_at: Option<DateTime<Utc>>) -> WorkItem {
        WorkItem {
            id: id.into(),
            target_url: "https://x.com/intent/post?in_reply_to=1".into(),
            draft_text: "hi".into(),
            generated_at,
            status: ReplyStatus::Draft,
        }
    }

    #[test]
    fn test_pending_formula_and_table_url() {
        assert_eq!(PENDING_FORMULA, "AND({ApproveCheck}=1, {ReplyStatus}='Draft')");
        let client = QueueClient::new(QueueConfig {
            token: String::new(),
            base_id: "appXYZ".into(),
            table: "ReplyDrafts".into(),
            api_base: "https://api.airtable.com/v0".into(),
        });
        assert_eq!(
            client.table_url(),
            "https://api.airtable.com/v0/appXYZ/ReplyDrafts"
        );
    }

    #[test]
    fn test_store_day_starts_at_utc_15() {
        // 23:59 in the store zone is still "today"; the day began at
        // 15:00 UTC the previous calendar day.
        let now = Utc.with_ymd_and_hms(2026, 8, 4, 14, 59, 0).unwrap();
        let start = start_of_today_in_store_zone(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 3, 15, 0, 0).unwrap());

        // One minute later the store day rolls over.
        let next = Utc.with_ymd_and_hms(2026, 8, 4, 15, 0, 0).unwrap();
        let start = start_of_today_in_store_zone(next);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 4, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_today_filter_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 8, 4, 10, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 8, 3, 15, 0, 0).unwrap();
        let items = vec![
            item("on-boundary", Some(start)),
            item("before", Some(start - chrono::Duration::seconds(1))),
            item("undated", None),
        ];
        let kept = apply_batch_filters(items, 0, true, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "on-boundary");
    }

    #[test]
    fn test_limit_applies_after_filter() {
        let now = Utc.with_ymd_and_hms(2026, 8, 4, 10, 0, 0).unwrap();
        let fresh = now - chrono::Duration::hours(1);
        let stale = now - chrono::Duration::days(3);
        let items = vec![
            item("stale", Some(stale)),
            item("a", Some(fresh)),
            item("b", Some(fresh)),
            item("c", Some(fresh)),
        ];
        // The stale item must not consume a limit slot.
        let kept = apply_batch_filters(items, 2, true, now);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "a");
        assert_eq!(kept[1].id, "b");
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let now = Utc::now();
        let items = vec![item("a", None), item("b", None), item("c", None)];
        let kept = apply_batch_filters(items, 0, false, now);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_fetch_order_preserved() {
        let now = Utc::now();
        let items = vec![item("first", None), item("second", None)];
        let kept = apply_batch_filters(items, 0, false, now);
        assert_eq!(kept[0].id, "first");
        assert_eq!(kept[1].id, "second");
    }
}
