//! Store record payloads — the queue's REST wire format.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use replyclaw_core::{ReplyStatus, WorkItem};

/// One page from the list endpoint. `offset` is present while more pages
/// remain.
#[derive(Debug, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
    pub offset: Option<String>,
}

/// A single record envelope.
#[derive(Debug, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: RecordFields,
}

/// The fields this system reads. Everything else in the record is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RecordFields {
    #[serde(rename = "ReplyStatus")]
    pub reply_status: Option<ReplyStatus>,
    #[serde(rename = "GeneratedDate")]
    pub generated_date: Option<DateTime<Utc>>,
    #[serde(rename = "ReplyLink", default)]
    pub reply_link: String,
    #[serde(rename = "ReplyDraft", default)]
    pub reply_draft: String,
}

impl Record {
    /// Convert to the shared WorkItem shape. The record id is carried as-is;
    /// it stays owned by the store.
    pub fn into_work_item(self) -> WorkItem {
        WorkItem {
            id: self.id,
            target_url: self.fields.reply_link,
            draft_text: self.fields.reply_draft,
            generated_at: self.fields.generated_date,
            status: self.fields.reply_status.unwrap_or(ReplyStatus::Draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_work_item() {
        let json = r#"{
            "id": "recAAA111",
            "fields": {
                "ApproveCheck": true,
                "ReplyStatus": "Draft",
                "GeneratedDate": "2026-08-04T01:30:00.000Z",
                "ReplyLink": "https://x.com/intent/post?in_reply_to=12345",
                "ReplyDraft": "Great post!"
            }
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        let item = record.into_work_item();
        assert_eq!(item.id, "recAAA111");
        assert_eq!(item.status, ReplyStatus::Draft);
        assert_eq!(item.draft_text, "Great post!");
        assert!(item.generated_at.is_some());
        assert!(item.is_dispatchable());
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let record: Record = serde_json::from_str(r#"{"id": "recBBB", "fields": {}}"#).unwrap();
        let item = record.into_work_item();
        assert!(item.target_url.is_empty());
        assert!(item.draft_text.is_empty());
        assert!(item.generated_at.is_none());
        assert!(!item.is_dispatchable());
    }

    #[test]
    fn test_page_offset_signals_more() {
        let page: RecordPage =
            serde_json::from_str(r#"{"records": [], "offset": "itrNEXT"}"#).unwrap();
        assert_eq!(page.offset.as_deref(), Some("itrNEXT"));
        let last: RecordPage = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(last.offset.is_none());
    }
}
