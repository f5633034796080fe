//! Parent-post id extraction from a reply-composition URL.
//!
//! Grammar: the decimal digits forming the value of an `in_reply_to` query
//! key. Anything else — missing key, empty value, non-digit characters —
//! is an explicit None, never a best-effort guess.

/// Extract the parent post id from a target URL.
pub fn parent_post_id(url: &str) -> Option<u64> {
    let (_, query) = url.split_once('?')?;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key != "in_reply_to" {
            continue;
        }
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return value.parse().ok();
    }
    None
}
