//! Surface text markers and control selectors for the posting surface.

/// Text fragments that identify a deleted, suspended, or broken post page.
pub const UNAVAILABLE_MARKERS: &[&str] = &[
    "This post is unavailable",
    "This Tweet is unavailable",
    "This account doesn't exist",
    "Hmm...this page doesn't exist",
    "Something went wrong. Try reloading",
];

/// Address fragments that identify a redirect into the login flow.
pub const LOGIN_MARKERS: &[&str] = &["login", "flow/login"];

/// Reply composer input.
pub const COMPOSER: &str = "[data-testid=\"tweetTextarea_0\"]";

/// Submit controls, tried in order: primary, then the inline variant.
pub const SUBMIT_CONTROLS: &[&str] = &[
    "[data-testid=\"tweetButton\"]",
    "[data-testid=\"tweetButtonInline\"]",
];

/// Engage ("like") control.
pub const ENGAGE: &str = "[data-testid=\"like\"]";

/// Present when the post is already engaged.
pub const ALREADY_ENGAGED: &str = "[data-testid=\"unlike\"]";

/// Canonical address of a post by id.
pub fn post_url(post_id: u64) -> String {
    format!("https://x.com/i/web/status/{post_id}")
}

/// Whether an address sits inside the login flow.
pub fn is_login_address(address: &str) -> bool {
    LOGIN_MARKERS.iter().any(|marker| address.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_address_detection() {
        assert!(is_login_address("https://x.com/login"));
        assert!(is_login_address("https://x.com/i/flow/login?redirect=..."));
        assert!(!is_login_address("https://x.com/i/web/status/123"));
    }

    #[test]
    fn test_post_url_shape() {
        assert_eq!(post_url(12345), "https://x.com/i/web/status/12345");
    }
}
