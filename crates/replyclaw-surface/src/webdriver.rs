//! WebDriver-backed automation surface.
//!
//! Talks W3C WebDriver over HTTP to a local chromedriver — the same plain
//! reqwest + JSON client shape as every other remote API in this workspace.
//! One struct instance is one browser session.

use async_trait::async_trait;
use base64::Engine;
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;

use replyclaw_core::config::SurfaceConfig;
use replyclaw_core::{ReplyClawError, Result};

use crate::auth::{AuthSnapshot, SessionCookie, StorageEntry};
use crate::lookup::{Control, Lookup};
use crate::surface::Surface;

/// W3C element identifier key in find-element responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Poll step for bounded control lookups.
const LOOKUP_POLL: Duration = Duration::from_millis(250);
/// Page-load ceiling handed to the driver.
const PAGE_LOAD_TIMEOUT_MS: u64 = 30_000;

/// Ctrl modifier in the driver's key encoding; sending it again in the same
/// keystream toggles it off, and the driver releases leftovers at call end.
const CTRL_KEY: char = '\u{e009}';
/// Delete key in the driver's key encoding.
const DELETE_KEY: char = '\u{e017}';

/// One live WebDriver browser session.
pub struct WebDriverSurface {
    client: reqwest::Client,
    base: String,
    session_id: String,
}

impl WebDriverSurface {
    /// Start a browser session. `headless` off keeps the window visible
    /// (bootstrap and `--visible` test passes).
    pub async fn connect(config: &SurfaceConfig, headless: bool) -> Result<Self> {
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--no-first-run".to_string(),
            format!(
                "--window-size={},{}",
                config.viewport_width, config.viewport_height
            ),
            format!("--user-agent={}", config.user_agent),
        ];
        if headless {
            args.push("--headless=new".to_string());
        }

        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                }
            }
        });

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/session", config.webdriver_url))
            .json(&capabilities)
            .send()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("session create failed: {e}")))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("invalid session response: {e}")))?;
        let session_id = body["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| {
                ReplyClawError::Surface(format!("no session id in driver response: {body}"))
            })?
            .to_string();

        let surface = Self {
            client,
            base: config.webdriver_url.clone(),
            session_id,
        };
        surface
            .command(
                "timeouts",
                json!({ "pageLoad": PAGE_LOAD_TIMEOUT_MS }),
            )
            .await?;
        tracing::info!("🌐 browser session started ({})", surface.session_id);
        Ok(surface)
    }

    fn session_url(&self, path: &str) -> String {
        format!("{}/session/{}/{}", self.base, self.session_id, path)
    }

    /// POST a driver command and return its `value` payload.
    async fn command(&self, path: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.session_url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("{path} failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("{path}: invalid response: {e}")))?;
        if !status.is_success() {
            let reason = body["value"]["message"].as_str().unwrap_or("unknown");
            return Err(ReplyClawError::Surface(format!("{path}: {reason}")));
        }
        Ok(body["value"].clone())
    }

    /// GET a driver endpoint and return its `value` payload.
    async fn query(&self, path: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.session_url(path))
            .send()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("{path} failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("{path}: invalid response: {e}")))?;
        if !status.is_success() {
            let reason = body["value"]["message"].as_str().unwrap_or("unknown");
            return Err(ReplyClawError::Surface(format!("{path}: {reason}")));
        }
        Ok(body["value"].clone())
    }

    /// Run a script in the page and return its result.
    async fn execute(&self, script: &str, args: Value) -> Result<Value> {
        self.command("execute/sync", json!({ "script": script, "args": args }))
            .await
    }

    /// Single find-element attempt. A missing element is not an error.
    async fn try_find(&self, selector: &str) -> Result<Option<Control>> {
        let response = self
            .client
            .post(self.session_url("element"))
            .json(&json!({ "using": "css selector", "value": selector }))
            .send()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("element lookup failed: {e}")))?;
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            ReplyClawError::Surface(format!("element lookup: invalid response: {e}"))
        })?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let reason = body["value"]["message"].as_str().unwrap_or("unknown");
            return Err(ReplyClawError::Surface(format!("element lookup: {reason}")));
        }
        Ok(body["value"][ELEMENT_KEY]
            .as_str()
            .map(|id| Control(id.to_string())))
    }

    /// Send a raw keystream to an input control.
    async fn send_keys(&self, control: &Control, text: &str) -> Result<()> {
        self.command(
            &format!("element/{}/value", control.0),
            json!({ "text": text }),
        )
        .await?;
        Ok(())
    }

    /// Install a captured login session into this browser session. Cookies
    /// can only be set from a page on a matching domain, and storage is
    /// per-origin, so each origin is visited once.
    pub async fn apply_snapshot(&self, snapshot: &AuthSnapshot) -> Result<()> {
        for origin in &snapshot.origins {
            self.navigate(&origin.origin).await?;
            let host = host_of(&origin.origin);
            for cookie in snapshot
                .cookies
                .iter()
                .filter(|c| domain_matches(&c.domain, &host))
            {
                let mut payload = json!({
                    "name": cookie.name,
                    "value": cookie.value,
                    "path": cookie.path,
                    "secure": cookie.secure,
                    "httpOnly": cookie.http_only,
                });
                if !cookie.domain.is_empty() {
                    payload["domain"] = json!(cookie.domain);
                }
                if let Some(expiry) = cookie.expiry {
                    payload["expiry"] = json!(expiry);
                }
                self.command("cookie", json!({ "cookie": payload })).await?;
            }
            for entry in &origin.local_storage {
                self.execute(
                    "window.localStorage.setItem(arguments[0], arguments[1]);",
                    json!([entry.name, entry.value]),
                )
                .await?;
            }
        }
        tracing::info!(
            "🔐 session snapshot applied ({} cookie(s), {} origin(s))",
            snapshot.cookies.len(),
            snapshot.origins.len()
        );
        Ok(())
    }

    /// Read the live session back into a snapshot (bootstrap capture).
    /// Captures the current page's origin storage plus all cookies.
    pub async fn capture_snapshot(&self, origin: &str) -> Result<AuthSnapshot> {
        let cookie_payload = self.query("cookie").await?;
        let cookies: Vec<SessionCookie> = serde_json::from_value(cookie_payload)
            .map_err(|e| ReplyClawError::Surface(format!("unreadable cookie payload: {e}")))?;

        let storage_payload = self
            .execute(
                "const out = [];\
                 for (let i = 0; i < window.localStorage.length; i++) {\
                   const k = window.localStorage.key(i);\
                   out.push({ name: k, value: window.localStorage.getItem(k) });\
                 }\
                 return out;",
                json!([]),
            )
            .await?;
        let local_storage: Vec<StorageEntry> =
            serde_json::from_value(storage_payload).unwrap_or_default();

        Ok(AuthSnapshot {
            cookies,
            origins: vec![crate::auth::OriginState {
                origin: origin.to_string(),
                local_storage,
            }],
        })
    }

    /// End the session. Called exactly once at run end, on every exit path.
    pub async fn close(&self) -> Result<()> {
        self.client
            .delete(format!("{}/session/{}", self.base, self.session_id))
            .send()
            .await
            .map_err(|e| ReplyClawError::Surface(format!("session close failed: {e}")))?;
        tracing::info!("🌐 browser session closed");
        Ok(())
    }
}

#[async_trait]
impl Surface for WebDriverSurface {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.command("url", json!({ "url": url })).await?;
        Ok(())
    }

    async fn address(&self) -> Result<String> {
        let value = self.query("url").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn has_text(&self, needle: &str) -> bool {
        let script =
            "return ((document.body && document.body.innerText) || '').includes(arguments[0]);";
        match self.execute(script, json!([needle])).await {
            Ok(value) => value.as_bool().unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn find_control(&self, selector: &str, timeout: Duration) -> Lookup {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.try_find(selector).await {
                Ok(Some(control)) => return Lookup::Found(control),
                Ok(None) => {}
                Err(e) => return Lookup::Error(e.to_string()),
            }
            if tokio::time::Instant::now() >= deadline {
                return Lookup::NotFound;
            }
            tokio::time::sleep(LOOKUP_POLL).await;
        }
    }

    async fn click(&self, control: &Control) -> Result<()> {
        self.command(&format!("element/{}/click", control.0), json!({}))
            .await?;
        Ok(())
    }

    async fn clear_input(&self, control: &Control) -> Result<()> {
        self.send_keys(control, &format!("{CTRL_KEY}a{CTRL_KEY}")).await?;
        self.send_keys(control, &DELETE_KEY.to_string()).await?;
        Ok(())
    }

    async fn type_unit(&self, control: &Control, unit: char) -> Result<()> {
        self.send_keys(control, &unit.to_string()).await
    }

    async fn capture_diagnostic(&self, path: &Path) -> Result<()> {
        let value = self.query("screenshot").await?;
        let encoded = value.as_str().unwrap_or_default();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| ReplyClawError::Surface(format!("diagnostic decode failed: {e}")))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Host portion of an origin URL.
fn host_of(origin: &str) -> String {
    let stripped = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .unwrap_or(origin);
    stripped
        .split('/')
        .next()
        .unwrap_or(stripped)
        .to_string()
}

/// RFC 6265 domain match: an empty or exact cookie domain matches, and a
/// dotted domain matches the host and its subdomains.
fn domain_matches(cookie_domain: &str, host: &str) -> bool {
    if cookie_domain.is_empty() {
        return true;
    }
    let trimmed = cookie_domain.trim_start_matches('.');
    host == trimmed || host.ends_with(&format!(".{trimmed}"))
}
