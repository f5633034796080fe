//! One-time credential capture — produces the auth snapshot.
//!
//! Opens a visible browser at the login page, waits for the operator to
//! finish logging in, then persists cookies + storage for every later run.

use std::path::Path;
use std::time::Duration;

use replyclaw_core::config::SurfaceConfig;
use replyclaw_core::Result;

use crate::lookup::Lookup;
use crate::surface::Surface;
use crate::webdriver::WebDriverSurface;

/// Login entry page.
const LOGIN_URL: &str = "https://x.com/login";
/// Origin whose cookies + storage constitute a usable session.
const SESSION_ORIGIN: &str = "https://x.com";
/// Controls that only exist once the timeline is visible.
const LOGGED_IN_MARKERS: &[&str] = &[
    "[data-testid=\"primaryColumn\"]",
    "[aria-label=\"Home timeline\"]",
    "[data-testid=\"AppTabBar_Home_Link\"]",
];
/// How long the operator gets to finish logging in.
const LOGIN_WAIT: Duration = Duration::from_secs(300);
const LOGIN_POLL: Duration = Duration::from_secs(2);

/// Open a visible browser, wait for login, persist the snapshot.
/// Returns false when login was never detected within the window.
pub async fn setup_auth(config: &SurfaceConfig, out_path: &Path) -> Result<bool> {
    let surface = WebDriverSurface::connect(config, false).await?;
    let result = capture_login(&surface, out_path).await;
    let _ = surface.close().await;
    result
}

async fn capture_login(surface: &WebDriverSurface, out_path: &Path) -> Result<bool> {
    surface.navigate(LOGIN_URL).await?;
    println!("👉 Log in to the posting surface in the opened browser window.");
    println!("   The session is captured automatically once the timeline appears (up to 5 minutes).");

    let deadline = tokio::time::Instant::now() + LOGIN_WAIT;
    loop {
        for marker in LOGGED_IN_MARKERS {
            if let Lookup::Found(_) = surface.find_control(marker, Duration::ZERO).await {
                tracing::info!("✅ login detected");
                let snapshot = surface.capture_snapshot(SESSION_ORIGIN).await?;
                snapshot.save(out_path)?;
                println!("✓ auth snapshot saved: {}", out_path.display());
                println!("  later runs no longer need --setup-auth.");
                return Ok(true);
            }
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("⚠️ timed out waiting for login");
            return Ok(false);
        }
        tokio::time::sleep(LOGIN_POLL).await;
    }
}
