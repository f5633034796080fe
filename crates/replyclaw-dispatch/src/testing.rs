//! Scripted test doubles shared across this crate's tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use replyclaw_core::{ReplyClawError, ReplyStatus, Result};
use replyclaw_surface::{Control, Lookup, Surface};

use crate::run::StatusSink;

/// Everything a test wants to assert about surface usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SurfaceAction {
    Navigate(String),
    Click(String),
    Clear(String),
    Type(char),
    Diagnostic(PathBuf),
}

/// Scripted in-memory surface. Controls and page text are fixed for the
/// whole scenario; every interaction is recorded.
pub(crate) struct FakeSurface {
    controls: Vec<String>,
    page_texts: Vec<String>,
    redirect: Option<String>,
    fail_navigation: bool,
    address: Mutex<String>,
    actions: Mutex<Vec<SurfaceAction>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            controls: Vec::new(),
            page_texts: Vec::new(),
            redirect: None,
            fail_navigation: false,
            address: Mutex::new(String::new()),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Selectors that resolve to Found.
    pub fn with_controls<I>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.controls.extend(selectors.into_iter().map(String::from));
        self
    }

    /// Text present on every page of the scenario.
    pub fn with_page_text(mut self, text: &str) -> Self {
        self.page_texts.push(text.to_string());
        self
    }

    /// Every navigation lands here instead of the requested address.
    pub fn with_redirect(mut self, address: &str) -> Self {
        self.redirect = Some(address.to_string());
        self
    }

    /// Every navigation fails outright.
    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn actions(&self) -> Vec<SurfaceAction> {
        self.actions.lock().unwrap().clone()
    }

    /// The characters typed, in order.
    pub fn typed_text(&self) -> String {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                SurfaceAction::Type(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: SurfaceAction) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl Surface for FakeSurface {
    async fn navigate(&self, url: &str) -> Result<()> {
        if self.fail_navigation {
            return Err(ReplyClawError::Surface("navigation refused".into()));
        }
        self.record(SurfaceAction::Navigate(url.to_string()));
        let landed = self.redirect.clone().unwrap_or_else(|| url.to_string());
        *self.address.lock().unwrap() = landed;
        Ok(())
    }

    async fn address(&self) -> Result<String> {
        Ok(self.address.lock().unwrap().clone())
    }

    async fn has_text(&self, needle: &str) -> bool {
        self.page_texts.iter().any(|t| t.contains(needle))
    }

    async fn find_control(&self, selector: &str, _timeout: Duration) -> Lookup {
        if self.controls.iter().any(|s| s == selector) {
            Lookup::Found(Control(selector.to_string()))
        } else {
            Lookup::NotFound
        }
    }

    async fn click(&self, control: &Control) -> Result<()> {
        self.record(SurfaceAction::Click(control.0.clone()));
        Ok(())
    }

    async fn clear_input(&self, control: &Control) -> Result<()> {
        self.record(SurfaceAction::Clear(control.0.clone()));
        Ok(())
    }

    async fn type_unit(&self, _control: &Control, unit: char) -> Result<()> {
        self.record(SurfaceAction::Type(unit));
        Ok(())
    }

    async fn capture_diagnostic(&self, path: &Path) -> Result<()> {
        self.record(SurfaceAction::Diagnostic(path.to_path_buf()));
        Ok(())
    }
}

/// Status sink that records write-backs, optionally refusing them.
pub(crate) struct RecordingSink {
    pub updates: Mutex<Vec<(String, ReplyStatus)>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn updates(&self) -> Vec<(String, ReplyStatus)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusSink for RecordingSink {
    async fn update_status(&self, id: &str, status: ReplyStatus) -> Result<()> {
        if self.fail {
            return Err(ReplyClawError::Store("update refused".into()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), status));
        Ok(())
    }
}
