//! Native browser session management using `chromiumoxide`.
//!
//! This module is the single source of truth for:
//! * Finding a usable browser executable (Brave → Chrome → Chromium, cross-platform).
//! * Launching the one browser session a run owns, and closing it.
//! * Navigation and DOM-inspection primitives with bounded timeouts.
//!
//! The rest of the crate treats this as an opaque page driver: it never sees
//! `chromiumoxide` errors directly, only `NavError`.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, Element, Page};
use futures::StreamExt;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound on a single navigation, matching a browser's own
/// domcontentloaded-style wait.
pub const NAV_TIMEOUT_MS: u64 = 15_000;

const POLL_INTERVAL_MS: u64 = 250;

/// Failure of a single driver interaction. `Timeout` is the transient case
/// callers retry or fall back on; everything else is opaque.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("timed out after {0}ms")]
    Timeout(u64),
    #[error("{0}")]
    Driver(String),
}

impl From<CdpError> for NavError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Timeout => NavError::Timeout(NAV_TIMEOUT_MS),
            other => NavError::Driver(other.to_string()),
        }
    }
}

/// Find a usable Chromium-family browser executable.
///
/// Resolution order:
/// 1. `CHROME_EXECUTABLE` env var (explicit override)
/// 2. PATH scan – finds package-manager installs on all platforms.
/// 3. OS-specific well-known install paths.
pub fn find_chrome_executable() -> Option<String> {
    if let Ok(p) = std::env::var("CHROME_EXECUTABLE") {
        if Path::new(&p).exists() {
            return Some(p);
        }
    }

    if let Ok(path_var) = std::env::var("PATH") {
        let candidates = [
            "brave-browser",
            "brave",
            "google-chrome",
            "chromium",
            "chromium-browser",
            "chrome",
        ];
        for dir in std::env::split_paths(&path_var) {
            for exe in candidates {
                let full = dir.join(exe);
                if full.exists() {
                    return Some(full.to_string_lossy().to_string());
                }
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        let candidates = [
            "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let candidates = [
            "/usr/bin/brave-browser",
            "/usr/bin/brave",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome",
            "/usr/local/bin/chromium",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        let candidates = [
            r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    None
}

fn build_browser_config(exe: &str, headless: bool) -> Result<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .chrome_executable(exe)
        .viewport(Viewport {
            width: 1280,
            height: 900,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .window_size(1280, 900)
        .arg("--disable-gpu")
        .arg("--no-sandbox") // often required in CI / restricted environments
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio")
        // Suppress the navigator.webdriver automation fingerprint. This is
        // browser hygiene, not captcha evasion: a detected challenge still
        // aborts the operation.
        .arg("--disable-blink-features=AutomationControlled");

    if !headless {
        builder = builder.with_head();
    }

    builder
        .build()
        .map_err(|e| anyhow!("Failed to build browser config: {}", e))
}

/// The single browser session a run owns: one browser process, one page
/// reused across the search phase and every article fetch.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(headless: bool) -> Result<Self> {
        let exe = find_chrome_executable().ok_or_else(|| {
            anyhow!(
                "No browser found. Install Brave, Chrome, or Chromium, or set CHROME_EXECUTABLE."
            )
        })?;

        info!("Launching browser session ({})", exe);
        let config = build_browser_config(&exe, headless)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser ({}): {}", exe, e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("CDP handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow!("Failed to open page: {}", e))?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser process. Best effort; a close error must never
    /// shadow the run's own result.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close error (non-fatal): {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Browser wait error (non-fatal): {}", e);
        }
        self.handler_task.abort();
        info!("Browser session closed");
    }
}

/// Navigate and wait for initial DOM construction, bounded by
/// [`NAV_TIMEOUT_MS`].
pub async fn navigate(page: &Page, url: &str) -> Result<(), NavError> {
    match tokio::time::timeout(Duration::from_millis(NAV_TIMEOUT_MS), page.goto(url)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(NavError::from(e)),
        Err(_) => Err(NavError::Timeout(NAV_TIMEOUT_MS)),
    }
}

/// Poll for `selector` until at least one element matches or `timeout_ms`
/// elapses. Same 250ms-poll approach the search page needs for results that
/// render shortly after domcontentloaded.
pub async fn wait_for_elements(
    page: &Page,
    selector: &str,
    timeout_ms: u64,
) -> Result<Vec<Element>, NavError> {
    let start = std::time::Instant::now();
    loop {
        match page.find_elements(selector).await {
            Ok(els) if !els.is_empty() => return Ok(els),
            Ok(_) => {}
            // A transient query failure is indistinguishable from "not
            // rendered yet"; keep polling until the deadline.
            Err(e) => warn!("wait_for_elements: query '{}' failed: {}", selector, e),
        }
        if start.elapsed().as_millis() as u64 >= timeout_ms {
            return Err(NavError::Timeout(timeout_ms));
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Visible text of the current page body. Empty string when the document has
/// no body yet.
pub async fn body_text(page: &Page) -> Result<String, NavError> {
    let result = page
        .evaluate("document.body ? document.body.innerText : ''")
        .await?;
    result
        .into_value::<String>()
        .map_err(|e| NavError::Driver(e.to_string()))
}

/// Full rendered markup of the current page.
pub async fn page_content(page: &Page) -> Result<String, NavError> {
    page.content().await.map_err(NavError::from)
}
