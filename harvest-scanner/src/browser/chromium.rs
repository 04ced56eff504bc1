//! Chromium sessions driven over CDP with chromiumoxide.

use super::{BrowserLauncher, BrowserSession};
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::wait::poll_until;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Launches one headless Chromium process per session, each with its own
/// throwaway profile directory.
pub struct ChromiumLauncher {
    config: ScraperConfig,
}

impl ChromiumLauncher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn browser_config(&self, profile: &TempDir) -> Result<BrowserConfig> {
        let (width, height) = self.config.viewport;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            })
            .user_data_dir(profile.path())
            .request_timeout(self.config.navigation_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run");

        if let Some(path) = self.config.resolve_chrome_executable() {
            debug!("Using browser binary {}", path.display());
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ScrapeError::unexpected("browser configuration", e))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let profile = tempfile::Builder::new()
            .prefix("harvest-browser-")
            .tempdir()
            .map_err(|e| ScrapeError::unexpected("browser profile setup", e))?;

        let config = self.browser_config(&profile)?;

        info!("Launching headless browser");
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::unexpected("browser launch", e))?;

        let event_loop = AbortOnDrop(tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        }));

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after page setup error: {}", close_err);
                }
                return Err(ScrapeError::unexpected("browser page setup", e));
            }
        };

        if let Err(e) = page
            .execute(SetUserAgentOverrideParams::new(self.config.user_agent.clone()))
            .await
        {
            warn!("Could not override browser user agent: {}", e);
        }

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            poll_interval: self.config.poll_interval,
            event_loop,
            profile,
        }))
    }
}

/// Aborts the CDP event loop if the session is dropped without `close`.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// One browser process, one tab.
///
/// Dropping the session (for example when the request future is cancelled)
/// stops the event loop, lets chromiumoxide kill the child process, and
/// removes the profile directory.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    poll_interval: Duration,
    event_loop: AbortOnDrop,
    profile: TempDir,
}

fn cdp_error(action: &str, err: CdpError) -> ScrapeError {
    match err {
        CdpError::Timeout => ScrapeError::Timeout(format!("browser timed out while trying to {}", action)),
        other => ScrapeError::Network(format!("failed to {}: {}", action, other)),
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| cdp_error(&format!("navigate to {}", url), e))?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let page = &self.page;
        let found = poll_until(timeout, self.poll_interval, move || async move {
            page.find_element(selector).await.is_ok()
        })
        .await;
        Ok(found)
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| cdp_error(&format!("find {}", selector), e))?;
        element
            .click()
            .await
            .map_err(|e| cdp_error(&format!("focus {}", selector), e))?;
        element
            .type_str(text)
            .await
            .map_err(|e| cdp_error(&format!("type into {}", selector), e))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| cdp_error(&format!("find {}", selector), e))?
            .click()
            .await
            .map_err(|e| cdp_error(&format!("click {}", selector), e))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| cdp_error("read the page URL", e))?;
        Ok(url.unwrap_or_default())
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| cdp_error("read the rendered DOM", e))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            page,
            event_loop,
            profile,
            ..
        } = *self;

        let mut failures = Vec::new();

        if let Err(e) = page.close().await {
            failures.push(format!("page: {}", e));
        }
        if let Err(e) = browser.close().await {
            failures.push(format!("browser: {}", e));
        }
        if let Err(e) = browser.wait().await {
            failures.push(format!("browser process: {}", e));
        }
        drop(event_loop);
        if let Err(e) = profile.close() {
            failures.push(format!("profile directory: {}", e));
        }

        if failures.is_empty() {
            debug!("Browser session closed");
            Ok(())
        } else {
            Err(ScrapeError::Unexpected(format!(
                "browser teardown incomplete ({})",
                failures.join("; ")
            )))
        }
    }
}
