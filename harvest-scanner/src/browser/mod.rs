//! Browser session abstraction for dynamic acquisition.
//!
//! A [`BrowserLauncher`] hands out one [`BrowserSession`] per request. The
//! session owns everything it needs (process, profile directory, event loop)
//! and is torn down with [`BrowserSession::close`], or by drop if the request
//! is cancelled.

pub mod chromium;
#[cfg(test)]
pub(crate) mod fake;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub use chromium::{ChromiumLauncher, ChromiumSession};

/// Starts isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A single isolated browser session.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` and wait for the navigation to settle.
    async fn navigate(&self, url: &str) -> Result<()>;
    /// Poll for `selector` until it matches or `timeout` elapses.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool>;
    /// Focus the first element matching `selector` and type `text` into it.
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;
    async fn click(&self, selector: &str) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    /// Serialized post-render DOM.
    async fn content(&self) -> Result<String>;
    async fn close(self: Box<Self>) -> Result<()>;
}
