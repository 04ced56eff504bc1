//! Scripted in-memory session used by the auth and acquirer tests.

use crate::browser::{BrowserLauncher, BrowserSession};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LOGIN_URL: &str = "https://app.example.com/login";
pub const DASHBOARD_URL: &str = "https://app.example.com/dashboard";

#[derive(Clone, Default)]
pub struct Counters {
    pub launched: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicUsize>,
}

impl Counters {
    pub fn live(&self) -> usize {
        self.launched.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakeLauncher {
    pub password: String,
    pub html: String,
    pub fail_close: bool,
    pub hang_navigation: bool,
    pub hang_wait: bool,
    pub counters: Counters,
}

impl FakeLauncher {
    pub fn new(password: &str, html: &str) -> Self {
        Self {
            password: password.to_string(),
            html: html.to_string(),
            fail_close: false,
            hang_navigation: false,
            hang_wait: false,
            counters: Counters::default(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.counters.launched.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            password: self.password.clone(),
            html: self.html.clone(),
            fail_close: self.fail_close,
            hang_navigation: self.hang_navigation,
            hang_wait: self.hang_wait,
            closed: self.counters.closed.clone(),
            dropped: self.counters.dropped.clone(),
            url: Mutex::new("about:blank".to_string()),
            typed: Mutex::new(Vec::new()),
        }))
    }
}

pub struct FakeSession {
    password: String,
    html: String,
    fail_close: bool,
    hang_navigation: bool,
    hang_wait: bool,
    closed: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
    url: Mutex<String>,
    typed: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        if self.hang_navigation {
            std::future::pending::<()>().await;
        }
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<bool> {
        if self.hang_wait {
            std::future::pending::<()>().await;
        }
        let url = self.url.lock().unwrap().clone();
        if url == LOGIN_URL {
            return Ok(selector.contains("email") || selector.contains("password"));
        }
        Ok(self.html.contains(&format!("<{}", selector)))
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.typed
            .lock()
            .unwrap()
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn click(&self, _selector: &str) -> Result<()> {
        let accepted = self
            .typed
            .lock()
            .unwrap()
            .iter()
            .any(|(selector, text)| selector.contains("password") && *text == self.password);
        if accepted {
            *self.url.lock().unwrap() = DASHBOARD_URL.to_string();
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ScrapeError::Unexpected("browser refused to exit".to_string()));
        }
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}
