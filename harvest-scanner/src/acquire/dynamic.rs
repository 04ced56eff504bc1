use super::PageAcquirer;
use crate::auth::Authenticator;
use crate::browser::{BrowserLauncher, BrowserSession};
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::request::Credentials;
use crate::result::{RenderMode, RenderedPage};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Renders a page in a fresh browser session, logging in first when
/// credentials are given.
pub struct BrowserAcquirer {
    launcher: Arc<dyn BrowserLauncher>,
    authenticator: Authenticator,
    login_url: Option<String>,
    ready_selector: String,
    navigation_timeout: Duration,
    content_wait: Duration,
}

impl BrowserAcquirer {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: &ScraperConfig) -> Self {
        Self {
            launcher,
            authenticator: Authenticator::new(config),
            login_url: config.login.url.clone(),
            ready_selector: config.ready_selector.clone(),
            navigation_timeout: config.navigation_timeout,
            content_wait: config.content_wait,
        }
    }

    async fn navigate(&self, session: &dyn BrowserSession, url: &str) -> Result<()> {
        match tokio::time::timeout(self.navigation_timeout, session.navigate(url)).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout(format!(
                "navigation to {} exceeded {:?}",
                url, self.navigation_timeout
            ))),
        }
    }

    async fn render(
        &self,
        session: &dyn BrowserSession,
        url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<RenderedPage> {
        if let Some(credentials) = credentials {
            let login_url = self.login_url.as_deref().unwrap_or(url);
            info!("Logging in at {}", login_url);
            self.navigate(session, login_url).await?;

            if !self
                .authenticator
                .login(session, &credentials.username, &credentials.password)
                .await
            {
                return Err(ScrapeError::AuthenticationFailed(format!(
                    "login as {} at {} was not accepted",
                    credentials.username, login_url
                )));
            }
        }

        info!("Rendering {} (dynamic)", url);
        self.navigate(session, url).await?;

        let ready = session
            .wait_for(&self.ready_selector, self.content_wait)
            .await?;
        if !ready {
            return Err(ScrapeError::ContentNotFound(format!(
                "no '{}' element appeared on {} within {:?}",
                self.ready_selector, url, self.content_wait
            )));
        }

        let html = session.content().await?;
        debug!("Captured {} bytes of rendered DOM", html.len());
        Ok(RenderedPage::new(url, html, RenderMode::Dynamic))
    }
}

#[async_trait]
impl PageAcquirer for BrowserAcquirer {
    async fn acquire(&self, url: &str, credentials: Option<&Credentials>) -> Result<RenderedPage> {
        let session = self.launcher.launch().await?;

        let outcome = self.render(session.as_ref(), url, credentials).await;

        // The session goes away on every path; a teardown failure must not
        // replace the render outcome.
        if let Err(e) = session.close().await {
            warn!("Browser session teardown failed: {}", e);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::*;
    use crate::error::ErrorKind;

    fn config() -> ScraperConfig {
        ScraperConfig::default()
            .with_login_url(LOGIN_URL)
            .with_login_wait(Duration::from_millis(200))
            .with_content_wait(Duration::from_millis(200))
            .with_poll_interval(Duration::from_millis(20))
    }

    fn acquirer(launcher: FakeLauncher) -> (BrowserAcquirer, Counters) {
        let counters = launcher.counters.clone();
        (BrowserAcquirer::new(Arc::new(launcher), &config()), counters)
    }

    #[tokio::test]
    async fn test_renders_without_login() {
        let (acquirer, counters) = acquirer(FakeLauncher::new("pw", "<pre>const a = 1;</pre>"));

        let page = acquirer
            .acquire("https://app.example.com/project", None)
            .await
            .unwrap();

        assert_eq!(page.mode, RenderMode::Dynamic);
        assert!(page.html.contains("const a = 1;"));
        assert_eq!(counters.launched.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(counters.live(), 0);
    }

    #[tokio::test]
    async fn test_login_then_render() {
        let (acquirer, counters) = acquirer(FakeLauncher::new("pw", "<pre>secret code</pre>"));
        let creds = Credentials::new("dev@example.com", "pw");

        let page = acquirer
            .acquire("https://app.example.com/project", Some(&creds))
            .await
            .unwrap();

        assert!(page.html.contains("secret code"));
        assert_eq!(counters.live(), 0);
    }

    #[tokio::test]
    async fn test_wrong_password_fails_and_tears_down() {
        let (acquirer, counters) = acquirer(FakeLauncher::new("pw", "<pre>secret code</pre>"));
        let creds = Credentials::new("dev@example.com", "nope");

        let err = acquirer
            .acquire("https://app.example.com/project", Some(&creds))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(counters.closed.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(counters.live(), 0);
    }

    #[tokio::test]
    async fn test_missing_marker_is_content_not_found() {
        let (acquirer, counters) = acquirer(FakeLauncher::new("pw", "<p>still loading</p>"));

        let err = acquirer
            .acquire("https://app.example.com/project", None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ContentNotFound);
        assert_eq!(counters.live(), 0);
    }

    #[tokio::test]
    async fn test_stalled_navigation_times_out_and_tears_down() {
        let mut launcher = FakeLauncher::new("pw", "<pre>ok</pre>");
        launcher.hang_navigation = true;
        let counters = launcher.counters.clone();
        let acquirer = BrowserAcquirer::new(
            Arc::new(launcher),
            &config().with_navigation_timeout(Duration::from_millis(100)),
        );

        let err = acquirer
            .acquire("https://app.example.com/project", None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(counters.closed.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(counters.live(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_acquire_drops_session() {
        let mut launcher = FakeLauncher::new("pw", "<pre>ok</pre>");
        launcher.hang_wait = true;
        let (acquirer, counters) = acquirer(launcher);

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            acquirer.acquire("https://app.example.com/project", None),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(counters.launched.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(counters.dropped.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_teardown_failure_does_not_mask_result() {
        let mut launcher = FakeLauncher::new("pw", "<pre>ok</pre>");
        launcher.fail_close = true;
        let (acquirer, counters) = acquirer(launcher);

        let page = acquirer
            .acquire("https://app.example.com/project", None)
            .await
            .unwrap();

        assert!(page.html.contains("ok"));
        assert_eq!(counters.live(), 0);
    }

    #[tokio::test]
    async fn test_teardown_failure_does_not_mask_error() {
        let mut launcher = FakeLauncher::new("pw", "<pre>ok</pre>");
        launcher.fail_close = true;
        let (acquirer, _counters) = acquirer(launcher);
        let creds = Credentials::new("dev@example.com", "nope");

        let err = acquirer
            .acquire("https://app.example.com/project", Some(&creds))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }
}
