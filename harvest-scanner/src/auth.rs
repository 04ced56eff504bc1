use crate::browser::BrowserSession;
use crate::config::{LoginForm, ScraperConfig};
use crate::wait::poll_until;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives a login form in an open browser session.
///
/// One attempt per call. Every failure is reported as `false`; the acquirer
/// decides what that means for the request.
#[derive(Debug, Clone)]
pub struct Authenticator {
    form: LoginForm,
    field_wait: Duration,
    redirect_wait: Duration,
    poll_interval: Duration,
}

impl Authenticator {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            form: config.login.clone(),
            field_wait: config.login_wait,
            redirect_wait: config.login_wait,
            poll_interval: config.poll_interval,
        }
    }

    /// Log in on the page the session is currently showing.
    pub async fn login(&self, session: &dyn BrowserSession, username: &str, password: &str) -> bool {
        let login_page = match session.current_url().await {
            Ok(url) => url,
            Err(e) => {
                warn!("Login aborted, could not read the login page URL: {}", e);
                return false;
            }
        };

        match session
            .wait_for(&self.form.username_selector, self.field_wait)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    "Login field '{}' did not appear within {:?}",
                    self.form.username_selector, self.field_wait
                );
                return false;
            }
            Err(e) => {
                warn!("Login aborted while waiting for the username field: {}", e);
                return false;
            }
        }

        if let Err(e) = session.fill(&self.form.username_selector, username).await {
            warn!("Could not enter username: {}", e);
            return false;
        }
        if let Err(e) = session.fill(&self.form.password_selector, password).await {
            warn!("Could not enter password: {}", e);
            return false;
        }
        if let Err(e) = session.click(&self.form.submit_selector).await {
            warn!("Could not submit login form: {}", e);
            return false;
        }
        debug!("Login form submitted from {}", login_page);

        let start: &str = &login_page;
        let left_login_page = poll_until(self.redirect_wait, self.poll_interval, move || async move {
            match session.current_url().await {
                Ok(url) => url != start,
                Err(_) => false,
            }
        })
        .await;

        if left_login_page {
            info!("Login succeeded");
        } else {
            warn!(
                "Still on {} after {:?}, treating login as rejected",
                login_page, self.redirect_wait
            );
        }
        left_login_page
    }
}
