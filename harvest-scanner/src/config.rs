use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Environment variable consulted for the browser binary when none is configured.
pub const CHROME_BIN_ENV: &str = "CHROME_BIN";

/// Selectors driving the login form.
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Page holding the form. Defaults to the scrape target.
    pub url: Option<String>,
    pub username_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            url: None,
            username_selector:
                r#"input[type="email"], input[name="email"], input[name="username"]"#.to_string(),
            password_selector: r#"input[type="password"]"#.to_string(),
            submit_selector: r#"button[type="submit"], input[type="submit"]"#.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub request_timeout: Duration,
    pub navigation_timeout: Duration,
    pub content_wait: Duration,
    pub login_wait: Duration,
    pub poll_interval: Duration,
    pub viewport: (u32, u32),
    /// Element whose presence marks a dynamic page as rendered.
    pub ready_selector: String,
    pub chrome_executable: Option<PathBuf>,
    pub login: LoginForm,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(10),
            navigation_timeout: Duration::from_secs(30),
            content_wait: Duration::from_secs(10),
            login_wait: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            viewport: (1920, 1080),
            ready_selector: "pre".to_string(),
            chrome_executable: None,
            login: LoginForm::default(),
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_content_wait(mut self, wait: Duration) -> Self {
        self.content_wait = wait;
        self
    }

    pub fn with_login_wait(mut self, wait: Duration) -> Self {
        self.login_wait = wait;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn with_ready_selector(mut self, selector: impl Into<String>) -> Self {
        self.ready_selector = selector.into();
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login.url = Some(url.into());
        self
    }

    pub fn with_login_form(mut self, form: LoginForm) -> Self {
        self.login = form;
        self
    }

    /// Configured browser binary, else `$CHROME_BIN`, else `None` to let the
    /// launcher auto-detect one.
    pub fn resolve_chrome_executable(&self) -> Option<PathBuf> {
        self.chrome_executable.clone().or_else(|| {
            std::env::var_os(CHROME_BIN_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }
}
