use super::PageAcquirer;
use crate::error::Result;
use crate::http::HttpFetcher;
use crate::request::Credentials;
use crate::result::{RenderMode, RenderedPage};
use async_trait::async_trait;
use tracing::{info, warn};

/// Plain HTTP GET, no script execution.
#[derive(Clone)]
pub struct StaticAcquirer {
    fetcher: HttpFetcher,
}

impl StaticAcquirer {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl PageAcquirer for StaticAcquirer {
    async fn acquire(&self, url: &str, credentials: Option<&Credentials>) -> Result<RenderedPage> {
        if credentials.is_some() {
            warn!("Static mode cannot log in, ignoring credentials for {}", url);
        }

        info!("Fetching {} (static)", url);
        let html = self.fetcher.get_text(url).await?;
        Ok(RenderedPage::new(url, html, RenderMode::Static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::error::ErrorKind;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn acquirer(timeout: Duration) -> StaticAcquirer {
        let config = ScraperConfig::new().with_request_timeout(timeout);
        StaticAcquirer::new(HttpFetcher::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_returns_raw_body() {
        let mock_server = MockServer::start().await;
        let html = "<html><body><pre>print('hi')</pre><script>document.write('x')</script></body></html>";

        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(html),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/page", mock_server.uri());
        let page = acquirer(Duration::from_secs(5))
            .acquire(&url, None)
            .await
            .unwrap();

        assert_eq!(page.html, html);
        assert_eq!(page.url, url);
        assert_eq!(page.mode, RenderMode::Static);
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = acquirer(Duration::from_secs(5))
            .acquire(&mock_server.uri(), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamHttp);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<pre>late</pre>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let err = acquirer(Duration::from_millis(200))
            .acquire(&mock_server.uri(), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
