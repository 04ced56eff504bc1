use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::debug;

/// Single-shot GET client shared by the static acquirer and the asset
/// retriever. No retries: a failed attempt is returned as-is.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ScrapeError::unexpected("HTTP client setup", e))?;

        Ok(Self {
            client,
            timeout: config.request_timeout,
        })
    }

    /// GET `url`, failing on transport errors and non-2xx statuses.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        debug!(
            "{} answered {} in {:?}",
            url,
            status.as_u16(),
            start.elapsed()
        );

        if status.is_client_error() || status.is_server_error() {
            return Err(ScrapeError::UpstreamHttp {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| self.classify(url, e))
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| self.classify(url, e))?;
        Ok(bytes.to_vec())
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> ScrapeError {
        if err.is_timeout() {
            ScrapeError::Timeout(format!("{} did not respond within {:?}", url, self.timeout))
        } else if err.is_builder() {
            ScrapeError::InvalidInput(format!("cannot request {}: {}", url, err))
        } else if let Some(status) = err.status() {
            ScrapeError::UpstreamHttp {
                status_code: status.as_u16(),
                url: url.to_string(),
            }
        } else {
            ScrapeError::Network(format!("{}: {}", url, describe(&err)))
        }
    }
}

/// reqwest hides the interesting part (DNS, refused, TLS) in the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::{
        matchers::{header_exists, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn fetcher(timeout: Duration) -> HttpFetcher {
        HttpFetcher::new(&ScraperConfig::new().with_request_timeout(timeout)).unwrap()
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = fetcher(Duration::from_secs(5))
            .get_text(&mock_server.uri())
            .await
            .unwrap();
        assert_eq!(body, "ok");

        let requests = mock_server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap();
        assert!(agent.to_str().unwrap().starts_with("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = fetcher(Duration::from_secs(5))
            .get(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        match err {
            ScrapeError::UpstreamHttp { status_code, .. } => assert_eq!(status_code, 404),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let err = fetcher(Duration::from_millis(200))
            .get(&format!("{}/slow", mock_server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        // Nothing listens on port 1.
        let err = fetcher(Duration::from_secs(2))
            .get("http://127.0.0.1:1/")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
