use crate::error::{Result, ScrapeError};
use url::Url;

/// True when `candidate` is an absolute URL with both a scheme and a host.
pub fn validate(candidate: &str) -> bool {
    require_valid_url(candidate).is_ok()
}

/// Parse `candidate`, rejecting anything without a scheme and host.
///
/// Never touches the network.
pub fn require_valid_url(candidate: &str) -> Result<Url> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidInput("No URL provided".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ScrapeError::InvalidInput(format!("Invalid URL '{}': {}", trimmed, e)))?;

    if url.scheme().is_empty() {
        return Err(ScrapeError::InvalidInput(format!(
            "URL '{}' has no scheme",
            trimmed
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ScrapeError::InvalidInput(format!(
            "URL '{}' has no host",
            trimmed
        ))),
    }
}
