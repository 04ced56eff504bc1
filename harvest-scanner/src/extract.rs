use crate::error::{Result, ScrapeError};
use crate::result::{AssetLink, RenderedPage, ScrapeResult};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

/// Link targets counted as downloadable assets.
pub const ASSET_EXTENSIONS: [&str; 3] = [".js", ".css", ".html"];

/// Turns a rendered page into code fragments and asset links.
///
/// The two rules run independently. A rule that fails is logged and counts
/// as empty; only a page where both come back empty is an error.
#[derive(Debug, Clone)]
pub struct Extractor {
    code_selector: String,
    link_selector: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            code_selector: "pre".to_string(),
            link_selector: "a[href]".to_string(),
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code_selector(mut self, selector: impl Into<String>) -> Self {
        self.code_selector = selector.into();
        self
    }

    pub fn with_link_selector(mut self, selector: impl Into<String>) -> Self {
        self.link_selector = selector.into();
        self
    }

    pub fn extract(&self, page: &RenderedPage, base_url: &str) -> Result<ScrapeResult> {
        let document = Html::parse_document(&page.html);

        let code_fragments = self
            .code_fragments(&document)
            .unwrap_or_else(|e| {
                warn!("Code block extraction failed for {}: {}", base_url, e);
                Vec::new()
            });

        let asset_links = self
            .asset_links(&document, base_url)
            .unwrap_or_else(|e| {
                warn!("Asset link extraction failed for {}: {}", base_url, e);
                Vec::new()
            });

        if code_fragments.is_empty() && asset_links.is_empty() {
            return Err(ScrapeError::NoContentFound(base_url.to_string()));
        }

        info!(
            "Extracted {} code blocks and {} asset links from {}",
            code_fragments.len(),
            asset_links.len(),
            base_url
        );

        Ok(ScrapeResult::new(code_fragments, asset_links))
    }

    fn code_fragments(&self, document: &Html) -> Result<Vec<String>> {
        let selector = parse_selector(&self.code_selector)?;

        let fragments = document
            .select(&selector)
            .map(|element| element.text().collect::<String>())
            .filter(|text| !text.trim().is_empty())
            .collect();

        Ok(fragments)
    }

    fn asset_links(&self, document: &Html, base_url: &str) -> Result<Vec<AssetLink>> {
        let selector = parse_selector(&self.link_selector)?;
        let base = Url::parse(base_url)
            .map_err(|e| ScrapeError::InvalidInput(format!("Invalid base URL: {}", e)))?;

        let mut links = Vec::new();
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if !is_asset_target(href) {
                continue;
            }

            match base.join(href) {
                Ok(absolute) => {
                    debug!("Found asset link: {} -> {}", href, absolute);
                    links.push(AssetLink {
                        url: absolute.to_string(),
                        filename: filename_of(href).to_string(),
                    });
                }
                Err(e) => debug!("Skipping unresolvable link {}: {}", href, e),
            }
        }

        Ok(links)
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::InvalidInput(format!("Invalid selector '{}': {}", selector, e)))
}

fn is_asset_target(href: &str) -> bool {
    ASSET_EXTENSIONS.iter().any(|ext| href.ends_with(ext))
}

/// Last `/`-delimited segment of the link as written in the page.
pub fn filename_of(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}
