use serde::{Deserialize, Serialize};

/// Which acquisition strategy produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Static,
    Dynamic,
}

/// HTML snapshot handed from an acquirer to the extractor.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
    pub mode: RenderMode,
}

impl RenderedPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>, mode: RenderMode) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLink {
    pub url: String,
    pub filename: String,
}

/// Code fragments and asset links pulled from one page.
///
/// Built once by the extractor; the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    #[serde(rename = "code_blocks")]
    code_fragments: Vec<String>,
    #[serde(rename = "file_links")]
    asset_links: Vec<AssetLink>,
}

impl ScrapeResult {
    pub(crate) fn new(code_fragments: Vec<String>, asset_links: Vec<AssetLink>) -> Self {
        Self {
            code_fragments,
            asset_links,
        }
    }

    pub fn code_fragments(&self) -> &[String] {
        &self.code_fragments
    }

    pub fn asset_links(&self) -> &[AssetLink] {
        &self.asset_links
    }
}

/// A downloaded asset wrapped in a single-entry zip archive.
#[derive(Debug, Clone)]
pub struct ArchivedBytes {
    pub archive_name: String,
    pub entry_name: String,
    pub bytes: Vec<u8>,
}

impl ArchivedBytes {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
