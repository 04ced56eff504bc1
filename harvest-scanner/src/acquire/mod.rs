//! Page acquisition strategies.

pub mod dynamic;
pub mod static_page;

use crate::error::{Result, ScrapeError};
use crate::request::Credentials;
use crate::result::RenderedPage;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use dynamic::BrowserAcquirer;
pub use static_page::StaticAcquirer;

/// Produces the HTML snapshot of a single page.
#[async_trait]
pub trait PageAcquirer: Send + Sync {
    async fn acquire(&self, url: &str, credentials: Option<&Credentials>) -> Result<RenderedPage>;
}

/// How a request picks its acquisition strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireMode {
    /// Browser when credentials are supplied, plain HTTP otherwise.
    #[default]
    Auto,
    Static,
    Dynamic,
}

/// The strategy actually used for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Static,
    Dynamic,
}

impl AcquireMode {
    pub fn resolve(self, has_credentials: bool) -> Strategy {
        match self {
            AcquireMode::Static => Strategy::Static,
            AcquireMode::Dynamic => Strategy::Dynamic,
            AcquireMode::Auto if has_credentials => Strategy::Dynamic,
            AcquireMode::Auto => Strategy::Static,
        }
    }
}

impl FromStr for AcquireMode {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(AcquireMode::Auto),
            "static" => Ok(AcquireMode::Static),
            "dynamic" | "browser" => Ok(AcquireMode::Dynamic),
            other => Err(ScrapeError::InvalidInput(format!(
                "Unknown acquisition mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for AcquireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquireMode::Auto => "auto",
            AcquireMode::Static => "static",
            AcquireMode::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}
