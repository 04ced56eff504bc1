pub mod acquire;
pub mod auth;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod request;
pub mod result;
pub mod retrieve;
pub mod validate;
pub mod wait;

pub use acquire::{AcquireMode, BrowserAcquirer, PageAcquirer, StaticAcquirer, Strategy};
pub use auth::Authenticator;
pub use browser::{BrowserLauncher, BrowserSession, ChromiumLauncher};
pub use config::{LoginForm, ScraperConfig};
pub use error::{ErrorKind, Result, ScrapeError};
pub use extract::Extractor;
pub use http::HttpFetcher;
pub use request::{Credentials, DownloadRequest, ScrapeRequest};
pub use result::{ArchivedBytes, AssetLink, RenderMode, RenderedPage, ScrapeResult};
pub use retrieve::AssetRetriever;
pub use validate::{require_valid_url, validate};
