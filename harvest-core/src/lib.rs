pub mod report;
pub mod scrape;

use colored::Colorize;

pub use harvest_scanner::{
    AcquireMode, ArchivedBytes, AssetLink, Credentials, DownloadRequest, ErrorKind, ScrapeError,
    ScrapeRequest, ScrapeResult, ScraperConfig,
};
pub use scrape::{
    execute_download, execute_scrape, DownloadOptions, Harvester, ScrapeOptions,
    ScrapeProgressCallback,
};

/// Printed to stderr; stdout carries only reports.
pub fn print_banner() {
    eprintln!(
        "{} {}",
        "harvest".bright_green().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "code blocks and assets from rendered pages".bright_black());
    eprintln!();
}
