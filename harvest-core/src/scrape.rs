use harvest_scanner::{
    require_valid_url, AcquireMode, ArchivedBytes, AssetRetriever, BrowserAcquirer,
    BrowserLauncher, ChromiumLauncher, DownloadRequest, Extractor, HttpFetcher, PageAcquirer,
    Result, ScrapeError, ScrapeRequest, ScrapeResult, ScraperConfig, StaticAcquirer, Strategy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, Instrument, Span};

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Entry point for callers: validates requests, picks the acquisition
/// strategy, and runs extraction or packaging.
///
/// Holds no per-request state, so one instance can serve concurrent
/// requests behind an `Arc`.
pub struct Harvester {
    config: ScraperConfig,
    mode: AcquireMode,
    static_acquirer: StaticAcquirer,
    browser_acquirer: BrowserAcquirer,
    extractor: Extractor,
    retriever: AssetRetriever,
    span: Span,
    progress_callback: Option<ScrapeProgressCallback>,
}

impl Harvester {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let launcher: Arc<dyn BrowserLauncher> = Arc::new(ChromiumLauncher::new(&config));
        let fetcher = HttpFetcher::new(&config)?;

        Ok(Self {
            mode: AcquireMode::Auto,
            static_acquirer: StaticAcquirer::new(fetcher.clone()),
            browser_acquirer: BrowserAcquirer::new(launcher, &config),
            extractor: Extractor::new(),
            retriever: AssetRetriever::new(fetcher),
            span: Span::none(),
            progress_callback: None,
            config,
        })
    }

    pub fn with_mode(mut self, mode: AcquireMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the browser used for dynamic acquisition.
    pub fn with_launcher(mut self, launcher: Arc<dyn BrowserLauncher>) -> Self {
        self.browser_acquirer = BrowserAcquirer::new(launcher, &self.config);
        self
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Parent span for every request this harvester runs.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_progress_callback(mut self, callback: ScrapeProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report(&self, message: impl Into<String>) {
        if let Some(ref callback) = self.progress_callback {
            callback(message.into());
        }
    }

    fn acquirer(&self, strategy: Strategy) -> &dyn PageAcquirer {
        match strategy {
            Strategy::Static => &self.static_acquirer,
            Strategy::Dynamic => &self.browser_acquirer,
        }
    }

    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult> {
        let span = info_span!(parent: &self.span, "scrape", url = %request.target_url.trim());

        async {
            let url = require_valid_url(&request.target_url)?;
            if let Some(ref credentials) = request.credentials {
                credentials.validate()?;
            }

            let strategy = self.mode.resolve(request.credentials.is_some());
            info!("Scraping {} using {:?} acquisition", url, strategy);
            self.report(match strategy {
                Strategy::Static => format!("Fetching {}", url),
                Strategy::Dynamic => format!("Rendering {} in a headless browser", url),
            });

            let page = self
                .acquirer(strategy)
                .acquire(url.as_str(), request.credentials.as_ref())
                .await?;

            self.report("Extracting code blocks and asset links");
            self.extractor.extract(&page, url.as_str())
        }
        .instrument(span)
        .await
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<ArchivedBytes> {
        let span = info_span!(parent: &self.span, "download", url = %request.url.trim());

        async {
            let url = require_valid_url(&request.url)?;
            if request.filename.trim().is_empty() {
                return Err(ScrapeError::InvalidInput("Missing filename".to_string()));
            }

            self.report(format!("Downloading {}", request.filename));
            let archive = self.retriever.retrieve(url.as_str(), &request.filename).await?;
            info!("Packaged {} ({} bytes)", archive.archive_name, archive.len());
            Ok(archive)
        }
        .instrument(span)
        .await
    }
}

/// Options for a one-shot scrape from a shell
pub struct ScrapeOptions {
    pub request: ScrapeRequest,
    pub mode: AcquireMode,
    pub config: ScraperConfig,
    pub show_progress_bars: bool,
}

/// Options for a one-shot download from a shell
pub struct DownloadOptions {
    pub request: DownloadRequest,
    pub config: ScraperConfig,
    pub show_progress_bars: bool,
}

fn spinner(show: bool, message: &str) -> Option<Arc<ProgressBar>> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Some(Arc::new(pb))
}

fn spinner_callback(pb: &Option<Arc<ProgressBar>>) -> ScrapeProgressCallback {
    match pb {
        Some(pb) => {
            let pb = pb.clone();
            Arc::new(move |message: String| pb.set_message(message))
        }
        None => Arc::new(|_message: String| {}),
    }
}

/// Execute a scrape with the given options
pub async fn execute_scrape(
    options: ScrapeOptions,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ScrapeResult> {
    let ScrapeOptions {
        request,
        mode,
        config,
        show_progress_bars,
    } = options;

    let progress_bar = spinner(show_progress_bars, "Starting scrape...");
    let callback = progress_callback.unwrap_or_else(|| spinner_callback(&progress_bar));

    let harvester = Harvester::new(config)?
        .with_mode(mode)
        .with_progress_callback(callback);

    let outcome = harvester.scrape(&request).await;

    if let Some(ref pb) = progress_bar {
        match outcome {
            Ok(ref result) => pb.finish_with_message(format!(
                "Scrape complete! {} code blocks, {} asset links",
                result.code_fragments().len(),
                result.asset_links().len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}

/// Execute a download with the given options
pub async fn execute_download(
    options: DownloadOptions,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ArchivedBytes> {
    let DownloadOptions {
        request,
        config,
        show_progress_bars,
    } = options;

    let progress_bar = spinner(show_progress_bars, "Starting download...");
    let callback = progress_callback.unwrap_or_else(|| spinner_callback(&progress_bar));

    let harvester = Harvester::new(config)?.with_progress_callback(callback);
    let outcome = harvester.download(&request).await;

    if let Some(ref pb) = progress_bar {
        match outcome {
            Ok(ref archive) => pb.finish_with_message(format!(
                "Download complete! {} ({} bytes)",
                archive.archive_name,
                archive.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}
