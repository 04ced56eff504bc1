use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use harvest_core::report::{generate_report, save_archive, save_report, ReportFormat};
use harvest_core::{
    execute_download, execute_scrape, AcquireMode, Credentials, DownloadOptions, DownloadRequest,
    ErrorKind, ScrapeError, ScrapeOptions, ScrapeRequest, ScraperConfig,
};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Exit status when the user interrupts a request with Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;
/// Exit status for local failures such as an unwritable output path.
pub const EXIT_SOFTWARE: i32 = 70;

/// Map a failure onto a sysexits-style process status.
pub fn exit_code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidInput => 64,
        ErrorKind::ContentNotFound | ErrorKind::NoContentFound => 65,
        ErrorKind::Network | ErrorKind::UpstreamHttp => 69,
        ErrorKind::Timeout => 75,
        ErrorKind::AuthenticationFailed => 77,
        ErrorKind::Packaging | ErrorKind::Unexpected => EXIT_SOFTWARE,
    }
}

/// Default log filter when `RUST_LOG` is unset.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Build a config from the optional command line overrides.
pub fn build_config(
    timeout_secs: Option<u64>,
    login_url: Option<&str>,
    wait_for: Option<&str>,
) -> ScraperConfig {
    let mut config = ScraperConfig::default();

    if let Some(secs) = timeout_secs {
        let timeout = Duration::from_secs(secs);
        config = config
            .with_request_timeout(timeout)
            .with_navigation_timeout(timeout);
    }
    if let Some(url) = login_url {
        config = config.with_login_url(url);
    }
    if let Some(selector) = wait_for {
        config = config.with_ready_selector(selector);
    }

    config
}

/// Credentials are all-or-nothing: a username without a password (or the
/// reverse) is rejected here rather than failing later at the login form.
pub fn build_scrape_request(
    url: &str,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<ScrapeRequest, String> {
    let request = ScrapeRequest::new(url);

    match (username, password) {
        (Some(username), Some(password)) => {
            Ok(request.with_credentials(Credentials::new(username, password)))
        }
        (Some(_), None) => Err("--username needs --password or HARVEST_PASSWORD".to_string()),
        (None, Some(_)) => Err("--password was given without --username".to_string()),
        (None, None) => Ok(request),
    }
}

/// An existing directory given to `-o` gets a file named after the format.
pub fn report_output_path(path: PathBuf, format: ReportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(format!("harvest-report.{}", format.extension()))
    } else {
        path
    }
}

/// Where a report goes: a file when `-o` is set, `stdout` otherwise. Nothing
/// but the report is ever written to `stdout`.
pub fn write_report<W: Write>(
    content: &str,
    output: Option<&Path>,
    stdout: &mut W,
) -> anyhow::Result<Option<PathBuf>> {
    match output {
        Some(path) => {
            save_report(content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => {
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write report to stdout")?;
            Ok(None)
        }
    }
}

fn print_failure(err: &ScrapeError) -> i32 {
    eprintln!(
        "{} {} {}",
        "✗".red().bold(),
        format!("[{}]", err.kind()).bright_black(),
        err
    );
    exit_code_for(err.kind())
}

fn print_local_failure(err: &anyhow::Error) -> i32 {
    eprintln!("{} {:#}", "✗".red().bold(), err);
    EXIT_SOFTWARE
}

/// Run `work` until it finishes or Ctrl-C arrives. On interrupt the request
/// future is dropped, which tears down any browser session and temp files.
async fn interruptible<F: Future>(work: F) -> Option<F::Output> {
    tokio::select! {
        output = work => Some(output),
        _ = tokio::signal::ctrl_c() => None,
    }
}

pub async fn handle_scrape(args: &ArgMatches, quiet: bool) -> i32 {
    let url = args.get_one::<String>("url").map(String::as_str).unwrap_or_default();
    let username = args.get_one::<String>("username").map(String::as_str);
    let password = args.get_one::<String>("password").map(String::as_str);

    let request = match build_scrape_request(url, username, password) {
        Ok(request) => request,
        Err(msg) => return print_failure(&ScrapeError::InvalidInput(msg)),
    };

    let mode = args
        .get_one::<AcquireMode>("mode")
        .copied()
        .unwrap_or_default();

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args
        .get_one::<String>("output")
        .map(|p| report_output_path(expand_path(p), format));

    let config = build_config(
        args.get_one::<u64>("timeout").copied(),
        args.get_one::<String>("login-url").map(String::as_str),
        args.get_one::<String>("wait-for").map(String::as_str),
    );

    debug!(?mode, ?format, ?output, "scrape options resolved");

    let target = request.target_url.trim().to_string();
    if !quiet {
        eprintln!(
            "{} Scraping {} ({} mode)\n",
            "→".blue(),
            target.bright_white(),
            mode
        );
    }

    let options = ScrapeOptions {
        request,
        mode,
        config,
        show_progress_bars: !quiet,
    };

    let result = match interruptible(execute_scrape(options, None)).await {
        Some(Ok(result)) => result,
        Some(Err(e)) => return print_failure(&e),
        None => {
            eprintln!("\n{} Interrupted", "✗".red().bold());
            return EXIT_INTERRUPTED;
        }
    };

    let report = match generate_report(&target, &result, format) {
        Ok(report) => report,
        Err(e) => return print_local_failure(&anyhow::Error::new(e).context("Failed to render report")),
    };

    match write_report(&report, output.as_deref(), &mut std::io::stdout().lock()) {
        Ok(Some(path)) => {
            if !quiet {
                eprintln!(
                    "{} Report saved to: {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
            0
        }
        Ok(None) => 0,
        Err(e) => print_local_failure(&e),
    }
}

pub async fn handle_download(args: &ArgMatches, quiet: bool) -> i32 {
    let url = args.get_one::<String>("url").map(String::as_str).unwrap_or_default();
    let filename = args
        .get_one::<String>("filename")
        .map(String::as_str)
        .unwrap_or_default();
    let output_dir = expand_path(
        args.get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or("."),
    );

    debug!(output = %output_dir.display(), "download options resolved");

    let options = DownloadOptions {
        request: DownloadRequest::new(url, filename),
        config: build_config(args.get_one::<u64>("timeout").copied(), None, None),
        show_progress_bars: !quiet,
    };

    let archive = match interruptible(execute_download(options, None)).await {
        Some(Ok(archive)) => archive,
        Some(Err(e)) => return print_failure(&e),
        None => {
            eprintln!("\n{} Interrupted", "✗".red().bold());
            return EXIT_INTERRUPTED;
        }
    };

    match save_archive(&archive, &output_dir)
        .with_context(|| format!("Failed to save archive into {}", output_dir.display()))
    {
        Ok(path) => {
            if !quiet {
                eprintln!(
                    "{} Archive saved to: {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
            0
        }
        Err(e) => print_local_failure(&e),
    }
}
