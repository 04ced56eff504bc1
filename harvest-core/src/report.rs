// Report generation from scrape results

use harvest_scanner::{ArchivedBytes, ScrapeResult};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

pub fn generate_report(
    url: &str,
    result: &ScrapeResult,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(url, result)),
        ReportFormat::Json => generate_json_report(url, result),
        ReportFormat::Markdown => Ok(generate_markdown_report(url, result)),
    }
}

pub fn generate_text_report(url: &str, result: &ScrapeResult) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push('\n');
    report.push_str("                           HARVEST SCRAPE REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Target:       {}\n", url));
    report.push_str(&format!("Generated:    {}\n", format_now()));
    report.push_str(&format!("Code blocks:  {}\n", result.code_fragments().len()));
    report.push_str(&format!("Asset links:  {}\n\n", result.asset_links().len()));

    if !result.code_fragments().is_empty() {
        report.push_str(RULE);
        report.push_str("\nCODE BLOCKS\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        for (idx, fragment) in result.code_fragments().iter().enumerate() {
            report.push_str(&format!("[{}] {} lines\n", idx + 1, fragment.lines().count()));
            report.push_str(fragment.trim_end());
            report.push_str("\n\n");
        }
    }

    if !result.asset_links().is_empty() {
        report.push_str(RULE);
        report.push_str("\nASSET LINKS\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        let width = result
            .asset_links()
            .iter()
            .map(|link| link.filename.len())
            .max()
            .unwrap_or(0);

        for link in result.asset_links() {
            report.push_str(&format!("  {:<width$}  {}\n", link.filename, link.url, width = width));
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(url: &str, result: &ScrapeResult) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "url": url,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "generator": {
            "name": "harvest",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "code_blocks": result.code_fragments(),
        "file_links": result.asset_links(),
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(url: &str, result: &ScrapeResult) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Harvest report for <{}>\n\n", url));
    report.push_str(&format!("_Generated {}_\n\n", format_now()));

    report.push_str(&format!("## Code blocks ({})\n\n", result.code_fragments().len()));
    for fragment in result.code_fragments() {
        let fence = fence_for(fragment);
        report.push_str(&fence);
        report.push('\n');
        report.push_str(fragment.trim_end_matches('\n'));
        report.push('\n');
        report.push_str(&fence);
        report.push_str("\n\n");
    }

    report.push_str(&format!("## Asset links ({})\n\n", result.asset_links().len()));
    for link in result.asset_links() {
        report.push_str(&format!("- [{}]({})\n", link.filename, link.url));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Write `<dir>/<archive_name>`, creating `dir` if needed.
pub fn save_archive(archive: &ArchivedBytes, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&archive.archive_name);
    fs::write(&path, &archive.bytes)?;
    Ok(path)
}

/// A backtick fence longer than any backtick run inside the fragment.
fn fence_for(fragment: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for c in fragment.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn format_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_for_plain_code() {
        assert_eq!(fence_for("let x = 1;"), "```");
    }

    #[test]
    fn test_fence_for_nested_fence() {
        assert_eq!(fence_for("```rust\nfn main() {}\n```"), "````");
    }
}
